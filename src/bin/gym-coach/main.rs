use std::{thread, time::SystemTime};

use clap::Parser;
use env_logger::Env;
use log::{debug, error, info};

use gym_coach::{launch::CoachRuntime, presentation::status_line, settings::Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    debug!("Started; args: {:?}", cli);

    let mut runtime = match CoachRuntime::start(&cli) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start: {:#}", e);
            std::process::exit(1);
        }
    };

    let interval = runtime.presentation_interval();
    let mut last_sequence = 0;
    let mut last_status = String::new();

    // Console presenter: read the published snapshot on a fixed schedule,
    // print whenever the visible status changes
    loop {
        let now = SystemTime::now();
        runtime.coach.tick(now);
        let snapshot = runtime.coach.snapshot();

        let status = status_line(&snapshot, now);
        if status != last_status {
            info!("{}", status);
            last_status = status;
        }
        if snapshot.sequence != last_sequence {
            debug!(
                "Frame {} with {} landmarks",
                snapshot.sequence,
                snapshot.landmarks.len()
            );
            last_sequence = snapshot.sequence;
        }

        if runtime.producer_finished() {
            break;
        }
        thread::sleep(interval);
    }

    runtime.shutdown();
    info!("Done; {} frames processed", runtime.coach.snapshot().sequence);
}
