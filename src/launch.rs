use std::{thread::JoinHandle, time::Duration};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use crate::{
    capture::{Producer, spawn_producer},
    coach_config::{CoachConfig, load_config_from_file},
    replay::{load_recording, replay},
    session::Session,
    settings::Cli,
    snapshot::SharedCoach,
    workout_log::CsvWorkoutLog,
};

/// A running coach: shared state plus the producer thread feeding it
pub struct CoachRuntime {
    pub coach: SharedCoach,
    pub config: CoachConfig,
    producer: Option<JoinHandle<()>>,
}

impl CoachRuntime {
    pub fn start(cli: &Cli) -> Result<Self> {
        let mut config = load_config_from_file(&cli.config_path)?;
        if let Some(exercise) = cli.exercise {
            config.exercise = exercise;
        }

        let recording_path = cli.recording_path.as_deref().ok_or_else(|| {
            anyhow!("no frame source; pass --recordingPath with a landmark recording")
        })?;
        let frames = load_recording(recording_path)?;
        if frames.is_empty() {
            warn!("Recording at \"{}\" has no frames", recording_path);
        }

        let session = Session::new(
            &cli.username,
            config.exercise,
            config.goals()?,
            config.rest_duration(),
        );
        let coach = SharedCoach::new(session);

        let fps = Some(config.replay_fps).filter(|fps| *fps > 0.);
        let (source, detector) = replay(frames, fps, config.replay_loop);
        let producer = Producer::new(
            source,
            detector,
            CsvWorkoutLog::new(&config.workout_log_path),
            coach.clone(),
        )
        .with_read_retry(config.read_retry());
        let handle = spawn_producer(producer).context("failed to start producer thread")?;

        info!(
            "Coaching {} on {}: {} sets of {} reps",
            cli.username, config.exercise, config.set_goal, config.rep_goal
        );

        Ok(CoachRuntime {
            coach,
            config,
            producer: Some(handle),
        })
    }

    pub fn presentation_interval(&self) -> Duration {
        self.config.presentation_interval()
    }

    /// True once the producer thread has exited (stopped or out of frames)
    pub fn producer_finished(&self) -> bool {
        self.producer.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop the producer and wait for it. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.coach.stop();
        if let Some(handle) = self.producer.take() {
            if handle.join().is_err() {
                warn!("Producer thread panicked");
            }
        }
    }
}

impl Drop for CoachRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
