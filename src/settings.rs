use clap::{Parser, command};

use crate::exercises::Exercise;

// Some defaults; some of which can be overriden via CLI args
const CONFIG_FILE_PATH: &str = "./coach.json";
const USERNAME: &str = "guest";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Where to load coach config (goals, rest time, log location)
    #[arg(long="coachConfigPath",default_value_t=String::from(CONFIG_FILE_PATH))]
    pub config_path: String,

    /// Name written to the workout history
    #[arg(long="username",default_value_t=String::from(USERNAME))]
    pub username: String,

    /// Landmark recording to replay in place of a live camera (.json or MessagePack)
    #[arg(long = "recordingPath")]
    pub recording_path: Option<String>,

    /// Override the exercise from the config file
    #[arg(long = "exercise", value_enum)]
    pub exercise: Option<Exercise>,

    #[arg(long = "loglevel",default_value_t=String::from("info"))]
    pub log_level: String,
}
