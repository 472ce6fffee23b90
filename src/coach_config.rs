use std::{fs, io::ErrorKind, time::Duration};

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    exercises::Exercise,
    session::{DEFAULT_REP_GOAL, DEFAULT_SET_GOAL, Goals, MAX_REST_DURATION},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachConfig {
    /// Exercise selected at startup
    pub exercise: Exercise,

    // -------- WORKOUT SETTINGS
    /// Reps that make up one set
    pub rep_goal: u32,

    /// Sets that make up the whole workout
    pub set_goal: u32,

    /// Rest between sets, in seconds
    pub rest_secs: u64,

    /// Where completed workouts are appended (CSV)
    pub workout_log_path: String,

    // -------- CAPTURE SETTINGS
    /// How long (ms) to wait before retrying after a failed frame read
    pub read_retry_ms: u64,

    /// How often (ms) presenters refresh from the published snapshot
    pub presentation_interval_ms: u64,

    /// Playback rate for landmark recordings; 0 plays as fast as possible
    pub replay_fps: f32,

    /// Start a recording over when it runs out
    pub replay_loop: bool,
}

impl Default for CoachConfig {
    fn default() -> Self {
        CoachConfig {
            exercise: Exercise::BicepCurl,
            rep_goal: DEFAULT_REP_GOAL,
            set_goal: DEFAULT_SET_GOAL,
            rest_secs: 30,
            workout_log_path: String::from("workout_history.csv"),
            read_retry_ms: 10,
            presentation_interval_ms: 30,
            replay_fps: 30.,
            replay_loop: false,
        }
    }
}

impl CoachConfig {
    pub fn goals(&self) -> Result<Goals> {
        Goals::new(self.rep_goal, self.set_goal)
            .map_err(|e| anyhow!("invalid goals in config: {}", e))
    }

    /// Reject values the session cannot use
    pub fn validate(&self) -> Result<()> {
        self.goals()?;
        if self.rest_secs > MAX_REST_DURATION.as_secs() {
            return Err(anyhow!(
                "restSecs of {} is more than the {}s maximum",
                self.rest_secs,
                MAX_REST_DURATION.as_secs()
            ));
        }
        if !self.replay_fps.is_finite() || self.replay_fps < 0. {
            return Err(anyhow!("replayFps must be zero or positive, got {}", self.replay_fps));
        }
        Ok(())
    }

    pub fn rest_duration(&self) -> Duration {
        Duration::from_secs(self.rest_secs)
    }

    pub fn read_retry(&self) -> Duration {
        Duration::from_millis(self.read_retry_ms)
    }

    pub fn presentation_interval(&self) -> Duration {
        Duration::from_millis(self.presentation_interval_ms.max(1))
    }

    pub fn write_config_to_file(&self, config_file_path: &str) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(config_file_path, text)
            .with_context(|| format!("failed to write config to {}", config_file_path))?;
        info!("Wrote config to file: {:?}", config_file_path);
        Ok(())
    }
}

pub fn load_config_from_file(config_file_path: &str) -> Result<CoachConfig> {
    match fs::read_to_string(config_file_path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Coach config file not found at {}; using defaults",
                config_file_path
            );
            Ok(CoachConfig::default())
        }
        Err(e) => Err(anyhow!(
            "Failed to load coach config from {}: {}",
            config_file_path,
            e
        )),
        Ok(s) => {
            info!("Loaded coach config OK from \"{}\"", config_file_path);
            let config = serde_json::from_str::<CoachConfig>(&s)
                .map_err(|e| anyhow!("Failed to parse config data: {}", e))?;
            debug!("Config parsed data from file: {:?}", &config);
            config.validate()?;
            Ok(config)
        }
    }
}
