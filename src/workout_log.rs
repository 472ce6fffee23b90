use std::{
    borrow::Cow,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::debug;

use crate::session::WorkoutSummary;

pub const HEADER: [&str; 5] = [
    "Timestamp",
    "Username",
    "Exercise",
    "Total_Sets",
    "Reps_Per_Set",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Somewhere to keep completed workouts
pub trait WorkoutRecorder: Send {
    fn record(&mut self, summary: &WorkoutSummary) -> Result<()>;
}

/// Append-only CSV history; the header goes in when the file is first created
pub struct CsvWorkoutLog {
    path: PathBuf,
}

impl CsvWorkoutLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvWorkoutLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkoutRecorder for CsvWorkoutLog {
    fn record(&mut self, summary: &WorkoutSummary) -> Result<()> {
        let is_new = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let mut text = String::new();
        if is_new {
            debug!("Creating workout history at {}", self.path.display());
            text.push_str(&csv_row(&HEADER));
        }
        let timestamp = DateTime::<Local>::from(summary.finished_at)
            .format(TIMESTAMP_FORMAT)
            .to_string();
        let set_goal = summary.set_goal.to_string();
        let rep_goal = summary.rep_goal.to_string();
        text.push_str(&csv_row(&[
            timestamp.as_str(),
            summary.username.as_str(),
            summary.exercise.name(),
            set_goal.as_str(),
            rep_goal.as_str(),
        ]));

        file.write_all(text.as_bytes())
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

fn csv_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push_str("\r\n");
    row
}

fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
