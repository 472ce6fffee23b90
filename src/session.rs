use std::time::{Duration, SystemTime};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    exercises::{ClassifierState, Exercise, Feedback},
    landmarks::LandmarkFrame,
};

pub const DEFAULT_REP_GOAL: u32 = 10;
pub const DEFAULT_SET_GOAL: u32 = 3;
pub const DEFAULT_REST_DURATION: Duration = Duration::from_secs(30);
/// Longer rests are cut down to this
pub const MAX_REST_DURATION: Duration = Duration::from_secs(60 * 60);

const INVALID_GOALS_MESSAGE: &str = "Please enter valid numbers for goals.";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AppState {
    Counting,
    Resting,
    Finished,
    /// Finished, and the workout has been handed over for persistence
    Saved,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoalError {
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
    #[error("goals must be positive, got {0}")]
    NotPositive(i64),
    #[error("{0} is too large for a goal")]
    TooLarge(i64),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub rep_goal: u32,
    pub set_goal: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Goals {
            rep_goal: DEFAULT_REP_GOAL,
            set_goal: DEFAULT_SET_GOAL,
        }
    }
}

impl Goals {
    pub fn new(rep_goal: u32, set_goal: u32) -> Result<Self, GoalError> {
        if rep_goal == 0 || set_goal == 0 {
            return Err(GoalError::NotPositive(0));
        }
        Ok(Goals { rep_goal, set_goal })
    }

    /// Parse user-entered goals. A blank field keeps the current value.
    pub fn parse(&self, rep_input: &str, set_input: &str) -> Result<Self, GoalError> {
        Ok(Goals {
            rep_goal: parse_goal(rep_input, self.rep_goal)?,
            set_goal: parse_goal(set_input, self.set_goal)?,
        })
    }
}

fn parse_goal(input: &str, current: u32) -> Result<u32, GoalError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(current);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| GoalError::NotANumber(String::from(trimmed)))?;
    if value <= 0 {
        return Err(GoalError::NotPositive(value));
    }
    u32::try_from(value).map_err(|_| GoalError::TooLarge(value))
}

/// The record persisted once a workout is complete
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    /// Which workout of this session it was; bumped on every reset
    pub workout: u64,
    pub finished_at: SystemTime,
    pub username: String,
    pub exercise: Exercise,
    pub set_goal: u32,
    pub rep_goal: u32,
}

/// Workout-level state machine: Counting -> Resting -> Counting ... -> Finished -> Saved.
/// Owns the active exercise's classifier state.
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
    exercise: Exercise,
    classifier: ClassifierState,
    app_state: AppState,
    set_count: u32,
    goals: Goals,
    rest_duration: Duration,
    rest_deadline: Option<SystemTime>,
    feedback: Feedback,
    workout: u64,
}

impl Session {
    pub fn new(username: &str, exercise: Exercise, goals: Goals, rest_duration: Duration) -> Self {
        if rest_duration > MAX_REST_DURATION {
            warn!(
                "Rest of {}s is too long; using {}s",
                rest_duration.as_secs(),
                MAX_REST_DURATION.as_secs()
            );
        }
        Session {
            username: String::from(username),
            exercise,
            classifier: ClassifierState::default(),
            app_state: AppState::Counting,
            set_count: 0,
            goals,
            rest_duration: rest_duration.min(MAX_REST_DURATION),
            rest_deadline: None,
            feedback: Feedback::info("Start"),
            workout: 0,
        }
    }

    /// Feed one frame of landmarks to the active exercise. Only does anything
    /// while counting; returns the state after the frame.
    pub fn analyze(&mut self, frame: &LandmarkFrame, now: SystemTime) -> AppState {
        if self.app_state != AppState::Counting {
            return self.app_state;
        }

        let previous_count = self.classifier.rep_count;
        let result = self.exercise.classify(frame, &self.classifier);
        self.classifier = result.state();
        self.feedback = result.feedback;

        let rep_count = self.classifier.rep_count;
        if rep_count > previous_count {
            debug!(
                "{}: rep {} of {}",
                self.exercise, rep_count, self.goals.rep_goal
            );
            if rep_count >= self.goals.rep_goal {
                self.complete_set(now);
            }
        }

        self.app_state
    }

    fn complete_set(&mut self, now: SystemTime) {
        self.set_count += 1;
        self.classifier.rep_count = 0;

        if self.set_count >= self.goals.set_goal {
            info!(
                "Workout finished: {} sets of {} {}",
                self.set_count, self.goals.rep_goal, self.exercise
            );
            self.app_state = AppState::Finished;
        } else {
            info!(
                "Set {} of {} complete; resting for {}s",
                self.set_count,
                self.goals.set_goal,
                self.rest_duration.as_secs()
            );
            self.app_state = AppState::Resting;
            // A clock near its limit ends the rest straight away rather than overflowing
            self.rest_deadline = Some(now.checked_add(self.rest_duration).unwrap_or(now));
        }
    }

    /// End the rest period once its deadline has passed.
    /// Returns true if the state changed.
    pub fn tick(&mut self, now: SystemTime) -> bool {
        match (self.app_state, self.rest_deadline) {
            (AppState::Resting, Some(deadline)) if now >= deadline => {
                info!("Rest over; starting set {}", self.set_count + 1);
                self.app_state = AppState::Counting;
                self.rest_deadline = None;
                self.feedback = Feedback::info("Let's go!");
                true
            }
            _ => false,
        }
    }

    /// Claim a finished workout for persistence. Succeeds at most once per workout:
    /// the state moves on to Saved whether or not persistence later works out.
    pub fn take_finished(&mut self, now: SystemTime) -> Option<WorkoutSummary> {
        if self.app_state != AppState::Finished {
            return None;
        }
        self.app_state = AppState::Saved;
        Some(WorkoutSummary {
            workout: self.workout,
            finished_at: now,
            username: self.username.clone(),
            exercise: self.exercise,
            set_goal: self.goals.set_goal,
            rep_goal: self.goals.rep_goal,
        })
    }

    /// Show a failed save, unless the user has already moved on from that workout.
    /// Returns true if the warning was shown.
    pub fn report_persistence_error(&mut self, workout: u64, message: &str) -> bool {
        if workout != self.workout || self.app_state != AppState::Saved {
            debug!("Dropping save error for earlier workout {}: {}", workout, message);
            return false;
        }
        self.feedback = Feedback::warning(&format!("Workout not saved: {}", message));
        true
    }

    pub fn report_warning(&mut self, message: &str) {
        self.feedback = Feedback::warning(message);
    }

    pub fn reset(&mut self) {
        debug!("Reset workout for {}", self.exercise);
        self.classifier = ClassifierState::default();
        self.workout += 1;
        self.set_count = 0;
        self.app_state = AppState::Counting;
        self.rest_deadline = None;
        self.feedback = Feedback::info("Let's begin!");
    }

    pub fn select_exercise(&mut self, exercise: Exercise) {
        info!("Exercise changed: {} -> {}", self.exercise, exercise);
        self.exercise = exercise;
        self.reset();
    }

    /// Apply goals typed in by the user. Invalid input keeps the old goals
    /// and leaves a warning; valid input restarts the workout.
    pub fn apply_goal_input(&mut self, rep_input: &str, set_input: &str) -> Result<Goals, GoalError> {
        match self.goals.parse(rep_input, set_input) {
            Ok(goals) => {
                info!(
                    "New goals: {} reps x {} sets",
                    goals.rep_goal, goals.set_goal
                );
                self.goals = goals;
                self.reset();
                Ok(goals)
            }
            Err(e) => {
                warn!("Rejected goal input: {}", e);
                self.feedback = Feedback::warning(INVALID_GOALS_MESSAGE);
                Err(e)
            }
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn classifier(&self) -> &ClassifierState {
        &self.classifier
    }

    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    pub fn set_count(&self) -> u32 {
        self.set_count
    }

    pub fn rep_count(&self) -> u32 {
        self.classifier.rep_count
    }

    pub fn goals(&self) -> Goals {
        self.goals
    }

    pub fn rest_deadline(&self) -> Option<SystemTime> {
        self.rest_deadline
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn rest_duration(&self) -> Duration {
        self.rest_duration
    }
}
