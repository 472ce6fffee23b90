//! What a presenter shows for a given snapshot. Nothing here touches the
//! shared state; the frontend and the console loop both render from these.

use std::time::{Duration, SystemTime};

use crate::{exercises::Feedback, session::AppState, snapshot::Snapshot};

pub const WORKOUT_COMPLETE: &str = "Workout\nComplete!";
pub const WORKOUT_COMPLETE_FEEDBACK: &str = "Great job! Select a new exercise or reset.";

/// Time left before the next set, if resting. Zero once the deadline has passed
/// but the rest has not been ended yet.
pub fn rest_remaining(snapshot: &Snapshot, now: SystemTime) -> Option<Duration> {
    match (snapshot.app_state, snapshot.rest_deadline) {
        (AppState::Resting, Some(deadline)) => {
            Some(deadline.duration_since(now).unwrap_or(Duration::ZERO))
        }
        _ => None,
    }
}

/// Whole seconds, rounded down
pub fn rest_countdown_text(remaining: Duration) -> String {
    format!("REST\n{}s", remaining.as_secs())
}

pub fn next_set_text(remaining: Duration) -> String {
    format!("Next set in {}s.", remaining.as_secs())
}

fn is_complete(app_state: AppState) -> bool {
    matches!(app_state, AppState::Finished | AppState::Saved)
}

/// Fraction of the current set done, in [0, 1]
pub fn progress(snapshot: &Snapshot) -> f32 {
    if is_complete(snapshot.app_state) {
        return 1.0;
    }
    let goal = snapshot.goals.rep_goal.max(1);
    (snapshot.rep_count as f32 / goal as f32).min(1.0)
}

pub fn phase_label(snapshot: &Snapshot) -> String {
    snapshot.phase.as_str().to_uppercase()
}

/// Large text covering the video area, when there is any
pub fn overlay_text(snapshot: &Snapshot, now: SystemTime) -> Option<String> {
    if is_complete(snapshot.app_state) {
        return Some(String::from(WORKOUT_COMPLETE));
    }
    rest_remaining(snapshot, now).map(rest_countdown_text)
}

/// The feedback line, replaced by the countdown or the closing message where
/// those apply. A warning raised after finishing (failed save) still shows.
pub fn feedback_line(snapshot: &Snapshot, now: SystemTime) -> Feedback {
    if let Some(remaining) = rest_remaining(snapshot, now) {
        return Feedback::info(&next_set_text(remaining));
    }
    if is_complete(snapshot.app_state) && !snapshot.feedback.is_warning() {
        return Feedback::success(WORKOUT_COMPLETE_FEEDBACK);
    }
    snapshot.feedback.clone()
}

/// One-line summary for logs and the console presenter
pub fn status_line(snapshot: &Snapshot, now: SystemTime) -> String {
    format!(
        "{} | set {}/{} | reps {}/{} | {} | {}",
        snapshot.exercise,
        snapshot.set_count,
        snapshot.goals.set_goal,
        snapshot.rep_count,
        snapshot.goals.rep_goal,
        phase_label(snapshot),
        feedback_line(snapshot, now).text.replace('\n', " ")
    )
}
