use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::SystemTime,
};

use log::info;

use crate::{
    capture::Frame,
    exercises::{Exercise, Feedback, Phase},
    landmarks::LandmarkFrame,
    session::{AppState, GoalError, Goals, Session, WorkoutSummary},
};

/// Everything a presenter needs, copied out as one consistent unit
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Counts producer iterations that have been published
    pub sequence: u64,
    pub frame: Option<Arc<Frame>>,
    pub landmarks: LandmarkFrame,
    pub exercise: Exercise,
    pub phase: Phase,
    pub rep_count: u32,
    pub set_count: u32,
    pub goals: Goals,
    pub feedback: Feedback,
    pub app_state: AppState,
    pub rest_deadline: Option<SystemTime>,
}

impl Snapshot {
    fn capture(
        session: &Session,
        sequence: u64,
        frame: Option<Arc<Frame>>,
        landmarks: LandmarkFrame,
    ) -> Self {
        Snapshot {
            sequence,
            frame,
            landmarks,
            exercise: session.exercise(),
            phase: session.classifier().phase,
            rep_count: session.rep_count(),
            set_count: session.set_count(),
            goals: session.goals(),
            feedback: session.feedback().clone(),
            app_state: session.app_state(),
            rest_deadline: session.rest_deadline(),
        }
    }
}

struct CoachState {
    session: Session,
    published: Snapshot,
}

impl CoachState {
    /// Re-publish the session's current values, keeping the latest frame
    fn republish(&mut self) {
        self.published = Snapshot::capture(
            &self.session,
            self.published.sequence,
            self.published.frame.take(),
            std::mem::take(&mut self.published.landmarks),
        );
    }
}

/// The session plus its published snapshot, behind a single lock.
///
/// Cloning gives another handle to the same state. Every method holds the
/// lock only for in-memory work, and every mutation re-publishes the whole
/// snapshot before the lock is released.
#[derive(Clone)]
pub struct SharedCoach {
    state: Arc<Mutex<CoachState>>,
    stop: Arc<AtomicBool>,
}

impl SharedCoach {
    pub fn new(session: Session) -> Self {
        let published = Snapshot::capture(&session, 0, None, LandmarkFrame::default());
        SharedCoach {
            state: Arc::new(Mutex::new(CoachState { session, published })),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoachState> {
        // Every critical section leaves the state whole, so a panic elsewhere
        // does not make it unusable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().published.clone()
    }

    /// One producer iteration's worth of state changes: expire the rest period,
    /// classify the frame (while counting), claim a finished workout and publish.
    pub fn process_frame(
        &self,
        frame: Arc<Frame>,
        landmarks: LandmarkFrame,
        now: SystemTime,
    ) -> Option<WorkoutSummary> {
        let mut state = self.lock();
        state.session.tick(now);
        state.session.analyze(&landmarks, now);
        let finished = state.session.take_finished(now);

        let sequence = state.published.sequence + 1;
        state.published = Snapshot::capture(&state.session, sequence, Some(frame), landmarks);
        finished
    }

    /// Called on every presentation tick; returns the state after the check
    pub fn tick(&self, now: SystemTime) -> AppState {
        let mut state = self.lock();
        if state.session.tick(now) {
            state.republish();
        }
        state.session.app_state()
    }

    pub fn reset(&self) {
        self.update(Session::reset)
    }

    pub fn select_exercise(&self, exercise: Exercise) {
        self.update(|session| session.select_exercise(exercise))
    }

    pub fn apply_goal_input(&self, rep_input: &str, set_input: &str) -> Result<Goals, GoalError> {
        self.update(|session| session.apply_goal_input(rep_input, set_input))
    }

    pub fn report_persistence_error(&self, workout: u64, message: &str) -> bool {
        self.update(|session| session.report_persistence_error(workout, message))
    }

    pub fn report_warning(&self, message: &str) {
        self.update(|session| session.report_warning(message))
    }

    fn update<R>(&self, change: impl FnOnce(&mut Session) -> R) -> R {
        let mut state = self.lock();
        let result = change(&mut state.session);
        state.republish();
        result
    }

    /// Ask the producer to stop after its current iteration
    pub fn stop(&self) {
        if !self.stop.swap(true, Ordering::SeqCst) {
            info!("Stop requested");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::exercises::Severity;

    fn coach() -> SharedCoach {
        SharedCoach::new(Session::new(
            "tester",
            Exercise::BicepCurl,
            Goals::default(),
            Duration::from_secs(30),
        ))
    }

    fn blank_frame(sequence: u64) -> Arc<Frame> {
        Arc::new(Frame {
            sequence,
            width: 640,
            height: 480,
            pixels: Vec::new(),
            captured_at: SystemTime::now(),
        })
    }

    #[test]
    fn test_publish_bumps_sequence_and_keeps_frame() {
        let coach = coach();
        assert_eq!(coach.snapshot().sequence, 0);
        assert!(coach.snapshot().frame.is_none());

        coach.process_frame(blank_frame(7), LandmarkFrame::default(), SystemTime::now());
        let snapshot = coach.snapshot();
        assert_eq!(snapshot.sequence, 1);
        assert_eq!(snapshot.frame.as_ref().map(|f| f.sequence), Some(7));

        // Controls re-publish without dropping the frame
        coach.select_exercise(Exercise::SideRaise);
        let snapshot = coach.snapshot();
        assert_eq!(snapshot.exercise, Exercise::SideRaise);
        assert_eq!(snapshot.sequence, 1);
        assert!(snapshot.frame.is_some());
    }

    #[test]
    fn test_invalid_goals_are_published_as_warning() {
        let coach = coach();
        assert!(coach.apply_goal_input("ten", "").is_err());
        let snapshot = coach.snapshot();
        assert_eq!(snapshot.goals, Goals::default());
        assert_eq!(snapshot.feedback.severity, Severity::Warning);
    }

    #[test]
    fn test_late_save_error_skips_a_restarted_workout() {
        let coach = SharedCoach::new(Session::new(
            "tester",
            Exercise::BicepCurl,
            Goals::new(1, 1).unwrap(),
            Duration::from_secs(30),
        ));
        // Curled without a captured elbow: counts, finishes and is claimed
        let curled = crate::exercises::test_frames::pose(&[
            (crate::landmarks::JointId::LeftShoulder, (300., 80.)),
            (crate::landmarks::JointId::LeftElbow, (300., 200.)),
            (crate::landmarks::JointId::LeftWrist, (310., 90.)),
        ]);
        let summary = coach
            .process_frame(blank_frame(0), curled, SystemTime::now())
            .expect("workout should finish on the first rep");

        coach.select_exercise(Exercise::JumpingJack);
        assert!(!coach.report_persistence_error(summary.workout, "disk full"));
        assert_eq!(coach.snapshot().feedback.text, "Let's begin!");
    }

    #[test]
    fn test_stop_flag_is_shared() {
        let coach = coach();
        let other = coach.clone();
        assert!(!other.is_stopped());
        coach.stop();
        assert!(other.is_stopped());
    }
}
