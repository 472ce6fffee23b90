pub mod angle_rule;
pub mod jumping_jack;
pub mod overhead_clap;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Point2D, landmarks::LandmarkFrame};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Exercise {
    BicepCurl,
    ShoulderPress,
    SideRaise,
    OverheadClap,
    JumpingJack,
}

impl Exercise {
    /// In the order they are offered to the user
    pub const ALL: [Exercise; 5] = [
        Exercise::BicepCurl,
        Exercise::ShoulderPress,
        Exercise::SideRaise,
        Exercise::OverheadClap,
        Exercise::JumpingJack,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Exercise::BicepCurl => "Bicep Curl",
            Exercise::ShoulderPress => "Shoulder Press",
            Exercise::SideRaise => "Side Raise",
            Exercise::OverheadClap => "Overhead Clap",
            Exercise::JumpingJack => "Jumping Jack",
        }
    }

    /// Neutral message shown while nothing noteworthy is happening
    pub fn prompt(&self) -> &'static str {
        match self {
            Exercise::BicepCurl => angle_rule::BICEP_CURL.prompt,
            Exercise::ShoulderPress => angle_rule::SHOULDER_PRESS.prompt,
            Exercise::SideRaise => angle_rule::SIDE_RAISE.prompt,
            Exercise::OverheadClap => overhead_clap::PROMPT,
            Exercise::JumpingJack => jumping_jack::PROMPT,
        }
    }

    /// Run this exercise's rep counter on one frame of landmarks.
    ///
    /// Pure: the previous state goes in, the next state comes out. Frames
    /// with missing joints leave phase and count as they were.
    pub fn classify(&self, frame: &LandmarkFrame, state: &ClassifierState) -> Classification {
        match self {
            Exercise::BicepCurl => angle_rule::BICEP_CURL.evaluate(frame, state),
            Exercise::ShoulderPress => angle_rule::SHOULDER_PRESS.evaluate(frame, state),
            Exercise::SideRaise => angle_rule::SIDE_RAISE.evaluate(frame, state),
            Exercise::OverheadClap => overhead_clap::classify(frame, state),
            Exercise::JumpingJack => jumping_jack::classify(frame, state),
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Down,
    Up,
    Apart,
    Clap,
    In,
    Out,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Down => "down",
            Phase::Up => "up",
            Phase::Apart => "apart",
            Phase::Clap => "clap",
            Phase::In => "in",
            Phase::Out => "out",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Success,
    Warning,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub severity: Severity,
}

impl Feedback {
    pub fn info(text: &str) -> Self {
        Feedback {
            text: String::from(text),
            severity: Severity::Info,
        }
    }

    pub fn success(text: &str) -> Self {
        Feedback {
            text: String::from(text),
            severity: Severity::Success,
        }
    }

    pub fn warning(text: &str) -> Self {
        Feedback {
            text: String::from(text),
            severity: Severity::Warning,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// What a classifier remembers between frames
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ClassifierState {
    pub phase: Phase,
    pub rep_count: u32,
    /// Joint position captured on entering the start phase; only used by form checks
    pub reference_point: Option<Point2D>,
}

impl Default for ClassifierState {
    fn default() -> Self {
        ClassifierState {
            phase: Phase::Down,
            rep_count: 0,
            reference_point: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub phase: Phase,
    pub rep_count: u32,
    pub reference_point: Option<Point2D>,
    pub feedback: Feedback,
}

impl Classification {
    /// Same state as before, with a neutral message
    pub fn carried(state: &ClassifierState, prompt: &str) -> Self {
        Classification {
            phase: state.phase,
            rep_count: state.rep_count,
            reference_point: state.reference_point,
            feedback: Feedback::info(prompt),
        }
    }

    pub fn state(&self) -> ClassifierState {
        ClassifierState {
            phase: self.phase,
            rep_count: self.rep_count,
            reference_point: self.reference_point,
        }
    }

    pub(crate) fn count_rep(&mut self, phase: Phase, text: &str) {
        self.phase = phase;
        self.rep_count += 1;
        self.feedback = Feedback::success(text);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absence_leaves_state_untouched() {
        let empty = LandmarkFrame::default();
        let state = ClassifierState {
            phase: Phase::Up,
            rep_count: 7,
            reference_point: Some((10., 20.)),
        };

        for exercise in Exercise::ALL {
            let result = exercise.classify(&empty, &state);
            assert_eq!(result.state(), state, "{}", exercise);
            assert_eq!(result.feedback.severity, Severity::Info);
            assert_eq!(result.feedback.text, exercise.prompt());
        }
    }

    #[test]
    fn test_names_in_menu_order() {
        let names: Vec<&str> = Exercise::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec![
                "Bicep Curl",
                "Shoulder Press",
                "Side Raise",
                "Overhead Clap",
                "Jumping Jack"
            ]
        );
    }
}
