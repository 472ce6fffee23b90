use crate::{
    geometry_utils::distance,
    landmarks::{JointId, LandmarkFrame},
};

use super::{Classification, ClassifierState, Feedback, Phase};

/// Wrist gap (pixels) above which the hands count as apart
pub const HANDS_APART_DISTANCE: f32 = 150.;
/// Wrist gap (pixels) below which the hands count as together
pub const HANDS_TOGETHER_DISTANCE: f32 = 50.;

pub const PROMPT: &str = "Raise hands and clap!";

pub fn classify(frame: &LandmarkFrame, state: &ClassifierState) -> Classification {
    let mut result = Classification::carried(state, PROMPT);

    let gap = distance(frame, JointId::LeftWrist, JointId::RightWrist);
    let wrist = frame.get(JointId::LeftWrist);
    let shoulder = frame.get(JointId::LeftShoulder);
    let (Some(gap), Some((_, wrist_y)), Some((_, shoulder_y))) = (gap, wrist, shoulder) else {
        return result;
    };

    // Image y grows downwards
    if wrist_y < shoulder_y {
        if gap > HANDS_APART_DISTANCE {
            result.phase = Phase::Apart;
            result.feedback = Feedback::info("Clap above head!");
        }
        if gap < HANDS_TOGETHER_DISTANCE && result.phase == Phase::Apart {
            result.count_rep(Phase::Clap, "Clap!");
        }
    } else {
        result.phase = Phase::Down;
        result.feedback = Feedback::info("Raise hands higher!");
    }

    result
}
