use crate::{
    geometry_utils::angle,
    landmarks::{JointId, LandmarkFrame},
};

use super::{Classification, ClassifierState, Phase};

/// Both hip-shoulder-wrist angles under this: arms are in
pub const ARMS_IN_ANGLE: f32 = 45.;
/// Both hip-shoulder-wrist angles over this: arms are out
pub const ARMS_OUT_ANGLE: f32 = 90.;

pub const PROMPT: &str = "Jump!";

pub fn classify(frame: &LandmarkFrame, state: &ClassifierState) -> Classification {
    let mut result = Classification::carried(state, PROMPT);

    let left = angle(
        frame,
        JointId::LeftHip,
        JointId::LeftShoulder,
        JointId::LeftWrist,
    );
    let right = angle(
        frame,
        JointId::RightHip,
        JointId::RightShoulder,
        JointId::RightWrist,
    );
    let (Some(left), Some(right)) = (left, right) else {
        return result;
    };

    if left < ARMS_IN_ANGLE && right < ARMS_IN_ANGLE {
        result.phase = Phase::In;
    }
    if left > ARMS_OUT_ANGLE && right > ARMS_OUT_ANGLE && result.phase == Phase::In {
        result.count_rep(Phase::Out, "Good Jump!");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Point2D,
        exercises::test_frames::{limb_end, pose},
    };

    fn arms(left_degrees: f32, right_degrees: f32) -> LandmarkFrame {
        let left_shoulder: Point2D = (380., 200.);
        let right_shoulder: Point2D = (260., 200.);
        let left_hip: Point2D = (370., 420.);
        let right_hip: Point2D = (270., 420.);
        pose(&[
            (JointId::LeftShoulder, left_shoulder),
            (JointId::RightShoulder, right_shoulder),
            (JointId::LeftHip, left_hip),
            (JointId::RightHip, right_hip),
            (
                JointId::LeftWrist,
                limb_end(left_hip, left_shoulder, left_degrees, 150.),
            ),
            (
                JointId::RightWrist,
                limb_end(right_hip, right_shoulder, right_degrees, 150.),
            ),
        ])
    }

    #[test]
    fn test_jump_counted_from_in_to_out() {
        let start = ClassifierState::default();
        let arms_in = classify(&arms(20., 25.), &start);
        assert_eq!(arms_in.phase, Phase::In);
        assert_eq!(arms_in.rep_count, 0);

        let arms_out = classify(&arms(150., 140.), &arms_in.state());
        assert_eq!(arms_out.phase, Phase::Out);
        assert_eq!(arms_out.rep_count, 1);
        assert_eq!(arms_out.feedback.text, "Good Jump!");
    }

    #[test]
    fn test_held_arms_out_counts_once() {
        let mut state = classify(&arms(20., 20.), &ClassifierState::default()).state();
        for _ in 0..25 {
            state = classify(&arms(150., 150.), &state).state();
        }
        assert_eq!(state.rep_count, 1);
        assert_eq!(state.phase, Phase::Out);

        state = classify(&arms(10., 10.), &state).state();
        state = classify(&arms(150., 150.), &state).state();
        assert_eq!(state.rep_count, 2);
    }

    #[test]
    fn test_one_arm_out_is_not_a_jump() {
        let arms_in = classify(&arms(20., 20.), &ClassifierState::default());
        let lopsided = classify(&arms(150., 30.), &arms_in.state());
        assert_eq!(lopsided.phase, Phase::In);
        assert_eq!(lopsided.rep_count, 0);
    }

    #[test]
    fn test_needs_both_sides() {
        // Right wrist (index 16) missing
        let frame = LandmarkFrame::from_positions(&[(100., 100.); 16]);
        let state = ClassifierState {
            phase: Phase::In,
            rep_count: 2,
            reference_point: None,
        };
        assert_eq!(classify(&frame, &state).state(), state);
    }
}
