use crate::{
    geometry_utils::{angle, distance_points},
    landmarks::{JointId, LandmarkFrame},
};

use super::{Classification, ClassifierState, Feedback, Phase};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Below(f32),
    Above(f32),
}

impl Threshold {
    pub fn is_met(self, degrees: f32) -> bool {
        match self {
            Threshold::Below(limit) => degrees < limit,
            Threshold::Above(limit) => degrees > limit,
        }
    }
}

/// Form check: a joint that should stay put between the start of a rep and
/// its completion
#[derive(Debug, Clone, Copy)]
pub struct AnchorCheck {
    pub joint: JointId,
    /// Maximum allowed movement, in pixels
    pub max_drift: f32,
    pub warning: &'static str,
}

/// A rep counter driven by a single joint angle: entering the start range
/// arms the counter (phase Down), reaching the finish range from Down
/// counts a rep (phase Up)
#[derive(Debug, Clone, Copy)]
pub struct AngleRule {
    /// Angle is measured at the middle joint
    pub joints: (JointId, JointId, JointId),
    pub enter: Threshold,
    pub rep: Threshold,
    pub prompt: &'static str,
    pub enter_feedback: &'static str,
    pub rep_feedback: &'static str,
    pub anchor: Option<AnchorCheck>,
}

pub const CURL_EXTENDED_ANGLE: f32 = 160.;
pub const CURL_FLEXED_ANGLE: f32 = 30.;
pub const ELBOW_MAX_DRIFT: f32 = 40.;

pub const PRESS_LOWERED_ANGLE: f32 = 90.;
pub const PRESS_EXTENDED_ANGLE: f32 = 160.;

pub const RAISE_LOWERED_ANGLE: f32 = 20.;
pub const RAISE_LIFTED_ANGLE: f32 = 80.;

/// Tracks the left arm
pub const BICEP_CURL: AngleRule = AngleRule {
    joints: (JointId::LeftShoulder, JointId::LeftElbow, JointId::LeftWrist),
    enter: Threshold::Above(CURL_EXTENDED_ANGLE),
    rep: Threshold::Below(CURL_FLEXED_ANGLE),
    prompt: "Extend your arm fully.",
    enter_feedback: "Arm extended",
    rep_feedback: "Rep Complete!",
    anchor: Some(AnchorCheck {
        joint: JointId::LeftElbow,
        max_drift: ELBOW_MAX_DRIFT,
        warning: "Keep Your Elbow Still!",
    }),
};

/// Tracks the right arm
pub const SHOULDER_PRESS: AngleRule = AngleRule {
    joints: (JointId::RightHip, JointId::RightShoulder, JointId::RightElbow),
    enter: Threshold::Below(PRESS_LOWERED_ANGLE),
    rep: Threshold::Above(PRESS_EXTENDED_ANGLE),
    prompt: "Bring your elbow below the shoulder.",
    enter_feedback: "Press Up!",
    rep_feedback: "Great Press!",
    anchor: None,
};

/// Tracks the left arm
pub const SIDE_RAISE: AngleRule = AngleRule {
    joints: (JointId::LeftHip, JointId::LeftShoulder, JointId::LeftElbow),
    enter: Threshold::Below(RAISE_LOWERED_ANGLE),
    rep: Threshold::Above(RAISE_LIFTED_ANGLE),
    prompt: "Lower your arm to your side.",
    enter_feedback: "Raise arm to the side.",
    rep_feedback: "Excellent Raise!",
    anchor: None,
};

impl AngleRule {
    pub fn evaluate(&self, frame: &LandmarkFrame, state: &ClassifierState) -> Classification {
        let (a, b, c) = self.joints;
        let mut result = Classification::carried(state, self.prompt);

        let Some(degrees) = angle(frame, a, b, c) else {
            return result;
        };

        if self.enter.is_met(degrees) {
            result.phase = Phase::Down;
            if let Some(anchor) = &self.anchor {
                result.reference_point = frame.get(anchor.joint);
            }
            result.feedback = Feedback::info(self.enter_feedback);
        }

        // Checked against the phase as updated above, within the same frame
        if self.rep.is_met(degrees) && result.phase == Phase::Down {
            match self.anchor_violation(frame, &result) {
                Some(warning) => result.feedback = Feedback::warning(warning),
                None => result.count_rep(Phase::Up, self.rep_feedback),
            }
        }

        result
    }

    /// The warning to give if the anchor joint moved too far since it was captured.
    /// Without a captured position there is nothing to compare against, and the rep stands.
    fn anchor_violation(
        &self,
        frame: &LandmarkFrame,
        result: &Classification,
    ) -> Option<&'static str> {
        let anchor = self.anchor.as_ref()?;
        let start = result.reference_point?;
        let current = frame.get(anchor.joint)?;

        if distance_points(&start, &current) > anchor.max_drift {
            Some(anchor.warning)
        } else {
            None
        }
    }
}
