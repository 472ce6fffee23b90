use serde::{Deserialize, Serialize};

use crate::Point2D;

/// The body joints the classifiers care about. Discriminants follow the
/// detector's (BlazePose, 33-point) landmark index scheme.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum JointId {
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
}

impl JointId {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One detector output row: landmark index plus pixel position
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub id: usize,
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn position(&self) -> Point2D {
        (self.x, self.y)
    }
}

/// All landmarks found in a single image, in detector order.
/// Empty when no body was detected.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    landmarks: Vec<Landmark>,
}

impl LandmarkFrame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        LandmarkFrame { landmarks }
    }

    /// Build a frame from plain positions; the position's place in the list is its index
    pub fn from_positions(positions: &[Point2D]) -> Self {
        LandmarkFrame {
            landmarks: positions
                .iter()
                .enumerate()
                .map(|(id, (x, y))| Landmark { id, x: *x, y: *y })
                .collect(),
        }
    }

    /// Position of a joint, or None if the detector did not report that far.
    /// A non-finite coordinate counts as not reported.
    pub fn get(&self, joint: JointId) -> Option<Point2D> {
        self.landmarks
            .get(joint.index())
            .map(Landmark::position)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}
