use nalgebra::Vector2;

use crate::{
    Point2D,
    landmarks::{JointId, LandmarkFrame},
};

fn to_vector(p: &Point2D) -> Vector2<f64> {
    Vector2::new(p.0 as f64, p.1 as f64)
}

pub fn distance_points(a: &Point2D, b: &Point2D) -> f32 {
    (to_vector(a) - to_vector(b)).norm() as f32
}

/// Return the unsigned angle (in degrees) at vertex `b`, between the rays
/// `b -> a` and `b -> c`.
///
/// Computed from the difference of the two rays' polar angles and folded
/// into the range [0, 180], so the winding order of the three points
/// does not matter.
pub fn angle_between(a: &Point2D, b: &Point2D, c: &Point2D) -> f32 {
    let vertex = to_vector(b);
    let ray_a = to_vector(a) - vertex;
    let ray_c = to_vector(c) - vertex;

    let radians = ray_c.y.atan2(ray_c.x) - ray_a.y.atan2(ray_a.x);
    let mut degrees = radians.abs().to_degrees();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }

    degrees.clamp(0.0, 180.0) as f32
}

/// Angle at joint `b` formed with joints `a` and `c`, or None if any of
/// the three joints is missing from the frame
pub fn angle(frame: &LandmarkFrame, a: JointId, b: JointId, c: JointId) -> Option<f32> {
    let a = frame.get(a)?;
    let b = frame.get(b)?;
    let c = frame.get(c)?;
    Some(angle_between(&a, &b, &c)).filter(|degrees| degrees.is_finite())
}

/// Pixel distance between two joints, or None if either is missing
pub fn distance(frame: &LandmarkFrame, a: JointId, b: JointId) -> Option<f32> {
    let a = frame.get(a)?;
    let b = frame.get(b)?;
    Some(distance_points(&a, &b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_angle_easy_cases() {
        assert!(close(angle_between(&(0., 0.), &(1., 0.), &(2., 0.)), 180.)); // straight
        assert!(close(angle_between(&(2., 5.), &(1., 1.), &(2., 5.)), 0.)); // folded
        assert!(close(angle_between(&(1., 0.), &(0., 0.), &(0., 1.)), 90.));
        assert!(close(angle_between(&(0., 1.), &(0., 0.), &(1., 0.)), 90.)); // winding swapped
        assert!(close(angle_between(&(1., 1.), &(0., 0.), &(1., 0.)), 45.));
    }

    #[test]
    fn test_angle_wraps_past_half_turn() {
        // Polar angles of 170 and -170 degrees: raw difference is 340, folded is 20
        let theta = 170f32.to_radians();
        let a = (theta.cos() * 100., theta.sin() * 100.);
        let c = (theta.cos() * 100., -theta.sin() * 100.);
        assert!(close(angle_between(&a, &(0., 0.), &c), 20.));
    }

    #[test]
    fn test_distance_points() {
        assert_eq!(distance_points(&(0., 0.), &(3., 4.)), 5.);
        assert_eq!(distance_points(&(10., 10.), &(10., 10.)), 0.);
    }

    #[test]
    fn test_missing_joints_are_unavailable() {
        let empty = LandmarkFrame::default();
        assert_eq!(
            angle(
                &empty,
                JointId::LeftShoulder,
                JointId::LeftElbow,
                JointId::LeftWrist
            ),
            None
        );
        assert_eq!(distance(&empty, JointId::LeftWrist, JointId::RightWrist), None);

        // Upper body only: hips are past the end of the list
        let partial = LandmarkFrame::from_positions(&[(5., 5.); 17]);
        assert_eq!(
            angle(
                &partial,
                JointId::LeftHip,
                JointId::LeftShoulder,
                JointId::LeftElbow
            ),
            None
        );
        assert_eq!(
            distance(&partial, JointId::LeftWrist, JointId::RightWrist),
            Some(0.)
        );
    }

    #[test]
    fn test_non_finite_landmarks_are_unavailable() {
        let mut positions = vec![(100., 100.); 33];
        positions[JointId::LeftShoulder.index()] = (100., 0.);
        positions[JointId::LeftWrist.index()] = (f32::NAN, 200.);
        let frame = LandmarkFrame::from_positions(&positions);
        assert_eq!(
            angle(
                &frame,
                JointId::LeftShoulder,
                JointId::LeftElbow,
                JointId::LeftWrist
            ),
            None
        );
        assert_eq!(distance(&frame, JointId::LeftWrist, JointId::RightWrist), None);
    }

    proptest! {
        #[test]
        fn angle_stays_within_half_turn(
            ax in -2000f32..2000., ay in -2000f32..2000.,
            bx in -2000f32..2000., by in -2000f32..2000.,
            cx in -2000f32..2000., cy in -2000f32..2000.,
        ) {
            let degrees = angle_between(&(ax, ay), &(bx, by), &(cx, cy));
            prop_assert!((0.0..=180.0).contains(&degrees));
        }
    }
}
