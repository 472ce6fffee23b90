pub mod capture;
pub mod coach_config;
pub mod exercises;
pub mod geometry_utils;
pub mod landmarks;
pub mod launch;
pub mod presentation;
pub mod replay;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod workout_log;

/// A point in image (pixel) space; y grows downwards
pub type Point2D = (f32, f32);
