use std::{
    io,
    sync::Arc,
    thread::{self, JoinHandle},
    time::{Duration, SystemTime},
};

use anyhow::Result;
use log::{debug, error, info, warn};

use crate::{landmarks::LandmarkFrame, snapshot::SharedCoach, workout_log::WorkoutRecorder};

pub const DEFAULT_READ_RETRY: Duration = Duration::from_millis(10);

/// Consecutive failed reads before the user is told about it
const PERSISTENT_READ_FAILURES: u32 = 100;

/// One captured image. `pixels` is packed RGB8, and may be empty for sources
/// that carry no image data.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub captured_at: SystemTime,
}

pub trait FrameSource: Send {
    /// Block until the next frame is available.
    /// `Ok(None)` means the source has ended; `Err` is a failed read worth retrying.
    fn read_frame(&mut self) -> Result<Option<Frame>>;
}

pub trait LandmarkDetector: Send {
    /// Landmarks found in the frame; an empty frame if there is no body
    fn detect(&mut self, frame: &Frame) -> Result<LandmarkFrame>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iteration {
    Processed,
    ReadFailed,
    EndOfStream,
}

/// The capture-and-analyze loop: frame in, landmarks out, session updated
/// and published through the shared coach state
pub struct Producer<S, D, R> {
    source: S,
    detector: D,
    recorder: R,
    coach: SharedCoach,
    read_retry: Duration,
    failed_reads: u32,
}

impl<S: FrameSource, D: LandmarkDetector, R: WorkoutRecorder> Producer<S, D, R> {
    pub fn new(source: S, detector: D, recorder: R, coach: SharedCoach) -> Self {
        Producer {
            source,
            detector,
            recorder,
            coach,
            read_retry: DEFAULT_READ_RETRY,
            failed_reads: 0,
        }
    }

    pub fn with_read_retry(mut self, read_retry: Duration) -> Self {
        self.read_retry = read_retry;
        self
    }

    /// Run until stopped or the source ends. The stop flag is only checked
    /// between iterations.
    pub fn run(mut self) {
        info!("Producer started");
        while !self.coach.is_stopped() {
            if self.step() == Iteration::EndOfStream {
                info!("Frame source ended");
                break;
            }
        }
        info!("Producer stopped");
    }

    pub fn step(&mut self) -> Iteration {
        let frame = match self.source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Iteration::EndOfStream,
            Err(e) => {
                self.on_read_failure(e);
                return Iteration::ReadFailed;
            }
        };
        self.failed_reads = 0;

        let landmarks = match self.detector.detect(&frame) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                debug!("Detector failed on frame {}: {}", frame.sequence, e);
                LandmarkFrame::default()
            }
        };

        let finished =
            self.coach
                .process_frame(Arc::new(frame), landmarks, SystemTime::now());

        // Lock is released by now; the write may block
        if let Some(summary) = finished {
            match self.recorder.record(&summary) {
                Ok(()) => info!(
                    "Saved workout for {}: {} x {} {}",
                    summary.username, summary.set_goal, summary.rep_goal, summary.exercise
                ),
                Err(e) => {
                    error!("Failed to save workout history: {:#}", e);
                    self.coach
                        .report_persistence_error(summary.workout, &e.to_string());
                }
            }
        }

        Iteration::Processed
    }

    fn on_read_failure(&mut self, e: anyhow::Error) {
        self.failed_reads += 1;
        if self.failed_reads == 1 {
            warn!("Failed to read frame: {}; retrying", e);
        } else {
            debug!("Failed to read frame ({} in a row): {}", self.failed_reads, e);
        }
        if self.failed_reads == PERSISTENT_READ_FAILURES {
            error!("Camera has not delivered a frame in {} attempts", self.failed_reads);
            self.coach
                .report_warning("Camera is not responding. Check the connection.");
        }
        thread::sleep(self.read_retry);
    }
}

/// Start the producer on its own named thread
pub fn spawn_producer<S, D, R>(producer: Producer<S, D, R>) -> io::Result<JoinHandle<()>>
where
    S: FrameSource + 'static,
    D: LandmarkDetector + 'static,
    R: WorkoutRecorder + 'static,
{
    thread::Builder::new()
        .name(String::from("coach-producer"))
        .spawn(move || producer.run())
}
