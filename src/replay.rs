//! Recorded landmark sessions, standing in for a live camera and detector.
//!
//! A recording is a list of frames, each with the image size and the detector's
//! landmark positions in index order. Paths ending in `.json` are read as JSON,
//! anything else as MessagePack.

use std::{
    path::Path,
    sync::Arc,
    thread,
    time::{Duration, Instant, SystemTime},
};

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Point2D,
    capture::{Frame, FrameSource, LandmarkDetector},
    landmarks::LandmarkFrame,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub width: u32,
    pub height: u32,
    /// Empty when no body was found in that frame
    pub landmarks: Vec<Point2D>,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<Vec<RecordedFrame>> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let frames: Vec<RecordedFrame> = if is_json(path) {
        serde_json::from_slice(&bytes).context("failed to parse JSON recording")?
    } else {
        rmp_serde::from_slice(&bytes).context("failed to decode MessagePack recording")?
    };
    info!(
        "Loaded recording with {} frames from \"{}\"",
        frames.len(),
        path.display()
    );
    Ok(frames)
}

pub fn save_recording<P: AsRef<Path>>(path: P, frames: &[RecordedFrame]) -> Result<()> {
    let path = path.as_ref();
    let bytes = if is_json(path) {
        serde_json::to_vec_pretty(frames)?
    } else {
        rmp_serde::to_vec(frames)?
    };
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// Time between frames at `fps`; None (no pacing) when the rate is not usable
fn frame_interval(fps: f32) -> Option<Duration> {
    if fps <= 0. {
        return None;
    }
    match Duration::try_from_secs_f32(1. / fps) {
        Ok(interval) => Some(interval),
        Err(e) => {
            warn!("Cannot pace replay at {} fps ({}); playing unpaced", fps, e);
            None
        }
    }
}

/// Build a frame source and matching detector over one recording
pub fn replay(
    frames: Vec<RecordedFrame>,
    fps: Option<f32>,
    looping: bool,
) -> (ReplaySource, RecordedDetector) {
    let frames = Arc::new(frames);
    let source = ReplaySource {
        frames: frames.clone(),
        cursor: 0,
        sequence: 0,
        frame_interval: fps.and_then(frame_interval),
        looping,
        last_read: None,
    };
    (source, RecordedDetector { frames })
}

pub struct ReplaySource {
    frames: Arc<Vec<RecordedFrame>>,
    cursor: usize,
    sequence: u64,
    frame_interval: Option<Duration>,
    looping: bool,
    last_read: Option<Instant>,
}

impl ReplaySource {
    /// Sleep as a camera would, so frames arrive at the recorded rate
    fn pace(&mut self) {
        if let (Some(interval), Some(last)) = (self.frame_interval, self.last_read) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
        }
        self.last_read = Some(Instant::now());
    }
}

impl FrameSource for ReplaySource {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.cursor >= self.frames.len() {
            if self.looping && !self.frames.is_empty() {
                debug!("Recording finished; looping");
                self.cursor = 0;
            } else {
                return Ok(None);
            }
        }
        self.pace();

        let recorded = &self.frames[self.cursor];
        let frame = Frame {
            sequence: self.sequence,
            width: recorded.width,
            height: recorded.height,
            pixels: Vec::new(),
            captured_at: SystemTime::now(),
        };
        self.cursor += 1;
        self.sequence += 1;
        Ok(Some(frame))
    }
}

/// Returns the landmarks recorded alongside each replayed frame
pub struct RecordedDetector {
    frames: Arc<Vec<RecordedFrame>>,
}

impl LandmarkDetector for RecordedDetector {
    fn detect(&mut self, frame: &Frame) -> Result<LandmarkFrame> {
        if self.frames.is_empty() {
            return Err(anyhow!("recording is empty"));
        }
        let index = (frame.sequence % self.frames.len() as u64) as usize;
        Ok(LandmarkFrame::from_positions(&self.frames[index].landmarks))
    }
}
