//! Frame player
//!
//! Cycles through a sequence of frame snapshots at `fps`, rendering each into
//! its own display grid. The player holds copies of the frames, never the
//! editor's grids.
//!
//! Timing is deadline based. `play(now)` arms a single `PlaybackTimer`; the
//! host calls `poll(now)` from its clock (an interval or animation-frame
//! callback on the page, plain numbers in tests) and every elapsed interval
//! advances one frame. Arming always replaces the previous timer, so there is
//! never more than one live timer per player.

use serde_json::Value;

use crate::error::AnimResult;
use crate::models::animation::{check_uniform_size, frames_from_value, validate_fps};
use crate::models::{AnimationRecord, FrameRecord, Grid, GridView};

/// Repeating timer state, in milliseconds on the host clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackTimer {
    pub interval_ms: f64,
    pub next_due_ms: f64,
}

impl PlaybackTimer {
    fn start(now_ms: f64, fps: f64) -> Self {
        let interval_ms = 1000.0 / fps;
        Self {
            interval_ms,
            next_due_ms: now_ms + interval_ms,
        }
    }

    /// Number of ticks due at `now_ms`; moves the deadline past them
    fn fire(&mut self, now_ms: f64) -> u64 {
        if now_ms < self.next_due_ms {
            return 0;
        }
        let elapsed = ((now_ms - self.next_due_ms) / self.interval_ms).floor();
        let ticks = if elapsed < u64::MAX as f64 {
            elapsed as u64 + 1
        } else {
            u64::MAX
        };
        self.next_due_ms += ticks as f64 * self.interval_ms;
        // Sub-ulp intervals cannot move the deadline; re-arm from now instead
        if self.next_due_ms <= now_ms {
            self.next_due_ms = now_ms + self.interval_ms;
        }
        ticks
    }
}

#[derive(Clone, Debug)]
pub struct FramePlayer {
    grid: Grid,
    frames: Vec<FrameRecord>,
    fps: f64,
    current_frame_index: usize,
    timer: Option<PlaybackTimer>,
}

impl FramePlayer {
    /// Create a stopped player
    pub fn new(width: usize, height: usize, scale: f64, frames: Vec<FrameRecord>, fps: f64) -> Self {
        Self {
            grid: Grid::new(width, height, scale),
            frames,
            fps,
            current_frame_index: 0,
            timer: None,
        }
    }

    /// Create a stopped player from untyped frames; anything that is not a
    /// valid frame sequence leaves the player with no frames
    pub fn from_value(width: usize, height: usize, scale: f64, frames: &Value, fps: f64) -> Self {
        let frames = frames_from_value(frames).unwrap_or_else(|e| {
            log::warn!("Frame player created without frames: {}", e);
            Vec::new()
        });
        Self::new(width, height, scale, frames, fps)
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn current_frame_index(&self) -> usize {
        self.current_frame_index
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<PlaybackTimer> {
        self.timer
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn render(&self) -> GridView {
        self.grid.render()
    }

    /// Show frame `index`; out of range is a no-op
    pub fn set_frame(&mut self, index: usize) -> bool {
        let Some(frame) = self.frames.get(index) else {
            return false;
        };
        self.current_frame_index = index;
        self.grid.deserialize(frame);
        true
    }

    /// Advance one frame, wrapping to the first after the last
    pub fn next_frame(&mut self) {
        let next = if self.current_frame_index + 1 < self.frames.len() {
            self.current_frame_index + 1
        } else {
            0
        };
        self.set_frame(next);
    }

    /// Replace the frame sequence; every frame is checked before anything changes
    pub fn set_frames(&mut self, frames: Vec<FrameRecord>) -> AnimResult<()> {
        check_uniform_size(&frames)?;
        self.frames = frames;
        if self.current_frame_index >= self.frames.len() {
            self.current_frame_index = 0;
        }
        self.set_frame(self.current_frame_index);
        Ok(())
    }

    pub fn set_frames_value(&mut self, frames: &Value) -> AnimResult<()> {
        let frames = frames_from_value(frames)?;
        self.set_frames(frames)
    }

    /// Change the rate and restart playback so the new interval applies at once
    pub fn set_fps(&mut self, fps: f64, now_ms: f64) -> AnimResult<()> {
        validate_fps(fps)?;
        self.fps = fps;
        self.stop();
        self.play(now_ms);
        Ok(())
    }

    /// Start (or restart) playback from the current frame
    pub fn play(&mut self, now_ms: f64) {
        self.timer = None;
        self.set_frame(self.current_frame_index);
        self.timer = Some(PlaybackTimer::start(now_ms, self.fps));
    }

    pub fn stop(&mut self) {
        self.timer = None;
    }

    /// Advance for every interval that elapsed up to `now_ms`; returns the tick count
    pub fn poll(&mut self, now_ms: f64) -> u64 {
        let Some(timer) = self.timer.as_mut() else {
            return 0;
        };
        let ticks = timer.fire(now_ms);
        if ticks == 0 || self.frames.is_empty() {
            return ticks;
        }
        // A long stall (background tab) only needs the net movement rendered
        let steps = (ticks % self.frames.len() as u64) as usize;
        let target = (self.current_frame_index + steps) % self.frames.len();
        self.set_frame(target);
        ticks
    }

    /// Replace rate and frames from a validated document, rewind and play
    pub fn load_from_animation_record(&mut self, record: AnimationRecord, now_ms: f64) {
        let (fps, frames) = record.into_parts();
        self.fps = fps;
        self.frames = frames;
        self.current_frame_index = 0;
        self.play(now_ms);
    }

    /// Validate an untyped document and load it; nothing changes on error
    pub fn load_from_value(&mut self, value: &Value, now_ms: f64) -> AnimResult<()> {
        let record = AnimationRecord::from_value(value)?;
        self.load_from_animation_record(record, now_ms);
        Ok(())
    }

    /// Load a document fetched as text; nothing changes on error
    pub fn load_from_document(&mut self, text: &str, now_ms: f64) -> AnimResult<()> {
        let record = AnimationRecord::from_json(text)?;
        self.load_from_animation_record(record, now_ms);
        Ok(())
    }

    /// Current rate and frames as a document
    pub fn to_record(&self) -> AnimResult<AnimationRecord> {
        AnimationRecord::new(self.fps, self.frames.clone())
    }

    /// Current rate and frames as document text; an idle player has none
    pub fn to_json(&self) -> AnimResult<String> {
        Ok(self.to_record()?.to_json())
    }

    /// Apply the outcome of fetching a document from elsewhere
    ///
    /// A failed fetch or a rejected document is logged and the current
    /// animation keeps playing. Returns whether the new animation was loaded.
    pub fn apply_fetched(&mut self, fetched: AnimResult<AnimationRecord>, source: &str, now_ms: f64) -> bool {
        match fetched {
            Ok(record) => {
                self.load_from_animation_record(record, now_ms);
                log::info!("Playing {}", source);
                true
            }
            Err(e) => {
                log::error!("Could not load {}: {}", source, e);
                false
            }
        }
    }
}
