//! Animation document
//!
//! `{ "fps": <number > 0>, "frames": [ {width, height, cells}, ... ] }`
//!
//! Documents written by older pages store `fps` as the slider's string value, so
//! a numeric string is accepted on input; output always writes a number.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::grid::FrameRecord;
use crate::error::{AnimError, AnimResult};

/// A frame sequence plus its playback rate
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "serde_json::Value")]
pub struct AnimationRecord {
    fps: f64,
    frames: Vec<FrameRecord>,
}

impl AnimationRecord {
    pub fn new(fps: f64, frames: Vec<FrameRecord>) -> AnimResult<Self> {
        validate_fps(fps)?;
        if frames.is_empty() {
            return Err(AnimError::invalid_animation("'frames' must not be empty"));
        }
        check_uniform_size(&frames)?;
        Ok(Self { fps, frames })
    }

    /// `count` blank frames of one size
    pub fn blank(fps: f64, width: usize, height: usize, count: usize) -> AnimResult<Self> {
        Self::new(fps, vec![FrameRecord::blank(width, height); count.max(1)])
    }

    /// Check an untyped JSON document; the whole document is checked before
    /// anything is returned
    pub fn from_value(value: &Value) -> AnimResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| AnimError::invalid_animation("expected an object"))?;
        let fps = parse_fps(obj.get("fps"))?;
        let frames = frames_from_value(obj.get("frames").unwrap_or(&Value::Null))?;
        Self::new(fps, frames)
    }

    pub fn from_json(text: &str) -> AnimResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn to_json(&self) -> String {
        // A validated record only holds strings and finite numbers
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn into_parts(self) -> (f64, Vec<FrameRecord>) {
        (self.fps, self.frames)
    }
}

impl TryFrom<Value> for AnimationRecord {
    type Error = AnimError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Parse a frame sequence, failing on the first invalid frame
pub fn frames_from_value(value: &Value) -> AnimResult<Vec<FrameRecord>> {
    let items = value
        .as_array()
        .ok_or_else(|| AnimError::invalid_animation("'frames' should be an array"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            FrameRecord::from_value(frame)
                .map_err(|e| AnimError::invalid_animation(format!("frame {}: {}", i, e)))
        })
        .collect()
}

/// All frames must share the first frame's width and height
pub fn check_uniform_size(frames: &[FrameRecord]) -> AnimResult<()> {
    let Some(first) = frames.first() else {
        return Ok(());
    };
    match frames.iter().position(|f| !f.same_size(first)) {
        Some(i) => Err(AnimError::invalid_animation(format!(
            "frame {} is {}x{}, expected {}x{}",
            i,
            frames[i].width(),
            frames[i].height(),
            first.width(),
            first.height()
        ))),
        None => Ok(()),
    }
}

pub fn validate_fps(fps: f64) -> AnimResult<()> {
    if fps.is_finite() && fps > 0.0 {
        Ok(())
    } else {
        Err(AnimError::invalid_animation(format!(
            "'fps' should be a positive number, got {}",
            fps
        )))
    }
}

fn parse_fps(value: Option<&Value>) -> AnimResult<f64> {
    let fps = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AnimError::invalid_animation("'fps' should be a positive number"))?;
    validate_fps(fps)?;
    Ok(fps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(c: &str) -> Value {
        json!({"width": 2, "height": 1, "cells": [c, " "]})
    }

    #[test]
    fn test_accepts_valid_document() {
        let doc = json!({"fps": 12, "frames": [frame("a"), frame("b")]});
        let anim = AnimationRecord::from_value(&doc).unwrap();
        assert_eq!(anim.fps(), 12.0);
        assert_eq!(anim.frames().len(), 2);
        assert_eq!(anim.frames()[1].cell(0, 0), Some("b"));
    }

    #[test]
    fn test_fps_string_is_accepted_and_written_as_number() {
        let anim = AnimationRecord::from_value(&json!({"fps": "8", "frames": [frame("a")]})).unwrap();
        assert_eq!(anim.fps(), 8.0);
        let out: Value = serde_json::from_str(&anim.to_json()).unwrap();
        assert_eq!(out["fps"], json!(8.0));
        assert_eq!(out["frames"][0]["cells"][0], json!("a"));
    }

    #[test]
    fn test_rejects_bad_fps() {
        for fps in [json!(0), json!(-3), json!("abc"), json!(null), json!(true)] {
            let doc = json!({"fps": fps, "frames": [frame("a")]});
            assert!(AnimationRecord::from_value(&doc).is_err(), "fps {:?}", doc["fps"]);
        }
    }

    #[test]
    fn test_rejects_bad_frames() {
        assert!(AnimationRecord::from_value(&json!({"fps": 1, "frames": {}})).is_err());
        assert!(AnimationRecord::from_value(&json!({"fps": 1, "frames": []})).is_err());
        assert!(AnimationRecord::from_value(&json!({"fps": 1})).is_err());
        let short = json!({"width": 2, "height": 1, "cells": ["a"]});
        let err = AnimationRecord::from_value(&json!({"fps": 1, "frames": [frame("a"), short]}))
            .unwrap_err();
        assert!(err.to_string().contains("frame 1"));
    }

    #[test]
    fn test_rejects_mixed_sizes() {
        let big = json!({"width": 1, "height": 1, "cells": ["x"]});
        let err = AnimationRecord::from_value(&json!({"fps": 1, "frames": [frame("a"), big]}))
            .unwrap_err();
        assert!(matches!(err, AnimError::InvalidAnimation(_)));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        assert!(matches!(AnimationRecord::from_json("{nope"), Err(AnimError::Json(_))));
    }

    #[test]
    fn test_blank() {
        let anim = AnimationRecord::blank(6.0, 12, 8, 3).unwrap();
        assert_eq!(anim.frames().len(), 3);
        assert!(anim.frames().iter().all(|f| f.cells().iter().all(|c| c == " ")));
    }
}
