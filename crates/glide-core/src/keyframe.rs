//! Resolved keyframes and timeline segment lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::style::StyleLiteral;

/// A fully resolved point in a transition timeline.
///
/// Keyframes carry only concrete values: placeholder resolution happens
/// before a keyframe is constructed, never after. A resolved sequence is
/// monotonically non-decreasing in offset, starting at 0.0 and ending at 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position in the transition timeline (0.0 to 1.0).
    pub offset: f32,
    /// Concrete property values at this keyframe.
    pub styles: HashMap<String, StyleLiteral>,
}

impl Keyframe {
    /// Create a new keyframe at the given offset.
    pub fn new(offset: f32) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            styles: HashMap::new(),
        }
    }

    /// Set a property value for this keyframe.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<StyleLiteral>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    /// Get a property value from this keyframe.
    pub fn get(&self, property: &str) -> Option<&StyleLiteral> {
        self.styles.get(property)
    }
}

/// Find the keyframes bracketing a timeline position.
///
/// Returns `(from, to, local_progress)` where `local_progress` runs 0.0 to
/// 1.0 between the two frames. Returns `None` for an empty sequence.
pub fn segment_at(frames: &[Keyframe], offset: f32) -> Option<(&Keyframe, &Keyframe, f32)> {
    if frames.is_empty() {
        return None;
    }

    let offset = offset.clamp(0.0, 1.0);

    let mut from_idx = 0;
    let mut to_idx = 0;
    for (i, frame) in frames.iter().enumerate() {
        if frame.offset <= offset {
            from_idx = i;
        }
        if frame.offset >= offset {
            to_idx = i;
            break;
        }
        to_idx = i;
    }

    let from = &frames[from_idx];
    let to = &frames[to_idx];

    let range = to.offset - from.offset;
    let local_progress = if from_idx == to_idx || range <= 0.0 {
        0.0
    } else {
        (offset - from.offset) / range
    };

    Some((from, to, local_progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_frames() -> Vec<Keyframe> {
        vec![
            Keyframe::new(0.0).set("height", "0px"),
            Keyframe::new(0.5).set("height", "50px"),
            Keyframe::new(1.0).set("height", "100px"),
        ]
    }

    #[test]
    fn test_keyframe_builder() {
        let frame = Keyframe::new(0.25).set("height", "10px").set("opacity", 0.5);
        assert_eq!(frame.offset, 0.25);
        assert_eq!(frame.get("height").unwrap().as_text(), Some("10px"));
        assert_eq!(frame.get("opacity").unwrap().as_number(), Some(0.5));
        assert!(frame.get("width").is_none());
    }

    #[test]
    fn test_keyframe_offset_clamped() {
        assert_eq!(Keyframe::new(1.5).offset, 1.0);
        assert_eq!(Keyframe::new(-0.2).offset, 0.0);
    }

    #[test]
    fn test_segment_at_brackets() {
        let frames = three_frames();

        let (from, to, t) = segment_at(&frames, 0.25).unwrap();
        assert_eq!(from.offset, 0.0);
        assert_eq!(to.offset, 0.5);
        assert!((t - 0.5).abs() < 1e-6);

        let (from, to, t) = segment_at(&frames, 0.75).unwrap();
        assert_eq!(from.offset, 0.5);
        assert_eq!(to.offset, 1.0);
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_segment_at_exact_frame() {
        let frames = three_frames();

        let (from, to, t) = segment_at(&frames, 0.5).unwrap();
        assert_eq!(from.offset, 0.5);
        assert_eq!(to.offset, 0.5);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_segment_at_bounds() {
        let frames = three_frames();

        let (from, _, t) = segment_at(&frames, 0.0).unwrap();
        assert_eq!(from.offset, 0.0);
        assert_eq!(t, 0.0);

        let (_, to, _) = segment_at(&frames, 1.0).unwrap();
        assert_eq!(to.offset, 1.0);

        // Out-of-range positions clamp
        let (_, to, _) = segment_at(&frames, 2.0).unwrap();
        assert_eq!(to.offset, 1.0);
    }

    #[test]
    fn test_segment_at_empty() {
        assert!(segment_at(&[], 0.5).is_none());
    }
}
