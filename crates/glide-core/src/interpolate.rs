//! Interpolation between resolved style values.
//!
//! Numeric literals interpolate linearly. Textual literals have no numeric
//! midpoint, so they switch discretely at the halfway mark of the segment
//! being sampled, which is how non-numeric values behave in web animation
//! runtimes.

use std::collections::HashMap;

use crate::keyframe::{segment_at, Keyframe};
use crate::style::StyleLiteral;

/// Trait for values that can be interpolated toward another value.
pub trait Interpolate: Sized {
    /// Interpolate between self and `to` at factor `t` (0.0 = self,
    /// 1.0 = to).
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * f64::from(t)
    }
}

impl Interpolate for StyleLiteral {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (Self::Number { value: from }, Self::Number { value: to_val }) => Self::Number {
                value: from.interpolate(to_val, t),
            },
            // No numeric midpoint exists, switch at the segment's halfway mark.
            _ => {
                if t < 0.5 {
                    self.clone()
                } else {
                    to.clone()
                }
            }
        }
    }
}

/// Sample a resolved keyframe sequence at a timeline position.
///
/// Every property declared in the bracketing segment is interpolated; a
/// property absent from one side holds the other side's value.
pub fn sample_keyframes(frames: &[Keyframe], position: f32) -> HashMap<String, StyleLiteral> {
    let mut styles = HashMap::new();
    let Some((from, to, local)) = segment_at(frames, position) else {
        return styles;
    };

    for (property, from_value) in &from.styles {
        let to_value = to.get(property).unwrap_or(from_value);
        styles.insert(property.clone(), from_value.interpolate(to_value, local));
    }
    for (property, to_value) in &to.styles {
        if !styles.contains_key(property) {
            styles.insert(property.clone(), to_value.clone());
        }
    }

    styles
}
