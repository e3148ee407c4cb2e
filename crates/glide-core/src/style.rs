//! Core style types: literals, placeholder values, steps, and snapshots.
//!
//! This module defines the fundamental types of the transition system:
//! - `StyleLiteral`: A concrete measured style value
//! - `StyleValue`: A declared value, which may be a literal or a placeholder
//! - `StyleStep`: One ordered position in a transition's style sequence
//! - `StyleSnapshot`: Property values captured from a live element

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A concrete style value as measured on a live element.
///
/// Computed styles are either textual (`"100px"`, `"rgba(0,0,0,0)"`) or
/// unitless numbers (`opacity`, `z-index`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleLiteral {
    /// Textual value, serialized the way a computed style reads.
    Text { value: String },
    /// Unitless numeric value.
    Number { value: f64 },
}

impl StyleLiteral {
    /// Try to extract a textual value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            Self::Number { .. } => None,
        }
    }

    /// Try to extract a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value } => Some(*value),
            Self::Text { .. } => None,
        }
    }
}

impl fmt::Display for StyleLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { value } => f.write_str(value),
            Self::Number { value } => write!(f, "{value}"),
        }
    }
}

impl From<&str> for StyleLiteral {
    fn from(v: &str) -> Self {
        Self::Text {
            value: v.to_string(),
        }
    }
}

impl From<String> for StyleLiteral {
    fn from(v: String) -> Self {
        Self::Text { value: v }
    }
}

impl From<f64> for StyleLiteral {
    fn from(v: f64) -> Self {
        Self::Number { value: v }
    }
}

/// A declared style value inside a step or state definition.
///
/// Placeholders are a closed variant set, never sentinel strings: `Auto`
/// stands for the element's natural value once the triggering mutation has
/// settled, `Current` for the element's computed value at transition start.
/// Both must resolve to a `StyleLiteral` before a keyframe is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleValue {
    /// A concrete declared value.
    Literal { value: StyleLiteral },
    /// The element's natural value after the mutation settles (`*`).
    Auto,
    /// The element's computed value at transition start (`!`).
    Current,
}

impl StyleValue {
    /// Create a literal style value.
    pub fn literal(value: impl Into<StyleLiteral>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Try to extract the literal value.
    pub fn as_literal(&self) -> Option<&StyleLiteral> {
        match self {
            Self::Literal { value } => Some(value),
            _ => None,
        }
    }

    /// Returns true for `Auto` and `Current` placeholders.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Auto | Self::Current)
    }
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        Self::literal(v)
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        Self::literal(v)
    }
}

impl From<StyleLiteral> for StyleValue {
    fn from(v: StyleLiteral) -> Self {
        Self::Literal { value: v }
    }
}

/// One ordered position in a transition's style sequence.
///
/// A step maps property names to declared values and may carry an explicit
/// timeline offset; steps without one are spaced evenly by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleStep {
    /// Declared property values for this step.
    pub styles: HashMap<String, StyleValue>,
    /// Explicit position in the timeline (0.0 to 1.0).
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f32>,
}

impl StyleStep {
    /// Create an empty step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a declared value for a property.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    /// Pin this step to an explicit timeline offset.
    pub fn at(mut self, offset: f32) -> Self {
        self.offset = Some(offset.clamp(0.0, 1.0));
        self
    }

    /// Get the declared value for a property.
    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.styles.get(property)
    }

    /// Iterate over the property names this step declares.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// Check if the step declares no styles.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// A snapshot of concrete style values captured from a live element.
///
/// Snapshots are immutable value captures: taken at a point in time, used
/// once per resolution, then discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSnapshot {
    /// Measured property values at the time of capture.
    pub values: HashMap<String, StyleLiteral>,
}

impl StyleSnapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot with the given values.
    pub fn with_values(values: HashMap<String, StyleLiteral>) -> Self {
        Self { values }
    }

    /// Record a measured value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<StyleLiteral>) {
        self.values.insert(property.into(), value.into());
    }

    /// Get a measured value.
    pub fn get(&self, property: &str) -> Option<&StyleLiteral> {
        self.values.get(property)
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the number of captured properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over all property-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StyleLiteral)> {
        self.values.iter()
    }
}
