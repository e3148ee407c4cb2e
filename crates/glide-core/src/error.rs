//! Error types for keyframe resolution and engine operations.

use thiserror::Error;

/// Result type for keyframe resolution.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Result type for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors produced while resolving style steps into keyframes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// A placeholder referenced a property the relevant snapshot did not
    /// capture.
    #[error("no snapshot value for style property `{property}` in step {step}")]
    MissingStyleProperty {
        /// The property the placeholder referenced.
        property: String,
        /// Zero-based index of the step holding the placeholder.
        step: usize,
    },

    /// Explicit step offsets were not monotonically non-decreasing.
    #[error("step {step} has offset {offset} after {previous}; offsets must not decrease")]
    InvalidOffsetOrdering {
        /// Zero-based index of the offending step.
        step: usize,
        /// The offending offset.
        offset: f32,
        /// The offset of the preceding step.
        previous: f32,
    },

    /// Explicit offsets did not span the full timeline.
    #[error("step offsets must run from 0 to 1, got {first} to {last}")]
    IncompleteOffsetRange {
        /// Offset of the first step.
        first: f32,
        /// Offset of the last step.
        last: f32,
    },

    /// A transition was resolved with no style steps at all.
    #[error("transition contains no style steps")]
    EmptyTransition,
}

/// Errors produced by engine entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A state change referenced a trigger that was never registered on the
    /// element.
    #[error("no trigger `{trigger}` registered on element `{element}`")]
    UnknownTrigger {
        /// The element the call named.
        element: String,
        /// The trigger the call named.
        trigger: String,
    },

    /// Keyframe resolution failed during `flush`.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
