//! Keyframe resolution: style steps + snapshots → concrete keyframes.
//!
//! Resolution substitutes placeholder values against two immutable
//! snapshots: `Current` (`!`) reads the pre-transition snapshot, captured
//! when the state change was reported; `Auto` (`*`) reads the
//! post-transition snapshot, captured once the triggering mutation has
//! settled. The output sequence always runs from offset 0.0 to 1.0 and
//! contains no placeholders.
//!
//! Resolution is pure: the same steps against the same snapshots always
//! produce the same keyframes.

use crate::error::{ResolveError, ResolveResult};
use crate::keyframe::Keyframe;
use crate::style::{StyleSnapshot, StyleStep, StyleValue};

/// Resolve an ordered step sequence into keyframes.
///
/// Steps without explicit offsets are spaced evenly across the timeline;
/// explicit offsets are honored and validated. A single-step sequence
/// produces the same styles at offsets 0.0 and 1.0.
pub fn resolve(
    steps: &[StyleStep],
    pre: &StyleSnapshot,
    post: &StyleSnapshot,
) -> ResolveResult<Vec<Keyframe>> {
    if steps.is_empty() {
        return Err(ResolveError::EmptyTransition);
    }

    if steps.len() == 1 {
        let resolved = resolve_step(&steps[0], 0, pre, post)?;
        let mut start = Keyframe::new(0.0);
        start.styles = resolved.styles.clone();
        let mut end = Keyframe::new(1.0);
        end.styles = resolved.styles;
        return Ok(vec![start, end]);
    }

    let offsets = compute_offsets(steps)?;

    let mut frames = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let mut frame = resolve_step(step, index, pre, post)?;
        frame.offset = offsets[index];
        frames.push(frame);
    }
    Ok(frames)
}

/// Compute the timeline offset of every step.
///
/// Explicit offsets pass through; unset offsets get the positional value
/// `index / (count - 1)`. The resulting sequence must be monotonically
/// non-decreasing and span 0.0 to 1.0.
fn compute_offsets(steps: &[StyleStep]) -> ResolveResult<Vec<f32>> {
    let last = steps.len() - 1;
    let offsets: Vec<f32> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| step.offset.unwrap_or(i as f32 / last as f32))
        .collect();

    for (i, window) in offsets.windows(2).enumerate() {
        if window[1] < window[0] {
            return Err(ResolveError::InvalidOffsetOrdering {
                step: i + 1,
                offset: window[1],
                previous: window[0],
            });
        }
    }

    if offsets[0] != 0.0 || offsets[last] != 1.0 {
        return Err(ResolveError::IncompleteOffsetRange {
            first: offsets[0],
            last: offsets[last],
        });
    }

    Ok(offsets)
}

/// Resolve a single step's declared values into a keyframe with no offset
/// assigned yet.
fn resolve_step(
    step: &StyleStep,
    index: usize,
    pre: &StyleSnapshot,
    post: &StyleSnapshot,
) -> ResolveResult<Keyframe> {
    let mut frame = Keyframe::new(0.0);
    for (property, value) in &step.styles {
        let resolved = match value {
            StyleValue::Literal { value } => value.clone(),
            StyleValue::Current => lookup(pre, property, index)?,
            StyleValue::Auto => lookup(post, property, index)?,
        };
        frame.styles.insert(property.clone(), resolved);
    }
    Ok(frame)
}

fn lookup(
    snapshot: &StyleSnapshot,
    property: &str,
    step: usize,
) -> ResolveResult<crate::style::StyleLiteral> {
    snapshot
        .get(property)
        .cloned()
        .ok_or_else(|| ResolveError::MissingStyleProperty {
            property: property.to_string(),
            step,
        })
}
