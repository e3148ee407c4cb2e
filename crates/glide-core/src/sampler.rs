//! Live style lookup behind a capability trait.
//!
//! The engine never reads styles from a rendering environment directly; it
//! goes through `StyleSampler`, so resolution works the same against a real
//! document or the in-memory `MemoryDocument` used in tests.

use std::collections::HashMap;

use crate::style::{StyleLiteral, StyleSnapshot};

/// Read access to an element's current computed styles.
///
/// Snapshots taken through this trait are immutable value captures; the
/// engine takes one per resolution and discards it afterwards.
pub trait StyleSampler {
    /// Read the current computed value of one property on an element.
    ///
    /// Returns `None` when the element or the property is absent.
    fn computed_style(&self, element: &str, property: &str) -> Option<StyleLiteral>;

    /// Capture the given properties of an element into a snapshot.
    ///
    /// Absent properties are skipped; resolution reports them only if a
    /// placeholder actually needs them.
    fn snapshot(&self, element: &str, properties: &[String]) -> StyleSnapshot {
        let mut snapshot = StyleSnapshot::new();
        for property in properties {
            if let Some(value) = self.computed_style(element, property) {
                snapshot.set(property.clone(), value);
            }
        }
        snapshot
    }
}

/// An in-memory host document.
///
/// Holds per-element style maps and stands in for a live rendering
/// environment: tests mutate it between engine calls to model layout
/// settling and DOM mutation. An element should stay present until the
/// `flush` that animates its removal has run, so post-snapshots can still
/// read it.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: HashMap<String, HashMap<String, StyleLiteral>>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element with no styles.
    pub fn insert_element(&mut self, element: impl Into<String>) {
        self.elements.entry(element.into()).or_default();
    }

    /// Remove an element and all its styles.
    pub fn remove_element(&mut self, element: &str) {
        self.elements.remove(element);
    }

    /// Check if an element is present.
    pub fn contains(&self, element: &str) -> bool {
        self.elements.contains_key(element)
    }

    /// Set a style on an element, inserting the element if needed.
    pub fn set_style(
        &mut self,
        element: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<StyleLiteral>,
    ) {
        self.elements
            .entry(element.into())
            .or_default()
            .insert(property.into(), value.into());
    }

    /// Read a style from an element.
    pub fn style(&self, element: &str, property: &str) -> Option<&StyleLiteral> {
        self.elements.get(element)?.get(property)
    }

    /// Apply a batch of styles to an element, as a player writes its
    /// sampled values back.
    pub fn apply_styles(&mut self, element: &str, styles: &HashMap<String, StyleLiteral>) {
        let entry = self.elements.entry(element.to_string()).or_default();
        for (property, value) in styles {
            entry.insert(property.clone(), value.clone());
        }
    }
}

impl StyleSampler for MemoryDocument {
    fn computed_style(&self, element: &str, property: &str) -> Option<StyleLiteral> {
        self.style(element, property).cloned()
    }
}
