//! Declarative trigger definitions: states, matchers, and transition rules.
//!
//! A trigger binds a name to a set of state style declarations and an
//! ordered list of transition rules. When the engine observes a state
//! change on an element carrying the trigger, the first rule whose matchers
//! accept the `(from, to)` pair produces a player.
//!
//! The reserved `void` state represents a detached element; element
//! insertion and removal are state changes from and to `void`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::easing::EasingFunction;
use crate::style::{StyleStep, StyleValue};

/// The reserved state of an element that is not attached to the document.
pub const VOID_STATE: &str = "void";

/// Matches one side of a transition rule against a state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateMatcher {
    /// Matches every state, including `void`.
    Any,
    /// Matches one named state.
    Value { value: String },
}

impl StateMatcher {
    /// Parse a matcher from its declaration form; `*` means any state.
    pub fn parse(s: &str) -> Self {
        if s == "*" {
            Self::Any
        } else {
            Self::Value {
                value: s.to_string(),
            }
        }
    }

    /// Check whether this matcher accepts a state value.
    pub fn matches(&self, state: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Value { value } => value == state,
        }
    }
}

/// Timing parameters shared by every player a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionTiming {
    /// Duration of the transition in milliseconds.
    pub duration_ms: f32,
    /// Delay before the transition starts in milliseconds.
    pub delay_ms: f32,
    /// Easing function applied to the transition's progress.
    pub easing: EasingFunction,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            delay_ms: 0.0,
            easing: EasingFunction::Ease,
        }
    }
}

/// One transition rule: matchers, style steps, and timing.
///
/// Rules with no explicit steps animate between the from-state and
/// to-state style declarations of their trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRule {
    /// Matcher for the state being left.
    pub from: StateMatcher,
    /// Matcher for the state being entered.
    pub to: StateMatcher,
    /// Ordered style steps; empty means "use the state styles".
    #[serde(default)]
    pub steps: Vec<StyleStep>,
    /// Timing for players produced by this rule.
    #[serde(default)]
    pub timing: TransitionTiming,
}

impl TransitionRule {
    /// Create a rule matching `from => to`; `*` on either side matches any
    /// state.
    pub fn between(from: &str, to: &str) -> Self {
        Self {
            from: StateMatcher::parse(from),
            to: StateMatcher::parse(to),
            steps: Vec::new(),
            timing: TransitionTiming::default(),
        }
    }

    /// Create a rule matching element insertion (`void => *`).
    pub fn enter() -> Self {
        Self::between(VOID_STATE, "*")
    }

    /// Create a rule matching element removal (`* => void`).
    pub fn leave() -> Self {
        Self::between("*", VOID_STATE)
    }

    /// Append a style step using a builder function.
    pub fn step<F>(mut self, builder: F) -> Self
    where
        F: FnOnce(StyleStep) -> StyleStep,
    {
        self.steps.push(builder(StyleStep::new()));
        self
    }

    /// Set the duration.
    pub fn duration_ms(mut self, duration: f32) -> Self {
        self.timing.duration_ms = duration;
        self
    }

    /// Set the delay.
    pub fn delay_ms(mut self, delay: f32) -> Self {
        self.timing.delay_ms = delay;
        self
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.timing.easing = easing;
        self
    }

    /// Check whether this rule accepts a `(from, to)` state pair.
    pub fn matches(&self, from: &str, to: &str) -> bool {
        self.from.matches(from) && self.to.matches(to)
    }
}

/// A named trigger: state style declarations plus transition rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerDefinition {
    /// Name of the trigger.
    pub name: String,
    /// Style declarations per state; the `*` state applies to any state
    /// without its own declaration.
    states: HashMap<String, HashMap<String, StyleValue>>,
    /// Transition rules in declaration order.
    transitions: Vec<TransitionRule>,
}

impl TriggerDefinition {
    /// Create a new trigger definition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: HashMap::new(),
            transitions: Vec::new(),
        }
    }

    /// Declare the styles an element holds in a state, using a builder
    /// function. The name `*` declares fallback styles for any state.
    pub fn state<F>(mut self, name: impl Into<String>, builder: F) -> Self
    where
        F: FnOnce(StyleStep) -> StyleStep,
    {
        self.states
            .insert(name.into(), builder(StyleStep::new()).styles);
        self
    }

    /// Append a transition rule.
    pub fn transition(mut self, rule: TransitionRule) -> Self {
        self.transitions.push(rule);
        self
    }

    /// Look up the style declaration for a state, falling back to the `*`
    /// state.
    pub fn state_styles(&self, state: &str) -> Option<&HashMap<String, StyleValue>> {
        self.states.get(state).or_else(|| self.states.get("*"))
    }

    /// Find the first rule accepting a `(from, to)` state pair.
    pub fn match_rule(&self, from: &str, to: &str) -> Option<&TransitionRule> {
        self.transitions.iter().find(|r| r.matches(from, to))
    }

    /// All property names this trigger can touch, across state declarations
    /// and rule steps.
    pub fn touched_properties(&self) -> Vec<String> {
        let mut props: Vec<String> = self
            .states
            .values()
            .flat_map(|styles| styles.keys().cloned())
            .chain(
                self.transitions
                    .iter()
                    .flat_map(|r| r.steps.iter())
                    .flat_map(|s| s.styles.keys().cloned()),
            )
            .collect();
        props.sort();
        props.dedup();
        props
    }
}
