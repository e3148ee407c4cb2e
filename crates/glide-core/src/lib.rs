//! # glide-core
//!
//! Declarative style transitions with auto-style keyframe resolution.
//!
//! Triggers bind named states and transition rules to elements. When an
//! element changes state, is inserted, or is removed, the engine resolves
//! the declared style steps into concrete keyframes. Two placeholder values
//! make transitions adapt to live content: `*` (`StyleValue::Auto`) stands
//! for an element's natural value once the triggering mutation has settled,
//! `!` (`StyleValue::Current`) for its computed value at transition start.
//!
//! # Architecture
//!
//! ```text
//! TriggerDefinition (states + rules)
//!         │ registered on elements
//!         ▼
//! AnimationEngine ──▶ pre/post StyleSnapshots (via StyleSampler)
//!         │ flush()         │
//!         ▼                 ▼
//! TransitionPlayer ◀── resolver::resolve(steps, pre, post)
//! ```
//!
//! Live style lookup goes through the [`StyleSampler`] capability, so the
//! whole pipeline runs against [`MemoryDocument`] in tests with no
//! rendering environment.
//!
//! # Quick start
//!
//! ```
//! use glide_core::{
//!     AnimationEngine, MemoryDocument, StyleValue, TransitionRule, TriggerDefinition,
//! };
//!
//! let mut doc = MemoryDocument::new();
//! doc.set_style("panel", "height", "100px");
//!
//! let trigger = TriggerDefinition::new("open")
//!     .state("void", |s| s.set("height", "0px"))
//!     .state("*", |s| s.set("height", StyleValue::Auto))
//!     .transition(TransitionRule::between("*", "*").duration_ms(1000.0));
//!
//! let mut engine = AnimationEngine::new();
//! engine.register_trigger("panel", trigger);
//! engine.insert_element("panel", &doc)?;
//! engine.flush(&doc)?;
//!
//! let players = engine.players();
//! let frames = players[0].keyframes();
//! assert_eq!(frames[0].get("height").unwrap().as_text(), Some("0px"));
//! assert_eq!(frames[1].get("height").unwrap().as_text(), Some("100px"));
//! # Ok::<(), glide_core::EngineError>(())
//! ```

pub mod easing;
pub mod engine;
pub mod error;
pub mod events;
pub mod interpolate;
pub mod keyframe;
pub mod player;
pub mod resolver;
pub mod sampler;
pub mod style;
pub mod trigger;

pub use easing::EasingFunction;
pub use engine::AnimationEngine;
pub use error::{EngineError, EngineResult, ResolveError, ResolveResult};
pub use events::{EventQueue, PlayerEvent};
pub use interpolate::Interpolate;
pub use keyframe::Keyframe;
pub use player::{PlayerId, PlayerState, TransitionPlayer};
pub use resolver::resolve;
pub use sampler::{MemoryDocument, StyleSampler};
pub use style::{StyleLiteral, StyleSnapshot, StyleStep, StyleValue};
pub use trigger::{StateMatcher, TransitionRule, TransitionTiming, TriggerDefinition, VOID_STATE};

/// Crate version for runtime compatibility checks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
