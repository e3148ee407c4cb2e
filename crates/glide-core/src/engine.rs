//! The animation engine: trigger registry, change queue, and players.
//!
//! The engine is the synchronization point between a host document and the
//! keyframe resolver. State changes and element lifecycle notifications are
//! queued with a pre-snapshot captured synchronously at the call; `flush`
//! captures post-snapshots once the host's mutation has settled, resolves
//! keyframes, and produces players. One player exists per (element,
//! trigger) pair; a newer transition replaces the in-flight one.
//!
//! ```text
//! set_state / insert_element / remove_element     (pre-snapshot taken here)
//!         │
//!         ▼
//!   pending changes ── flush(sampler) ──▶ players   (post-snapshot + resolve)
//!         │                                  │
//!         ▼                                  ▼
//!     drain_events ◀────────────────── tick(delta_ms)
//! ```

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{EngineError, EngineResult};
use crate::events::{EventQueue, PlayerEvent};
use crate::player::{PlayerId, TransitionPlayer};
use crate::resolver;
use crate::sampler::StyleSampler;
use crate::style::{StyleSnapshot, StyleStep, StyleValue};
use crate::trigger::{TriggerDefinition, VOID_STATE};

/// The anonymous state an element holds after insertion, before any
/// explicit value is set.
const ATTACHED_STATE: &str = "";

/// A state change waiting for the next `flush`.
#[derive(Debug, Clone)]
struct PendingChange {
    element: String,
    trigger: String,
    from: String,
    to: String,
    /// Live styles captured synchronously when the change was reported.
    pre: StyleSnapshot,
}

/// Central coordinator for declarative style transitions.
#[derive(Debug, Default)]
pub struct AnimationEngine {
    /// Registered triggers indexed by (element, trigger name).
    triggers: HashMap<(String, String), TriggerDefinition>,

    /// Current state value per (element, trigger name).
    states: HashMap<(String, String), String>,

    /// Changes queued since the last flush, in report order.
    pending: Vec<PendingChange>,

    /// Live players indexed by their ID.
    players: HashMap<PlayerId, TransitionPlayer>,

    /// Index from (element, trigger name) to the one live player for the
    /// pair.
    player_index: HashMap<(String, String), PlayerId>,

    /// Player IDs in creation order.
    order: Vec<PlayerId>,

    /// Queue of lifecycle events emitted during flush and tick.
    events: EventQueue,
}

impl AnimationEngine {
    /// Create a new engine with no registered triggers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger on an element. The trigger starts in the `void`
    /// state.
    pub fn register_trigger(&mut self, element: &str, definition: TriggerDefinition) {
        let key = (element.to_string(), definition.name.clone());
        self.states.insert(key.clone(), VOID_STATE.to_string());
        self.triggers.insert(key, definition);
    }

    /// Get the current state value of a trigger on an element.
    pub fn current_state(&self, element: &str, trigger: &str) -> Option<&str> {
        self.states
            .get(&(element.to_string(), trigger.to_string()))
            .map(String::as_str)
    }

    /// Report a state change on a trigger.
    ///
    /// The pre-snapshot is captured synchronously inside this call:
    /// whatever the sampler reads now is what `Current` (`!`) placeholders
    /// resolve to. Reporting another change for the same pair before
    /// `flush` retargets the destination but keeps the first snapshot.
    pub fn set_state(
        &mut self,
        element: &str,
        trigger: &str,
        value: &str,
        sampler: &dyn StyleSampler,
    ) -> EngineResult<()> {
        let key = (element.to_string(), trigger.to_string());
        let definition = self
            .triggers
            .get(&key)
            .ok_or_else(|| EngineError::UnknownTrigger {
                element: element.to_string(),
                trigger: trigger.to_string(),
            })?;

        if let Some(change) = self
            .pending
            .iter_mut()
            .find(|c| c.element == key.0 && c.trigger == key.1)
        {
            trace!("retargeting pending change on `{element}` `{trigger}` to `{value}`");
            change.to = value.to_string();
            self.states.insert(key, value.to_string());
            return Ok(());
        }

        let from = self
            .states
            .get(&key)
            .cloned()
            .unwrap_or_else(|| VOID_STATE.to_string());
        if from == value {
            trace!("ignoring no-op state change on `{element}` `{trigger}`");
            return Ok(());
        }

        let pre = sampler.snapshot(element, &definition.touched_properties());
        self.pending.push(PendingChange {
            element: key.0.clone(),
            trigger: key.1.clone(),
            from,
            to: value.to_string(),
            pre,
        });
        self.states.insert(key, value.to_string());
        Ok(())
    }

    /// Report that an element was attached to the document.
    ///
    /// Every trigger on the element still in `void` moves to the anonymous
    /// attached state, which `*` matchers and the `*` state declaration
    /// cover.
    pub fn insert_element(
        &mut self,
        element: &str,
        sampler: &dyn StyleSampler,
    ) -> EngineResult<()> {
        for trigger in self.triggers_on(element) {
            if self.current_state(element, &trigger) == Some(VOID_STATE) {
                self.set_state(element, &trigger, ATTACHED_STATE, sampler)?;
            }
        }
        Ok(())
    }

    /// Report that an element is being detached from the document.
    ///
    /// Every trigger on the element moves to `void`. The host should keep
    /// the element readable until the next `flush` so post-snapshots can
    /// still sample it.
    pub fn remove_element(
        &mut self,
        element: &str,
        sampler: &dyn StyleSampler,
    ) -> EngineResult<()> {
        for trigger in self.triggers_on(element) {
            if self.current_state(element, &trigger) != Some(VOID_STATE) {
                self.set_state(element, &trigger, VOID_STATE, sampler)?;
            }
        }
        Ok(())
    }

    fn triggers_on(&self, element: &str) -> Vec<String> {
        self.triggers
            .keys()
            .filter(|(e, _)| e == element)
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// Process every pending change into a player.
    ///
    /// Post-snapshots are captured here, so the host's mutation must have
    /// settled before calling. Changes with no matching rule are skipped;
    /// a resolution failure aborts the flush with the error. Returns the
    /// number of players created.
    pub fn flush(&mut self, sampler: &dyn StyleSampler) -> EngineResult<usize> {
        let changes = std::mem::take(&mut self.pending);
        let mut created = 0;

        for change in changes {
            let key = (change.element.clone(), change.trigger.clone());
            let definition = &self.triggers[&key];

            let Some(rule) = definition.match_rule(&change.from, &change.to) else {
                trace!(
                    "no rule on `{}` `{}` for `{}` => `{}`",
                    change.element, change.trigger, change.from, change.to
                );
                continue;
            };

            let post = sampler.snapshot(&change.element, &definition.touched_properties());
            let steps = build_steps(definition, rule, &change.from, &change.to);
            let keyframes = resolver::resolve(&steps, &change.pre, &post)?;

            let player = TransitionPlayer::new(
                change.element.clone(),
                change.trigger.clone(),
                keyframes,
                rule.timing,
            );
            let new_id = player.id;

            if let Some(old_id) = self.player_index.insert(key, new_id) {
                self.players.remove(&old_id);
                self.order.retain(|id| *id != old_id);
                self.events.push(PlayerEvent::Replaced {
                    old: old_id,
                    new: new_id,
                    element: change.element.clone(),
                    trigger: change.trigger.clone(),
                });
            }

            debug!(
                "started player for `{}` `{}`: `{}` => `{}`",
                change.element, change.trigger, change.from, change.to
            );
            self.events.push(PlayerEvent::Started {
                player: new_id,
                element: change.element,
                trigger: change.trigger,
            });
            self.order.push(new_id);
            self.players.insert(new_id, player);
            created += 1;
        }

        Ok(created)
    }

    /// Advance all players by `delta_ms`, pruning and reporting the ones
    /// that finish.
    pub fn tick(&mut self, delta_ms: f32) {
        let mut finished = Vec::new();
        for (id, player) in self.players.iter_mut() {
            if !player.update(delta_ms) {
                finished.push(*id);
            }
        }

        for id in finished {
            if let Some(player) = self.players.remove(&id) {
                self.unindex(&player, id);
                self.events.push(PlayerEvent::Finished {
                    player: id,
                    element: player.element,
                    trigger: player.trigger,
                });
            }
        }
    }

    /// Live players in creation order.
    pub fn players(&self) -> Vec<&TransitionPlayer> {
        self.order
            .iter()
            .filter_map(|id| self.players.get(id))
            .collect()
    }

    /// Get a live player by ID.
    pub fn player(&self, id: PlayerId) -> Option<&TransitionPlayer> {
        self.players.get(&id)
    }

    /// Number of live players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Check whether any player is still active.
    pub fn has_active_players(&self) -> bool {
        self.players.values().any(TransitionPlayer::is_active)
    }

    /// Destroy a player before completion.
    ///
    /// No rollback happens: the host document keeps whatever values it
    /// holds, and the next transition's `Current` placeholders re-sample
    /// live state. Returns `false` for an unknown ID.
    pub fn destroy_player(&mut self, id: PlayerId) -> bool {
        let Some(mut player) = self.players.remove(&id) else {
            return false;
        };
        player.destroy();
        self.unindex(&player, id);
        self.events.push(PlayerEvent::Destroyed {
            player: id,
            element: player.element,
            trigger: player.trigger,
        });
        true
    }

    /// Jump a player to the end of its timeline and report it finished.
    /// Returns `false` for an unknown ID.
    pub fn finish_player(&mut self, id: PlayerId) -> bool {
        let Some(mut player) = self.players.remove(&id) else {
            return false;
        };
        player.finish();
        self.unindex(&player, id);
        self.events.push(PlayerEvent::Finished {
            player: id,
            element: player.element,
            trigger: player.trigger,
        });
        true
    }

    /// Pause a player. Returns `false` for an unknown ID.
    pub fn pause_player(&mut self, id: PlayerId) -> bool {
        match self.players.get_mut(&id) {
            Some(player) => {
                player.pause();
                true
            }
            None => false,
        }
    }

    /// Resume a paused player. Returns `false` for an unknown ID.
    pub fn resume_player(&mut self, id: PlayerId) -> bool {
        match self.players.get_mut(&id) {
            Some(player) => {
                player.resume();
                true
            }
            None => false,
        }
    }

    fn unindex(&mut self, player: &TransitionPlayer, id: PlayerId) {
        let key = (player.element.clone(), player.trigger.clone());
        if self.player_index.get(&key) == Some(&id) {
            self.player_index.remove(&key);
        }
        self.order.retain(|other| *other != id);
    }

    /// Drain all pending lifecycle events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = PlayerEvent> + '_ {
        self.events.drain()
    }

    /// Check if there are any pending events.
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get the number of pending events.
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }
}

/// Build the step sequence for a matched rule.
///
/// Explicit rule steps win; otherwise the from-state and to-state style
/// declarations become a two-step sequence. `Auto` placeholders in every
/// step but the last are normalized to `Current`: before the final
/// keyframe, the "natural" value of a property is the value the element
/// holds at transition start.
fn build_steps(
    definition: &TriggerDefinition,
    rule: &crate::trigger::TransitionRule,
    from: &str,
    to: &str,
) -> Vec<StyleStep> {
    let mut steps = if rule.steps.is_empty() {
        let from_step = StyleStep {
            styles: definition.state_styles(from).cloned().unwrap_or_default(),
            offset: None,
        };
        let to_step = StyleStep {
            styles: definition.state_styles(to).cloned().unwrap_or_default(),
            offset: None,
        };
        vec![from_step, to_step]
    } else {
        rule.steps.clone()
    };

    let last = steps.len().saturating_sub(1);
    for step in &mut steps[..last] {
        for value in step.styles.values_mut() {
            if *value == StyleValue::Auto {
                *value = StyleValue::Current;
            }
        }
    }
    steps
}

static_assertions::assert_impl_all!(AnimationEngine: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingFunction;
    use crate::sampler::MemoryDocument;
    use crate::trigger::TransitionRule;

    fn fade_trigger() -> TriggerDefinition {
        TriggerDefinition::new("fade")
            .state(VOID_STATE, |s| s.set("opacity", 0.0))
            .state("*", |s| s.set("opacity", 1.0))
            .transition(
                TransitionRule::between("*", "*")
                    .duration_ms(100.0)
                    .easing(EasingFunction::Linear),
            )
    }

    #[test]
    fn test_register_starts_in_void() {
        let mut engine = AnimationEngine::new();
        engine.register_trigger("panel", fade_trigger());
        assert_eq!(engine.current_state("panel", "fade"), Some(VOID_STATE));
        assert_eq!(engine.current_state("panel", "other"), None);
    }

    #[test]
    fn test_unknown_trigger_rejected() {
        let mut engine = AnimationEngine::new();
        let doc = MemoryDocument::new();
        let err = engine
            .set_state("panel", "fade", "open", &doc)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownTrigger {
                element: "panel".to_string(),
                trigger: "fade".to_string(),
            }
        );
    }

    #[test]
    fn test_flush_creates_player_from_state_styles() {
        let mut engine = AnimationEngine::new();
        let mut doc = MemoryDocument::new();
        doc.insert_element("panel");

        engine.register_trigger("panel", fade_trigger());
        engine.set_state("panel", "fade", "open", &doc).unwrap();

        assert_eq!(engine.flush(&doc).unwrap(), 1);
        let players = engine.players();
        assert_eq!(players.len(), 1);

        let frames = players[0].keyframes();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].get("opacity").unwrap().as_number(), Some(0.0));
        assert_eq!(frames[1].get("opacity").unwrap().as_number(), Some(1.0));
    }

    #[test]
    fn test_no_op_state_change_produces_nothing() {
        let mut engine = AnimationEngine::new();
        let doc = MemoryDocument::new();
        engine.register_trigger("panel", fade_trigger());

        engine.set_state("panel", "fade", VOID_STATE, &doc).unwrap();
        assert_eq!(engine.flush(&doc).unwrap(), 0);
        assert!(engine.players().is_empty());
    }

    #[test]
    fn test_unmatched_transition_is_skipped() {
        let trigger = TriggerDefinition::new("fade")
            .transition(TransitionRule::between("open", "closed"));
        let mut engine = AnimationEngine::new();
        let doc = MemoryDocument::new();
        engine.register_trigger("panel", trigger);

        engine.set_state("panel", "fade", "open", &doc).unwrap();
        assert_eq!(engine.flush(&doc).unwrap(), 0);
    }

    #[test]
    fn test_retarget_before_flush_keeps_first_snapshot() {
        let mut engine = AnimationEngine::new();
        let mut doc = MemoryDocument::new();
        doc.set_style("panel", "opacity", 0.25);

        let trigger = TriggerDefinition::new("fade")
            .state("dim", |s| s.set("opacity", 0.5))
            .state("bright", |s| s.set("opacity", 1.0))
            .transition(
                TransitionRule::between("*", "*")
                    .step(|s| s.set("opacity", StyleValue::Current))
                    .step(|s| s.set("opacity", StyleValue::Auto))
                    .duration_ms(100.0),
            );
        engine.register_trigger("panel", trigger);

        engine.set_state("panel", "fade", "dim", &doc).unwrap();
        // Host value moves on, then the change is retargeted
        doc.set_style("panel", "opacity", 0.9);
        engine.set_state("panel", "fade", "bright", &doc).unwrap();
        assert_eq!(engine.current_state("panel", "fade"), Some("bright"));

        doc.set_style("panel", "opacity", 1.0);
        assert_eq!(engine.flush(&doc).unwrap(), 1);

        let players = engine.players();
        let frames = players[0].keyframes();
        // Pre-snapshot is from the first report, post from flush time
        assert_eq!(frames[0].get("opacity").unwrap().as_number(), Some(0.25));
        assert_eq!(frames[1].get("opacity").unwrap().as_number(), Some(1.0));
    }

    #[test]
    fn test_new_transition_replaces_player() {
        let mut engine = AnimationEngine::new();
        let mut doc = MemoryDocument::new();
        doc.insert_element("panel");
        engine.register_trigger("panel", fade_trigger());

        engine.set_state("panel", "fade", "open", &doc).unwrap();
        engine.flush(&doc).unwrap();
        let first_id = engine.players()[0].id;

        engine.set_state("panel", "fade", "closed", &doc).unwrap();
        engine.flush(&doc).unwrap();

        let players = engine.players();
        assert_eq!(players.len(), 1);
        assert_ne!(players[0].id, first_id);
        assert!(engine.player(first_id).is_none());

        let events: Vec<_> = engine.drain_events().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, PlayerEvent::Replaced { old, .. } if *old == first_id)));
    }

    #[test]
    fn test_missing_snapshot_property_surfaces() {
        let mut engine = AnimationEngine::new();
        let doc = MemoryDocument::new();

        let trigger = TriggerDefinition::new("grow")
            .transition(
                TransitionRule::between("*", "*")
                    .step(|s| s.set("height", StyleValue::Current))
                    .step(|s| s.set("height", "0px")),
            );
        engine.register_trigger("panel", trigger);
        engine.set_state("panel", "grow", "open", &doc).unwrap();

        let err = engine.flush(&doc).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Resolve(crate::error::ResolveError::MissingStyleProperty { .. })
        ));
    }

    #[test]
    fn test_tick_prunes_and_reports_finished() {
        let mut engine = AnimationEngine::new();
        let mut doc = MemoryDocument::new();
        doc.insert_element("panel");
        engine.register_trigger("panel", fade_trigger());
        engine.set_state("panel", "fade", "open", &doc).unwrap();
        engine.flush(&doc).unwrap();
        engine.drain_events().for_each(drop);

        engine.tick(50.0);
        assert_eq!(engine.player_count(), 1);
        assert!(!engine.has_pending_events());

        engine.tick(60.0);
        assert_eq!(engine.player_count(), 0);
        let events: Vec<_> = engine.drain_events().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], PlayerEvent::Finished { .. }));
    }

    #[test]
    fn test_destroy_player() {
        let mut engine = AnimationEngine::new();
        let mut doc = MemoryDocument::new();
        doc.insert_element("panel");
        engine.register_trigger("panel", fade_trigger());
        engine.set_state("panel", "fade", "open", &doc).unwrap();
        engine.flush(&doc).unwrap();
        engine.drain_events().for_each(drop);

        let id = engine.players()[0].id;
        assert!(engine.destroy_player(id));
        assert!(engine.players().is_empty());
        assert!(!engine.destroy_player(id));

        let events: Vec<_> = engine.drain_events().collect();
        assert!(matches!(events[0], PlayerEvent::Destroyed { .. }));
    }

    #[test]
    fn test_finish_player() {
        let mut engine = AnimationEngine::new();
        let mut doc = MemoryDocument::new();
        doc.insert_element("panel");
        engine.register_trigger("panel", fade_trigger());
        engine.set_state("panel", "fade", "open", &doc).unwrap();
        engine.flush(&doc).unwrap();
        engine.drain_events().for_each(drop);

        let id = engine.players()[0].id;
        assert!(engine.finish_player(id));
        assert_eq!(engine.player_count(), 0);

        let events: Vec<_> = engine.drain_events().collect();
        assert!(matches!(events[0], PlayerEvent::Finished { .. }));
    }

    #[test]
    fn test_pause_resume_player() {
        let mut engine = AnimationEngine::new();
        let mut doc = MemoryDocument::new();
        doc.insert_element("panel");
        engine.register_trigger("panel", fade_trigger());
        engine.set_state("panel", "fade", "open", &doc).unwrap();
        engine.flush(&doc).unwrap();

        let id = engine.players()[0].id;
        assert!(engine.pause_player(id));
        engine.tick(1000.0);
        // Paused players survive ticks
        assert_eq!(engine.player_count(), 1);

        assert!(engine.resume_player(id));
        engine.tick(1000.0);
        assert_eq!(engine.player_count(), 0);
    }

    #[test]
    fn test_insert_and_remove_element() {
        let mut engine = AnimationEngine::new();
        let mut doc = MemoryDocument::new();
        doc.insert_element("panel");
        engine.register_trigger("panel", fade_trigger());

        engine.insert_element("panel", &doc).unwrap();
        assert_eq!(engine.current_state("panel", "fade"), Some(ATTACHED_STATE));
        assert_eq!(engine.flush(&doc).unwrap(), 1);

        engine.remove_element("panel", &doc).unwrap();
        assert_eq!(engine.current_state("panel", "fade"), Some(VOID_STATE));
        assert_eq!(engine.flush(&doc).unwrap(), 1);

        // Still one live player: the removal replaced the insertion player
        assert_eq!(engine.players().len(), 1);
    }
}
