//! Player lifecycle events.
//!
//! The engine queues an event whenever a player starts, finishes, is
//! destroyed, or is replaced by a newer transition on the same element and
//! trigger. Hosts drain the queue after `flush()` or `tick()`.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::player::PlayerId;

/// Event emitted when a player changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// A player was created and started.
    Started {
        /// The player instance ID.
        player: PlayerId,
        /// The element being animated.
        element: String,
        /// The trigger that produced the player.
        trigger: String,
    },
    /// A player reached the end of its timeline.
    Finished {
        /// The player instance ID.
        player: PlayerId,
        /// The element that was animated.
        element: String,
        /// The trigger that produced the player.
        trigger: String,
    },
    /// A player was destroyed before completion.
    Destroyed {
        /// The player instance ID.
        player: PlayerId,
        /// The element that was animated.
        element: String,
        /// The trigger that produced the player.
        trigger: String,
    },
    /// A newer transition replaced an in-flight player.
    Replaced {
        /// The destroyed player.
        old: PlayerId,
        /// The player that took its place.
        new: PlayerId,
        /// The element being animated.
        element: String,
        /// The trigger that produced both players.
        trigger: String,
    },
}

impl PlayerEvent {
    /// Get the element this event concerns.
    pub fn element(&self) -> &str {
        match self {
            Self::Started { element, .. }
            | Self::Finished { element, .. }
            | Self::Destroyed { element, .. }
            | Self::Replaced { element, .. } => element,
        }
    }

    /// Get the trigger this event concerns.
    pub fn trigger(&self) -> &str {
        match self {
            Self::Started { trigger, .. }
            | Self::Finished { trigger, .. }
            | Self::Destroyed { trigger, .. }
            | Self::Replaced { trigger, .. } => trigger,
        }
    }
}

/// Queue collecting player events between drains.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<PlayerEvent>,
}

impl EventQueue {
    /// Create a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event onto the queue.
    pub fn push(&mut self, event: PlayerEvent) {
        self.events.push_back(event);
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Pop the next event.
    pub fn pop(&mut self) -> Option<PlayerEvent> {
        self.events.pop_front()
    }

    /// Peek at the next event without removing it.
    pub fn peek(&self) -> Option<&PlayerEvent> {
        self.events.front()
    }

    /// Drain all pending events.
    pub fn drain(&mut self) -> impl Iterator<Item = PlayerEvent> + '_ {
        self.events.drain(..)
    }

    /// Get pending events for a specific element, without removing them.
    pub fn events_for_element(&self, element: &str) -> Vec<&PlayerEvent> {
        self.events
            .iter()
            .filter(|e| e.element() == element)
            .collect()
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
