//! Transition players: resolved keyframes plus a playback lifecycle.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::interpolate::sample_keyframes;
use crate::keyframe::Keyframe;
use crate::style::StyleLiteral;
use crate::trigger::TransitionTiming;

/// Unique identifier for a player instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Mint a new unique player ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Playback state of a transition player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// Created but still inside its delay window.
    Pending,
    /// Actively playing.
    Running,
    /// Paused; time does not advance.
    Paused,
    /// Reached the end of its timeline.
    Finished,
    /// Destroyed before completion; terminal, no output guarantee.
    Destroyed,
}

/// A transition in flight: resolved keyframes driven by elapsed time.
///
/// Destroying a player performs no rollback. Whatever style state the host
/// holds at that moment stays in place; a follow-up transition re-samples
/// live values instead of reusing anything from the destroyed player.
#[derive(Debug, Clone)]
pub struct TransitionPlayer {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// The element this player animates.
    pub element: String,
    /// Name of the trigger that produced this player.
    pub trigger: String,
    keyframes: Vec<Keyframe>,
    timing: TransitionTiming,
    elapsed_ms: f32,
    state: PlayerState,
}

impl TransitionPlayer {
    /// Create a new player over a resolved keyframe sequence.
    pub fn new(
        element: impl Into<String>,
        trigger: impl Into<String>,
        keyframes: Vec<Keyframe>,
        timing: TransitionTiming,
    ) -> Self {
        Self {
            id: PlayerId::new(),
            element: element.into(),
            trigger: trigger.into(),
            keyframes,
            timing,
            elapsed_ms: 0.0,
            state: if timing.delay_ms > 0.0 {
                PlayerState::Pending
            } else {
                PlayerState::Running
            },
        }
    }

    /// The resolved keyframe sequence this player plays.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// The player's timing parameters.
    pub fn timing(&self) -> &TransitionTiming {
        &self.timing
    }

    /// Current playback state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Linear progress through the timeline (0.0 to 1.0).
    pub fn progress(&self) -> f32 {
        if self.timing.duration_ms <= 0.0 {
            return 1.0;
        }
        let active_elapsed = (self.elapsed_ms - self.timing.delay_ms).max(0.0);
        (active_elapsed / self.timing.duration_ms).clamp(0.0, 1.0)
    }

    /// Sample the interpolated style values at the current position.
    pub fn sample(&self) -> HashMap<String, StyleLiteral> {
        let position = match self.state {
            PlayerState::Pending => 0.0,
            PlayerState::Finished | PlayerState::Destroyed => 1.0,
            PlayerState::Running | PlayerState::Paused => {
                self.timing.easing.evaluate(self.progress())
            }
        };
        sample_keyframes(&self.keyframes, position)
    }

    /// Advance playback by `delta_ms`.
    ///
    /// Returns `true` while the player remains active.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        match self.state {
            PlayerState::Finished | PlayerState::Destroyed => false,
            PlayerState::Paused => true,
            PlayerState::Pending => {
                self.elapsed_ms += delta_ms;
                if self.elapsed_ms >= self.timing.delay_ms {
                    self.state = PlayerState::Running;
                    self.finish_if_elapsed()
                } else {
                    true
                }
            }
            PlayerState::Running => {
                self.elapsed_ms += delta_ms;
                self.finish_if_elapsed()
            }
        }
    }

    fn finish_if_elapsed(&mut self) -> bool {
        let active_elapsed = self.elapsed_ms - self.timing.delay_ms;
        if active_elapsed >= self.timing.duration_ms {
            self.state = PlayerState::Finished;
            false
        } else {
            true
        }
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        if matches!(self.state, PlayerState::Pending | PlayerState::Running) {
            self.state = PlayerState::Paused;
        }
    }

    /// Resume a paused player.
    pub fn resume(&mut self) {
        if self.state == PlayerState::Paused {
            self.state = if self.elapsed_ms < self.timing.delay_ms {
                PlayerState::Pending
            } else {
                PlayerState::Running
            };
        }
    }

    /// Jump to the end of the timeline.
    pub fn finish(&mut self) {
        if self.state != PlayerState::Destroyed {
            self.elapsed_ms = self.timing.delay_ms + self.timing.duration_ms;
            self.state = PlayerState::Finished;
        }
    }

    /// Destroy the player. Terminal and idempotent.
    pub fn destroy(&mut self) {
        self.state = PlayerState::Destroyed;
    }

    /// Check if this player is still active.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            PlayerState::Pending | PlayerState::Running | PlayerState::Paused
        )
    }

    /// Check if this player finished normally.
    pub fn is_finished(&self) -> bool {
        self.state == PlayerState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingFunction;

    fn linear_timing(duration_ms: f32) -> TransitionTiming {
        TransitionTiming {
            duration_ms,
            delay_ms: 0.0,
            easing: EasingFunction::Linear,
        }
    }

    fn height_frames() -> Vec<Keyframe> {
        vec![
            Keyframe::new(0.0).set("height", 0.0),
            Keyframe::new(1.0).set("height", 100.0),
        ]
    }

    #[test]
    fn test_player_id_uniqueness() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_player_lifecycle() {
        let mut player =
            TransitionPlayer::new("panel", "open", height_frames(), linear_timing(100.0));
        assert_eq!(player.state(), PlayerState::Running);
        assert!(player.is_active());

        assert!(player.update(50.0));
        assert!((player.progress() - 0.5).abs() < 1e-6);

        assert!(!player.update(60.0));
        assert_eq!(player.state(), PlayerState::Finished);
        assert!(player.is_finished());
        assert!(!player.is_active());
    }

    #[test]
    fn test_player_sampling() {
        let mut player =
            TransitionPlayer::new("panel", "open", height_frames(), linear_timing(100.0));

        let styles = player.sample();
        assert_eq!(styles["height"].as_number(), Some(0.0));

        player.update(50.0);
        let styles = player.sample();
        assert!((styles["height"].as_number().unwrap() - 50.0).abs() < 1e-3);

        player.update(50.0);
        let styles = player.sample();
        assert_eq!(styles["height"].as_number(), Some(100.0));
    }

    #[test]
    fn test_player_delay() {
        let timing = TransitionTiming {
            duration_ms: 100.0,
            delay_ms: 50.0,
            easing: EasingFunction::Linear,
        };
        let mut player = TransitionPlayer::new("panel", "open", height_frames(), timing);
        assert_eq!(player.state(), PlayerState::Pending);

        // Inside the delay the first keyframe holds
        player.update(25.0);
        assert_eq!(player.state(), PlayerState::Pending);
        assert_eq!(player.sample()["height"].as_number(), Some(0.0));

        player.update(30.0);
        assert_eq!(player.state(), PlayerState::Running);
    }

    #[test]
    fn test_player_pause_resume() {
        let mut player =
            TransitionPlayer::new("panel", "open", height_frames(), linear_timing(100.0));

        player.update(50.0);
        let before = player.sample();

        player.pause();
        assert_eq!(player.state(), PlayerState::Paused);
        assert!(player.update(100.0));
        assert_eq!(player.sample(), before);

        player.resume();
        assert_eq!(player.state(), PlayerState::Running);
    }

    #[test]
    fn test_player_finish_jumps_to_end() {
        let mut player =
            TransitionPlayer::new("panel", "open", height_frames(), linear_timing(100.0));
        player.finish();
        assert!(player.is_finished());
        assert_eq!(player.sample()["height"].as_number(), Some(100.0));
    }

    #[test]
    fn test_player_destroy_is_terminal() {
        let mut player =
            TransitionPlayer::new("panel", "open", height_frames(), linear_timing(100.0));
        player.destroy();
        assert_eq!(player.state(), PlayerState::Destroyed);
        assert!(!player.update(50.0));

        // Idempotent
        player.destroy();
        assert_eq!(player.state(), PlayerState::Destroyed);

        // finish() does not resurrect a destroyed player
        player.finish();
        assert_eq!(player.state(), PlayerState::Destroyed);
    }

    #[test]
    fn test_zero_duration_completes_on_first_update() {
        let mut player =
            TransitionPlayer::new("panel", "open", height_frames(), linear_timing(0.0));
        assert_eq!(player.sample()["height"].as_number(), Some(100.0));
        assert!(!player.update(1.0));
        assert!(player.is_finished());
    }
}
