//! Progression Tracker - The root aggregate for a user's session progress
//!
//! The tracker owns the level, experience and completed challenge counters,
//! the active challenge and the level-up announcement flag. Every operation
//! is a synchronous transition that returns the events it produced; the
//! owner decides what to persist or announce.

use rand::Rng;

use crate::domain::entities::{Challenge, ChallengeCatalog};
use crate::domain::events::{EventMetadata, ProgressionEvent};
use crate::domain::value_objects::{ProgressionState, SeedValues, MAX_LEVEL};

/// The Progression Tracker aggregate root
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionTracker {
    state: ProgressionState,
    /// At most one challenge is active; starting another replaces it
    active_challenge: Option<Challenge>,
    /// Set by a level-up, cleared only by `close_level_up_modal`
    level_up_announced: bool,
}

impl Default for ProgressionTracker {
    fn default() -> Self {
        Self::initialize(SeedValues::default())
    }
}

impl ProgressionTracker {
    /// Create a tracker from caller-supplied seeds, defaulting missing values
    pub fn initialize(seed: SeedValues) -> Self {
        Self {
            state: seed.into_state(),
            active_challenge: None,
            level_up_announced: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> ProgressionState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn current_experience(&self) -> u64 {
        self.state.current_experience
    }

    pub fn challenges_completed(&self) -> u64 {
        self.state.challenges_completed
    }

    /// Derived from the current level on every call
    pub fn experience_to_next_level(&self) -> u64 {
        self.state.experience_to_next_level()
    }

    pub fn active_challenge(&self) -> Option<&Challenge> {
        self.active_challenge.as_ref()
    }

    pub fn is_level_up_modal_open(&self) -> bool {
        self.level_up_announced
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Draw a random challenge from the catalog and make it the active one
    pub fn start_new_challenge<R: Rng + ?Sized>(
        &mut self,
        catalog: &ChallengeCatalog,
        rng: &mut R,
    ) -> ProgressionEvent {
        let challenge = catalog.draw(rng).clone();
        let replaced = self.active_challenge.replace(challenge.clone());

        ProgressionEvent::ChallengeStarted {
            metadata: EventMetadata::default(),
            challenge,
            replaced,
        }
    }

    /// Drop the active challenge, if any
    pub fn reset_challenge(&mut self) -> ProgressionEvent {
        ProgressionEvent::ChallengeReset {
            metadata: EventMetadata::default(),
            abandoned: self.active_challenge.take(),
        }
    }

    /// Credit the active challenge.
    ///
    /// Returns no events and changes nothing when no challenge is active.
    /// Otherwise the new counters, the cleared challenge and the level-up
    /// flag are assigned together.
    pub fn completed_challenge(&mut self) -> Vec<ProgressionEvent> {
        let Some(challenge) = self.active_challenge.as_ref() else {
            return Vec::new();
        };

        let outcome = self.state.credit_challenge(challenge.amount);
        let previous_level = self.state.level;

        let mut events = Vec::with_capacity(1 + outcome.levels_gained as usize);
        events.push(ProgressionEvent::ChallengeCompleted {
            metadata: EventMetadata::default(),
            challenge: challenge.clone(),
            state: outcome.state,
        });
        for gained in 1..=outcome.levels_gained {
            events.push(ProgressionEvent::LeveledUp {
                metadata: EventMetadata::default(),
                level: previous_level + gained,
            });
        }

        self.state = outcome.state;
        self.active_challenge = None;
        if outcome.levels_gained > 0 {
            self.level_up_announced = true;
        }

        events
    }

    /// Advance one level and raise the level-up announcement.
    ///
    /// The level does not move past `MAX_LEVEL`.
    pub fn level_up(&mut self) -> ProgressionEvent {
        self.state.level = (self.state.level + 1).min(MAX_LEVEL);
        self.level_up_announced = true;

        ProgressionEvent::LeveledUp {
            metadata: EventMetadata::default(),
            level: self.state.level,
        }
    }

    pub fn close_level_up_modal(&mut self) -> ProgressionEvent {
        self.level_up_announced = false;

        ProgressionEvent::LevelUpDismissed {
            metadata: EventMetadata::default(),
        }
    }
}
