//! Progression value objects - level, experience and completed challenge counters
//!
//! `ProgressionState` is the persisted triple. The experience threshold is
//! always derived from the level and never stored.

use serde::{Deserialize, Serialize};

/// Storage key for the level counter
pub const LEVEL_KEY: &str = "level";
/// Storage key for the experience counter
pub const CURRENT_EXPERIENCE_KEY: &str = "currentExperience";
/// Storage key for the completed challenge counter
pub const CHALLENGES_COMPLETED_KEY: &str = "challengesCompleted";

/// Highest reachable level; seeds above it are lowered to it
pub const MAX_LEVEL: u32 = 10_000;

/// Experience required to leave `level`: `((level + 1) * 4)^2`
pub fn experience_to_next_level(level: u32) -> u64 {
    let base = (u64::from(level) + 1) * 4;
    base.saturating_mul(base)
}

/// The persisted part of a user's progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    pub level: u32,
    pub current_experience: u64,
    pub challenges_completed: u64,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            level: 1,
            current_experience: 0,
            challenges_completed: 0,
        }
    }
}

/// Result of crediting a completed challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardOutcome {
    pub state: ProgressionState,
    pub levels_gained: u32,
}

impl ProgressionState {
    pub fn experience_to_next_level(&self) -> u64 {
        experience_to_next_level(self.level)
    }

    /// Integer fill of the experience bar in percent
    pub fn experience_percent(&self) -> u8 {
        let percent = u128::from(self.current_experience) * 100
            / u128::from(self.experience_to_next_level());
        percent.min(100) as u8
    }

    /// Credit a completed challenge worth `amount` experience.
    ///
    /// Excess experience carries over into the next level instead of being
    /// dropped; the loop keeps `current_experience` strictly below the
    /// threshold of the resulting level. At `MAX_LEVEL` experience stops
    /// one point short of the threshold.
    pub fn credit_challenge(self, amount: u32) -> RewardOutcome {
        let mut level = self.level;
        let mut experience = self.current_experience.saturating_add(u64::from(amount));
        let mut levels_gained = 0;

        while level < MAX_LEVEL && experience >= experience_to_next_level(level) {
            experience -= experience_to_next_level(level);
            level += 1;
            levels_gained += 1;
        }
        if level >= MAX_LEVEL {
            experience = experience.min(experience_to_next_level(level) - 1);
        }

        RewardOutcome {
            state: Self {
                level,
                current_experience: experience,
                challenges_completed: self.challenges_completed.saturating_add(1),
            },
            levels_gained,
        }
    }

    /// String-encoded key/value pairs written to storage
    pub fn persisted_pairs(&self) -> [(&'static str, String); 3] {
        [
            (LEVEL_KEY, self.level.to_string()),
            (CURRENT_EXPERIENCE_KEY, self.current_experience.to_string()),
            (CHALLENGES_COMPLETED_KEY, self.challenges_completed.to_string()),
        ]
    }
}

/// Caller-supplied initial values for a tracker; missing fields use defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedValues {
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub current_experience: Option<u64>,
    #[serde(default)]
    pub challenges_completed: Option<u64>,
}

impl SeedValues {
    /// Build seeds from persisted string pairs.
    ///
    /// Values that do not parse as unsigned integers are treated as absent.
    pub fn from_persisted<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut seed = Self::default();
        for (key, value) in pairs {
            let value = value.trim();
            match key {
                LEVEL_KEY => seed.level = value.parse().ok(),
                CURRENT_EXPERIENCE_KEY => seed.current_experience = value.parse().ok(),
                CHALLENGES_COMPLETED_KEY => seed.challenges_completed = value.parse().ok(),
                _ => {}
            }
        }
        seed
    }

    pub fn is_empty(&self) -> bool {
        self.level.is_none()
            && self.current_experience.is_none()
            && self.challenges_completed.is_none()
    }

    /// Resolve into a concrete state. Level is clamped to `1..=MAX_LEVEL`.
    pub fn into_state(self) -> ProgressionState {
        ProgressionState {
            level: self.level.unwrap_or(1).clamp(1, MAX_LEVEL),
            current_experience: self.current_experience.unwrap_or(0),
            challenges_completed: self.challenges_completed.unwrap_or(0),
        }
    }
}
