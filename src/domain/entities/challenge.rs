//! Challenge entity - Short break exercises that reward experience
//!
//! Challenges come from a fixed catalog loaded once at startup. A user holds
//! at most one active challenge at a time.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A fixed-reward task a user can accept and complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Which part of the body the exercise targets
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    pub description: String,
    /// Experience awarded on completion
    pub amount: u32,
}

impl Challenge {
    #[cfg(test)]
    pub fn new(kind: ChallengeKind, description: impl Into<String>, amount: u32) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
        }
    }
}

/// Types of challenges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Stretching and movement
    Body,
    /// Eye rest exercises
    Eye,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Challenge catalog is empty")]
    Empty,
    #[error("Challenge #{index} awards no experience")]
    ZeroAmount { index: usize },
}

/// The ordered, non-empty list of challenges users can draw from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeCatalog {
    challenges: Vec<Challenge>,
}

impl ChallengeCatalog {
    pub fn new(challenges: Vec<Challenge>) -> Result<Self, CatalogError> {
        if challenges.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(index) = challenges.iter().position(|c| c.amount == 0) {
            return Err(CatalogError::ZeroAmount { index });
        }
        Ok(Self { challenges })
    }

    /// Draw one challenge uniformly at random
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &Challenge {
        let index = rng.gen_range(0..self.challenges.len());
        &self.challenges[index]
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sample_catalog() -> ChallengeCatalog {
        ChallengeCatalog::new(vec![
            Challenge::new(ChallengeKind::Body, "Stand up and stretch for 3 minutes", 80),
            Challenge::new(ChallengeKind::Eye, "Look at something 20 meters away for 1 minute", 60),
            Challenge::new(ChallengeKind::Body, "Roll your shoulders ten times", 100),
        ])
        .expect("catalog should be valid")
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(ChallengeCatalog::new(vec![]), Err(CatalogError::Empty));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = ChallengeCatalog::new(vec![
            Challenge::new(ChallengeKind::Eye, "Blink slowly", 40),
            Challenge::new(ChallengeKind::Body, "Do nothing", 0),
        ]);
        assert_eq!(result, Err(CatalogError::ZeroAmount { index: 1 }));
    }

    #[test]
    fn test_draw_returns_catalog_members() {
        let catalog = sample_catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            let challenge = catalog.draw(&mut rng);
            assert!(catalog.challenges().contains(challenge));
            seen.insert(challenge.description.clone());
        }

        // Uniform draws over 200 tries hit every entry
        assert_eq!(seen.len(), catalog.len());
    }

    #[test]
    fn test_challenge_json_uses_type_field() {
        let json = r#"{ "type": "eye", "description": "Close your eyes for 30 seconds", "amount": 50 }"#;
        let challenge: Challenge = serde_json::from_str(json).expect("deserialization should succeed");
        assert_eq!(challenge.kind, ChallengeKind::Eye);
        assert_eq!(challenge.amount, 50);

        let out = serde_json::to_string(&challenge).expect("serialization should succeed");
        assert!(out.contains(r#""type":"eye""#));
    }
}
