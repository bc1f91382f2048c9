//! Domain entities - Core business objects

mod challenge;

pub use challenge::{CatalogError, Challenge, ChallengeCatalog, ChallengeKind};
