//! Value objects - Immutable objects defined by their attributes

mod ids;
mod progression;

pub use ids::SessionId;
pub use progression::{ProgressionState, SeedValues, MAX_LEVEL};
