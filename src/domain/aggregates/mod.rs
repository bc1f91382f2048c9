//! Aggregates - Cluster of domain objects treated as a single unit

pub mod progression_tracker;

pub use progression_tracker::ProgressionTracker;
