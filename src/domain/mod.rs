//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Challenge and the challenge catalog
//! - Value Objects: Progression state, seeds, session ids
//! - Aggregates: The progression tracker
//! - Domain Events: What a tracker transition did

pub mod aggregates;
pub mod entities;
pub mod events;
pub mod value_objects;
