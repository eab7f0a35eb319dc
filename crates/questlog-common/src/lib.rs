//! # QuestLog Common
//!
//! Common types, utilities, and shared abstractions for QuestLog RPG.
//!
//! This crate provides foundational types used across all QuestLog crates:
//! - ID types (QuestId, ChallengeId)
//! - Version information for save and export schemas
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
