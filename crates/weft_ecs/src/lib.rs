//! Weft ECS Core
//!
//! Contains the fundamental simulation systems:
//! - Entity identity registry with id recycling
//! - Type-erased component storage
//! - Signature-matched system registry
//! - World facade composing the three
//! - Fixed-rate tick clock for external drivers

pub mod ecs;
pub mod time;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
