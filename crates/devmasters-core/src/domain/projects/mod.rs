//! Project domain module
//!
//! Contains the project entity, list specifications and the in-memory
//! project store.

pub mod entity;
pub mod specification;
pub mod store;

// Re-export project types
pub use entity::*;
pub use specification::*;
pub use store::*;
