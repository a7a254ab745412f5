//! Application layer
//!
//! Input sanitization and validation shared by every write path.

pub mod validators;
