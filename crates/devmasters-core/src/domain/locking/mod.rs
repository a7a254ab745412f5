//! Record locking for concurrent access
//!
//! Per-record mutexes let updates to one project proceed without blocking
//! updates to unrelated projects. Whole-map consistency is the store's job;
//! this module only hands out and discards the per-record locks.

pub mod manager;

pub use manager::{RecordLock, RecordLockManager};
