//! DevMasters Core Library
//!
//! This crate provides the core functionality for DevMasters, including:
//! - Project records and their status graph
//! - Title/description sanitization and validation
//! - The synchronized in-memory `ProjectStore` with per-record locking
//! - Filtering, pagination and list ordering
//! - Configuration with file persistence

pub mod application;
pub mod config;
pub mod domain;
pub mod error;

pub use domain::projects::{
    ListQuery, NewProject, Project, ProjectFilter, ProjectId, ProjectPage, ProjectPriority,
    ProjectStatus, ProjectStore, ProjectUpdate,
};
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::projects::{
        ListQuery, NewProject, Project, ProjectFilter, ProjectId, ProjectPriority, ProjectStatus,
        ProjectStore, ProjectUpdate,
    };
    pub use crate::error::{Error, Result};
}
