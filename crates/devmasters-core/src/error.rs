//! Error types for DevMasters

use crate::domain::projects::{ProjectId, ProjectStatus};
use thiserror::Error;

/// Result type alias using DevMasters' Error
pub type Result<T> = std::result::Result<T, Error>;

/// DevMasters error types
///
/// Store operations return these unmodified; translating them to transport
/// status codes is left to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Project {0} not found.")]
    ProjectNotFound(ProjectId),

    #[error("A project titled '{0}' already exists.")]
    DuplicateTitle(String),

    #[error("Cannot change project status from '{from}' to '{to}'.")]
    InvalidStatusTransition {
        from: ProjectStatus,
        to: ProjectStatus,
    },

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    // Internal errors
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "E001",
            Self::DuplicateTitle(_) => "E002",
            Self::InvalidStatusTransition { .. } => "E003",
            Self::ConfigError(_) => "E600",
            Self::Validation { .. } => "E800",
            Self::Internal(_) => "E9999",
        }
    }

    /// Whether the caller sent something the store refused on its merits,
    /// as opposed to an internal fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::ConfigError(_) | Self::Internal(_))
    }
}
