//! Project entity and its input shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned project identifier
pub type ProjectId = u64;

/// Project status
///
/// Serialized with the labels clients of the service already use; the
/// English identifiers are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Planejado", alias = "PLANNED", alias = "planned")]
    Planned,
    #[serde(rename = "Em Andamento", alias = "IN_PROGRESS", alias = "in_progress")]
    InProgress,
    #[serde(
        rename = "Concluído",
        alias = "Concluido",
        alias = "COMPLETED",
        alias = "completed"
    )]
    Completed,
    #[serde(rename = "Cancelado", alias = "CANCELLED", alias = "cancelled")]
    Cancelled,
}

impl ProjectStatus {
    /// Wire label for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "Planejado",
            ProjectStatus::InProgress => "Em Andamento",
            ProjectStatus::Completed => "Concluído",
            ProjectStatus::Cancelled => "Cancelado",
        }
    }

    /// Parse a wire label or English identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Planejado" | "PLANNED" | "planned" => Some(ProjectStatus::Planned),
            "Em Andamento" | "IN_PROGRESS" | "in_progress" => Some(ProjectStatus::InProgress),
            "Concluído" | "Concluido" | "COMPLETED" | "completed" => {
                Some(ProjectStatus::Completed)
            }
            "Cancelado" | "CANCELLED" | "cancelled" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses reachable from this one in a single update
    pub fn allowed_transitions(&self) -> &'static [ProjectStatus] {
        match self {
            ProjectStatus::Planned => &[ProjectStatus::InProgress, ProjectStatus::Cancelled],
            ProjectStatus::InProgress => &[ProjectStatus::Completed, ProjectStatus::Cancelled],
            ProjectStatus::Completed | ProjectStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Completed and cancelled projects never change status again
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project priority, serialized as its numeric level (1 is highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProjectPriority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl ProjectPriority {
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for ProjectPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ProjectPriority::High),
            2 => Ok(ProjectPriority::Medium),
            3 => Ok(ProjectPriority::Low),
            other => Err(format!("priority must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl From<ProjectPriority> for u8 {
    fn from(priority: ProjectPriority) -> Self {
        priority.level()
    }
}

/// A project record held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Store-assigned identifier, never reused
    pub id: ProjectId,
    /// Sanitized title, unique case-insensitively among live projects
    pub title: String,
    /// Sanitized description
    pub description: String,
    pub priority: ProjectPriority,
    pub status: ProjectStatus,
    /// When the project was created
    pub created_at: DateTime<Utc>,
    /// When the project was last changed
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Advance `updated_at` to now, never earlier than `created_at`
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// Fields for creating a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub priority: ProjectPriority,
    /// Defaults to planned when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl NewProject {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: ProjectPriority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            status: None,
        }
    }

    /// Set the initial status
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial update of a project; unset fields stay unchanged
///
/// `id`, `created_at` and `updated_at` are only accepted so that an attempt
/// to supply them can be refused with a validation error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<ProjectPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<serde_json::Value>,
}

impl ProjectUpdate {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: ProjectPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Names of store-managed fields the caller tried to set
    pub fn immutable_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.id.is_some() {
            fields.push("id");
        }
        if self.created_at.is_some() {
            fields.push("created_at");
        }
        if self.updated_at.is_some() {
            fields.push("updated_at");
        }
        fields
    }
}
