//! Project specifications
//!
//! Composable predicates behind the list filters.

use std::sync::Arc;

use crate::domain::specification::{AndSpecification, Specification, TrueSpec};

use super::entity::{Project, ProjectPriority, ProjectStatus};

/// Specification for an exact status match
pub struct StatusSpec {
    status: ProjectStatus,
}

impl StatusSpec {
    pub fn new(status: ProjectStatus) -> Self {
        Self { status }
    }
}

impl Specification<Project> for StatusSpec {
    fn is_satisfied_by(&self, project: &Project) -> bool {
        project.status == self.status
    }
}

/// Specification for an exact priority match
pub struct PrioritySpec {
    priority: ProjectPriority,
}

impl PrioritySpec {
    pub fn new(priority: ProjectPriority) -> Self {
        Self { priority }
    }
}

impl Specification<Project> for PrioritySpec {
    fn is_satisfied_by(&self, project: &Project) -> bool {
        project.priority == self.priority
    }
}

/// Case-insensitive substring match on title or description
pub struct SearchTextSpec {
    needle: String,
}

impl SearchTextSpec {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }
}

impl Specification<Project> for SearchTextSpec {
    fn is_satisfied_by(&self, project: &Project) -> bool {
        project.title.to_lowercase().contains(&self.needle)
            || project.description.to_lowercase().contains(&self.needle)
    }
}

/// Optional list filters; unset filters match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: ProjectPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Build the combined specification for these filters
    pub fn specification(&self) -> Arc<dyn Specification<Project>> {
        let mut spec: Arc<dyn Specification<Project>> = Arc::new(TrueSpec::new());

        if let Some(status) = self.status {
            spec = Arc::new(AndSpecification::new(
                spec,
                Arc::new(StatusSpec::new(status)),
            ));
        }
        if let Some(priority) = self.priority {
            spec = Arc::new(AndSpecification::new(
                spec,
                Arc::new(PrioritySpec::new(priority)),
            ));
        }
        // Blank search text means no search filter; otherwise the text is
        // matched as given, surrounding whitespace included.
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            spec = Arc::new(AndSpecification::new(
                spec,
                Arc::new(SearchTextSpec::new(search)),
            ));
        }

        spec
    }
}
