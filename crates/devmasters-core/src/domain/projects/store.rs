//! In-memory project store
//!
//! A single coarse `RwLock` guards the record map and the id counter. A
//! per-record mutex from [`RecordLockManager`] serializes updates to the same
//! project; updates to different projects only meet briefly at commit time.
//!
//! Every mutation validates first and then performs exactly one insert,
//! replace or remove, so a failed call leaves the store untouched.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::application::validators::ProjectValidator;
use crate::domain::locking::RecordLockManager;
use crate::error::{Error, Result};

use super::entity::{NewProject, Project, ProjectId, ProjectUpdate};
use super::specification::ProjectFilter;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page a single list call returns
pub const MAX_PAGE_SIZE: usize = 100;

/// Pagination and filters for [`ProjectStore::list`]
///
/// Out-of-range values are corrected by the store rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: usize,
    pub size: usize,
    pub filter: ProjectFilter,
}

impl ListQuery {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            filter: ProjectFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ProjectFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPage {
    pub items: Vec<Project>,
    /// Number of projects matching the filters
    pub total: usize,
    /// Page actually returned, after clamping
    pub page: usize,
    /// Page size actually used, after clamping
    pub size: usize,
    /// Number of pages for `total`
    pub pages: usize,
}

#[derive(Debug, Default)]
struct StoreState {
    projects: BTreeMap<ProjectId, Project>,
    last_id: ProjectId,
}

/// Synchronized in-memory repository of projects
///
/// Construct once and share behind an `Arc`.
#[derive(Debug, Default)]
pub struct ProjectStore {
    state: RwLock<StoreState>,
    record_locks: RecordLockManager<ProjectId>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// List projects matching the query's filters, ordered by id
    pub fn list(&self, query: &ListQuery) -> Result<ProjectPage> {
        let size = query.size.clamp(1, MAX_PAGE_SIZE);
        let spec = query.filter.specification();

        let state = self.read()?;
        let matching: Vec<&Project> = state
            .projects
            .values()
            .filter(|project| spec.is_satisfied_by(project))
            .collect();

        let total = matching.len();
        let pages = total.div_ceil(size);
        let page = query.page.clamp(1, pages.max(1));
        let items: Vec<Project> = matching
            .into_iter()
            .skip((page - 1) * size)
            .take(size)
            .cloned()
            .collect();

        debug!(
            requested_page = query.page,
            page,
            size,
            total,
            returned = items.len(),
            "Listed projects"
        );

        Ok(ProjectPage {
            items,
            total,
            page,
            size,
            pages,
        })
    }

    /// Get a project by id
    pub fn get(&self, id: ProjectId) -> Result<Project> {
        let project = self
            .read()?
            .projects
            .get(&id)
            .cloned()
            .ok_or(Error::ProjectNotFound(id))?;

        debug!(project_id = id, "Fetched project");
        Ok(project)
    }

    /// Create a project, assigning the next id
    pub fn create(&self, new: NewProject) -> Result<Project> {
        let title = ProjectValidator::validate_title(&new.title)?;
        let description = ProjectValidator::validate_description(&new.description)?;

        let mut state = self.write()?;
        ensure_title_available(&state.projects, &title, None)?;

        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| Error::Internal("project id space exhausted".to_string()))?;
        let now = Utc::now();
        let project = Project {
            id,
            title,
            description,
            priority: new.priority,
            status: new.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        state.last_id = id;
        state.projects.insert(id, project.clone());

        info!(
            project_id = id,
            title = %project.title,
            status = %project.status,
            "Project created"
        );
        Ok(project)
    }

    /// Apply a partial update to a project
    ///
    /// Only supplied fields change. Title uniqueness is checked against a
    /// snapshot and checked again when the change is committed; the status
    /// must follow the status graph from the current status.
    pub fn update(&self, id: ProjectId, changes: ProjectUpdate) -> Result<Project> {
        let immutable = changes.immutable_fields();
        if !immutable.is_empty() {
            return Err(Error::validation(
                immutable.join(", "),
                "is assigned by the store and cannot be changed",
            ));
        }

        let title = changes
            .title
            .as_deref()
            .map(ProjectValidator::validate_title)
            .transpose()?;
        let description = changes
            .description
            .as_deref()
            .map(ProjectValidator::validate_description)
            .transpose()?;

        // Avoid creating lock entries for ids that were never stored.
        if !self.read()?.projects.contains_key(&id) {
            return Err(Error::ProjectNotFound(id));
        }

        let record_lock = self.record_locks.lock_for(id);
        let _guard = record_lock.acquire();

        let mut project = {
            let state = self.read()?;
            let Some(current) = state.projects.get(&id).cloned() else {
                drop(state);
                self.record_locks.release(&id);
                return Err(Error::ProjectNotFound(id));
            };
            if let Some(title) = &title {
                ensure_title_available(&state.projects, title, Some(id))?;
            }
            current
        };

        if let Some(next) = changes.status {
            if !project.status.can_transition_to(next) {
                warn!(
                    project_id = id,
                    from = %project.status,
                    to = %next,
                    terminal = project.status.is_terminal(),
                    "Rejected status transition"
                );
                return Err(Error::InvalidStatusTransition {
                    from: project.status,
                    to: next,
                });
            }
            project.status = next;
        }
        if let Some(title) = title {
            project.title = title;
        }
        if let Some(description) = description {
            project.description = description;
        }
        if let Some(priority) = changes.priority {
            project.priority = priority;
        }
        project.touch();

        let committed = {
            let mut state = self.write()?;
            if changes.title.is_some() {
                ensure_title_available(&state.projects, &project.title, Some(id))?;
            }
            match state.projects.get_mut(&id) {
                Some(slot) => {
                    *slot = project.clone();
                    true
                }
                None => false,
            }
        };

        if !committed {
            self.record_locks.release(&id);
            return Err(Error::ProjectNotFound(id));
        }

        info!(project_id = id, status = %project.status, "Project updated");
        Ok(project)
    }

    /// Delete a project and discard its record lock
    pub fn delete(&self, id: ProjectId) -> Result<()> {
        let mut state = self.write()?;
        if state.projects.remove(&id).is_none() {
            return Err(Error::ProjectNotFound(id));
        }
        self.record_locks.release(&id);

        info!(project_id = id, "Project deleted");
        Ok(())
    }

    /// Number of live projects
    pub fn count(&self) -> Result<usize> {
        Ok(self.read()?.projects.len())
    }

    /// Number of per-record locks currently allocated
    pub fn record_lock_count(&self) -> usize {
        self.record_locks.len()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| Error::Internal("project map lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| Error::Internal("project map lock poisoned".to_string()))
    }
}

/// Fail with `DuplicateTitle` if another live project has this title,
/// ignoring case.
fn ensure_title_available(
    projects: &BTreeMap<ProjectId, Project>,
    title: &str,
    exclude: Option<ProjectId>,
) -> Result<()> {
    let wanted = title.to_lowercase();
    let taken = projects
        .values()
        .any(|p| Some(p.id) != exclude && p.title.to_lowercase() == wanted);

    if taken {
        warn!(title = %title, "Rejected duplicate project title");
        return Err(Error::DuplicateTitle(title.to_string()));
    }
    Ok(())
}
