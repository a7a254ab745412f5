//! Route handlers
//!
//! Handlers call the store directly: every store operation holds its locks
//! only for the duration of one in-memory map access.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use devmasters_core::config::PaginationConfig;
use devmasters_core::{
    Error, ListQuery, NewProject, Project, ProjectFilter, ProjectId, ProjectPage,
    ProjectPriority, ProjectStatus, ProjectUpdate,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use super::response::ApiError;

/// Query string accepted by `GET /projects`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub status: Option<String>,
    pub priority: Option<u8>,
    pub search: Option<String>,
}

impl ListParams {
    /// Check the parameters against the configured bounds and build the
    /// store query.
    pub fn into_list_query(
        self,
        pagination: &PaginationConfig,
    ) -> devmasters_core::Result<ListQuery> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(Error::validation("page", "must be at least 1"));
        }

        let size = self.size.unwrap_or(pagination.default_size);
        if !(1..=pagination.max_size).contains(&size) {
            return Err(Error::validation(
                "size",
                format!("must be between 1 and {}", pagination.max_size),
            ));
        }

        let mut filter = ProjectFilter::default();
        if let Some(status) = self.status {
            let status = ProjectStatus::parse(&status).ok_or_else(|| {
                Error::validation("status", format!("unknown status '{}'", status))
            })?;
            filter = filter.with_status(status);
        }
        if let Some(priority) = self.priority {
            let priority = ProjectPriority::try_from(priority)
                .map_err(|message| Error::validation("priority", message))?;
            filter = filter.with_priority(priority);
        }
        if let Some(search) = self.search {
            filter = filter.with_search(search);
        }

        Ok(ListQuery::new(page, size).with_filter(filter))
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Bem-vindo à DevMasters API!" }))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let projects = state.store.count()?;
    Ok(Json(json!({ "status": "healthy", "projects": projects })))
}

pub async fn list_projects(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ProjectPage>, ApiError> {
    let Query(params) = params?;
    let query = params.into_list_query(&state.config.pagination)?;
    Ok(Json(state.store.list(&query)?))
}

pub async fn get_project(
    State(state): State<AppState>,
    id: Result<Path<ProjectId>, PathRejection>,
) -> Result<Json<Project>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.store.get(id)?))
}

pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(new) = payload?;
    let project = state.store.create(new)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    id: Result<Path<ProjectId>, PathRejection>,
    payload: Result<Json<ProjectUpdate>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    Ok(Json(state.store.update(id, changes)?))
}

pub async fn delete_project(
    State(state): State<AppState>,
    id: Result<Path<ProjectId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
