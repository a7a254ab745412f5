//! Error responses

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use devmasters_core::Error;
use serde::Serialize;
use tracing::{debug, error};

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub code: &'static str,
}

/// A store or request error on its way to the client
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            Error::DuplicateTitle(_) => StatusCode::CONFLICT,
            Error::InvalidStatusTransition { .. } | Error::Validation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::ConfigError(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::validation("body", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(Error::validation("id", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::validation("query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            debug!(
                code = self.0.code(),
                status = status.as_u16(),
                error = %self.0,
                "Request rejected"
            );
        } else {
            error!(code = self.0.code(), error = %self.0, "Request failed");
        }

        let body = ErrorBody {
            detail: self.0.to_string(),
            code: self.0.code(),
        };
        (status, Json(body)).into_response()
    }
}
