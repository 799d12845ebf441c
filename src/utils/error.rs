use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::gateway::RequestError;
use crate::mutation::{MutationError, MutationKind, ValidationError};
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("External service error: {0}")]
    ExternalServiceError(#[from] RequestError),

    #[error("Could not {kind:?} event: {error}")]
    Mutation {
        kind: MutationKind,
        error: MutationError,
    },

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn mutation(kind: MutationKind, error: MutationError) -> Self {
        AppError::Mutation { kind, error }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ExternalServiceError(e) => request_status(e),
            AppError::Mutation { error, .. } => match error {
                MutationError::Invalid(_) => StatusCode::BAD_REQUEST,
                MutationError::Request(e) => request_status(e),
                MutationError::AlreadySubmitting => StatusCode::CONFLICT,
                MutationError::Unmounted | MutationError::NothingLoaded(_) => {
                    StatusCode::NOT_FOUND
                }
            },
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "VALIDATION_ERROR",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::CONFLICT => "CONFLICT",
            StatusCode::BAD_GATEWAY => "EXTERNAL_SERVICE_ERROR",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::ExternalServiceError(err) => err.message(),
            AppError::Mutation { kind, error } => error.notification(*kind).title,
            AppError::InternalServerError(_) => "An internal error occurred".to_string(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::Mutation { kind, error } => {
                let mut details = match error {
                    MutationError::Invalid(err) => validation_details(err),
                    _ => json!({}),
                };
                details["notification"] = json!(error.notification(*kind));
                Some(details)
            }
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            AppError::NotFound(msg) => {
                warn!(message = %msg, "Request not served");
            }
            AppError::ExternalServiceError(e) => {
                error!(error = ?e, "Data service error");
            }
            AppError::Mutation { kind, error } => match error {
                MutationError::Invalid(err) => {
                    warn!(?kind, fields = ?err.fields(), "Rejected invalid form");
                }
                _ => warn!(?kind, error = %error, "Mutation failed"),
            },
            AppError::InternalServerError(msg) => {
                error!(message = %msg, "Internal error");
            }
        }
    }
}

/// Upstream 404s stay 404s; anything else the data service does wrong is a
/// bad gateway from the caller's point of view.
fn request_status(err: &RequestError) -> StatusCode {
    if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_GATEWAY
    }
}

fn validation_details(err: &ValidationError) -> Value {
    json!({
        "fields": err.problems,
        "description": err.description(),
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        error_response(code, self.public_message(), self.details(), status)
    }
}
