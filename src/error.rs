use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    db::DbError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound { path: String },

    #[error(transparent)]
    Db(#[from] DbError),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Db(err) => match err {
                DbError::Validation(_) => StatusCode::BAD_REQUEST,
                DbError::ConstraintViolation { .. } => StatusCode::CONFLICT,
                DbError::PoolExhausted { .. }
                | DbError::ConnectionTimeout { .. }
                | DbError::Closed => StatusCode::SERVICE_UNAVAILABLE,
                DbError::Configuration(_) | DbError::Query(_) | DbError::Migration(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    // Clients see a generic message for server-side failures.
    fn public_message(&self) -> String {
        match self {
            AppError::Db(DbError::Query(_) | DbError::Migration(_) | DbError::Configuration(_)) => {
                "Database error".to_string()
            }
            AppError::Db(DbError::ConstraintViolation { kind, constraint, .. }) => match constraint {
                Some(name) => format!("Conflict: {kind} constraint {name}"),
                None => format!("Conflict: {kind} constraint"),
            },
            AppError::Db(err) if err.is_transient() || matches!(err, DbError::Closed) => {
                "Service Unavailable".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        }

        let message = self.public_message();
        let path = match self {
            AppError::NotFound { path } => Some(path),
            AppError::Db(_) => None,
        };
        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData {
                error: message,
                path,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ConstraintKind;

    #[test]
    fn db_errors_map_to_status_codes() {
        let cases = [
            (DbError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                DbError::ConstraintViolation {
                    kind: ConstraintKind::Unique,
                    constraint: Some("users_email_key".into()),
                    message: "duplicate key".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                DbError::PoolExhausted { max: 5, timeout_ms: 100 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                DbError::ConnectionTimeout { timeout_ms: 100 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (DbError::Closed, StatusCode::SERVICE_UNAVAILABLE),
            (
                DbError::Query(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
        let missing = AppError::NotFound {
            path: "/api/v1/nope".into(),
        };
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.public_message(), "Not Found");
    }

    #[test]
    fn server_errors_hide_details() {
        let err = AppError::from(DbError::Query(sqlx::Error::RowNotFound));
        assert_eq!(err.public_message(), "Database error");

        let err = AppError::from(DbError::ConstraintViolation {
            kind: ConstraintKind::Check,
            constraint: Some("user_follows_check".into()),
            message: "new row violates check constraint".into(),
        });
        assert_eq!(err.public_message(), "Conflict: check constraint user_follows_check");
    }
}
