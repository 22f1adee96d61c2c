// Error handling for uritmpl's HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::fmt;

use crate::domain::template::{ExpansionError, ExtractionError, InvalidValue, ParseError};
use crate::domain::RouteError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// A well-formed URI that the template does not match
    Unmatched(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unmatched(msg) => write!(f, "Unmatched: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unmatched(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

// Implement IntoResponse so Axum can convert errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ExpansionError> for AppError {
    fn from(err: ExpansionError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Unmatched(err.to_string())
    }
}

impl From<InvalidValue> for AppError {
    fn from(err: InvalidValue) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::UnknownRoute(name) => AppError::NotFound(format!("route '{}'", name)),
            RouteError::DuplicateRoute(name) => {
                AppError::BadRequest(format!("duplicate route '{}'", name))
            }
            RouteError::Expansion(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::Template;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Unmatched("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_engine_errors_convert() {
        let err: AppError = Template::parse("{oops").unwrap_err().into();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err: AppError = Template::parse("/a/{id}")
            .unwrap()
            .extract("/b/1")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Unmatched(_)));

        let err: AppError = RouteError::UnknownRoute("user".into()).into();
        assert_eq!(err.to_string(), "Not found: route 'user'");
    }
}
