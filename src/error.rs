use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use validator::ValidationErrors;

use crate::auth::TokenError;

/// Cause of a 500, attached to the response so the router can decide
/// whether clients get to see it.
#[derive(Debug, Clone)]
pub struct InternalDetail(pub String);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    DuplicateKey(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = ::std::result::Result<T, AppError>;

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::DuplicateKey(_) => "DUPLICATE_KEY",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateKey(_) | AppError::InvalidCredentials =>
                StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // the forum has always answered both with 401
            AppError::Unauthorized(_) | AppError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self { AppError::Unauthorized(e.to_string()) }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self { AppError::Validation(e.body_text()) }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self { AppError::Validation(e.body_text()) }
}

/// One message per failed rule, ordered by field name.
impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        let mut fields = e.field_errors().into_iter().collect::<Vec<_>>();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        let message = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| match &err.message {
                    Some(m) => m.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect::<Vec<_>>()
            .join(", ");

        AppError::Validation(message)
    }
}

impl AppError {
    fn body(kind: &str, message: impl Into<String>) -> Json<serde_json::Value> {
        Json(json!({
            "kind": kind,
            "message": message.into(),
        }))
    }

    /// The 500 body carrying its cause, for deployments that show it.
    pub(crate) fn detailed_internal(detail: &InternalDetail) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Self::body("INTERNAL_ERROR", detail.0.clone()),
        )
            .into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Self::body(self.kind(), match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            e => e.to_string(),
        });

        match self {
            AppError::Internal(e) => {
                tracing::error!("internal error: {:?}", e);

                let mut resp = (status, body).into_response();
                resp.extensions_mut().insert(InternalDetail(format!("{:#}", e)));
                resp
            },
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DuplicateKey("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Please provide a valid email"))]
        email: String,
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    #[test]
    fn validation_errors_become_one_message() {
        let err = AppError::from(
            Signup {
                email: "x y@z".to_string(),
                password: "short".to_string(),
            }
            .validate()
            .unwrap_err(),
        );

        match err {
            AppError::Validation(msg) => assert_eq!(
                msg,
                "Please provide a valid email, Password must be at least 6 characters"
            ),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn internal_cause_stays_out_of_the_body() {
        let resp = AppError::Internal(anyhow::anyhow!("disk on fire")).into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.extensions().get::<InternalDetail>().map(|d| d.0.as_str()),
            Some("disk on fire")
        );
    }
}
