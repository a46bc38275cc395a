//! API error taxonomy.
//!
//! Every failure a handler can report maps to one `ApiError` variant, which
//! in turn maps to an HTTP status and a stable machine-readable code. All
//! responses, success and failure alike, use the same envelope:
//!
//! ```json
//! { "data": ..., "error": null }
//! { "data": null, "error": { "code": "NOT_FOUND", "message": "..." } }
//! ```

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    AlreadyImported(&'static str),

    /// The link's submission slot was already taken.
    #[error("this link has already been used to submit the form")]
    LinkFulfilled,

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("You do not have access to this task")]
    Forbidden,

    #[error("This project does not have dashboard access configured")]
    NoPasswordConfigured,

    #[error("Invalid password")]
    InvalidCredential,

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("upload failed: {0}")]
    Upload(#[from] std::io::Error),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::AlreadyImported(_) => "ALREADY_IMPORTED",
            ApiError::LinkFulfilled => "LINK_FULFILLED",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::InvalidToken => "INVALID_TOKEN",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::NoPasswordConfigured => "NO_PASSWORD",
            ApiError::InvalidCredential => "INVALID_PASSWORD",
            ApiError::Storage(_) => "DB_ERROR",
            ApiError::Signing(_) => "INTERNAL_ERROR",
            ApiError::Upload(_) => "UPLOAD_ERROR",
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_)
            | ApiError::AlreadyImported(_)
            | ApiError::NoPasswordConfigured => StatusCode::BAD_REQUEST,
            ApiError::LinkFulfilled => StatusCode::CONFLICT,
            ApiError::Unauthorized | ApiError::InvalidToken | ApiError::InvalidCredential => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Storage(_) | ApiError::Signing(_) | ApiError::Upload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "data": null,
            "error": { "code": self.code(), "message": self.to_string() },
        }))
    }
}

/// Builds the success side of the response envelope.
pub fn ok_envelope<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": data, "error": null }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(ApiError::NotFound("Project").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::AlreadyImported("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::LinkFulfilled.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn signing_failure_is_a_server_error() {
        let err = ApiError::from(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidKeyFormat,
        ));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ApiError::NoPasswordConfigured.code(), "NO_PASSWORD");
        assert_eq!(ApiError::InvalidCredential.code(), "INVALID_PASSWORD");
        assert_eq!(ApiError::Validation("x".into()).code(), "VALIDATION_ERROR");
    }
}
