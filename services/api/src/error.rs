use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dto::{FieldError, PatchError};
use serde::Serialize;

use crate::password::PasswordError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("You are not logged in")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The email typed to confirm account deletion is not the account's email.
    #[error("Email does not match the logged in account")]
    ConfirmationMismatch,

    #[error("Entered wrong details")]
    Validation(Vec<FieldError>),

    #[error("{0} is not a field that can be updated")]
    InvalidField(String),

    #[error("You do not manage this {0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Nothing to update")]
    NothingToUpdate,

    #[error("Already logged out")]
    AlreadyLoggedOut,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::ConfirmationMismatch
            | ApiError::Validation(_)
            | ApiError::InvalidField(_)
            | ApiError::AlreadyLoggedOut => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NothingToUpdate => StatusCode::EXPECTATION_FAILED,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict(what) => ApiError::Conflict(what.to_string()),
            other => ApiError::Unexpected(other.into()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        ApiError::Unexpected(error.into())
    }
}

impl From<PatchError> for ApiError {
    fn from(error: PatchError) -> Self {
        match error {
            PatchError::InvalidField(field) => ApiError::InvalidField(field),
            PatchError::NotAnObject => ApiError::validation("body", error.to_string()),
            PatchError::Invalid(errors) => ApiError::Validation(errors),
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation("body", rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    msg: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = match &self {
            ApiError::Unexpected(error) => {
                tracing::error!(?error, "unexpected api error");
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        };
        let errors = match self {
            ApiError::Validation(errors) => errors,
            _ => Vec::new(),
        };
        (status, Json(ErrorBody { msg, errors })).into_response()
    }
}
