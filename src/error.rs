use crate::repositories::RepositoryError;
use crate::services::{
    AdminServiceError, AuthServiceError, DashboardServiceError, ItemServiceError,
    UserServiceError,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Action not found")]
    UnknownAction,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials(_) | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::UnknownAction => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Database(_)
            | AppError::Repository(_)
            | AppError::Session(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Validation(msg) => AppError::Validation(msg),
            UserServiceError::UserNotFound => AppError::NotFound(err.to_string()),
            UserServiceError::EmailTaken => AppError::Conflict(err.to_string()),
            UserServiceError::NothingToUpdate | UserServiceError::CannotDeleteSelf => {
                AppError::Validation(err.to_string())
            }
            UserServiceError::HashingError(e) => AppError::Internal(e.to_string()),
            UserServiceError::RepositoryError(e) => AppError::Repository(e),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            // Unknown email and wrong password read the same from outside.
            AuthServiceError::NotFound | AuthServiceError::BadCredentials => {
                AppError::InvalidCredentials(AuthServiceError::BadCredentials.to_string())
            }
            AuthServiceError::Inactive => AppError::InvalidCredentials(err.to_string()),
            AuthServiceError::NotAuthenticated => AppError::Unauthorized,
            AuthServiceError::Forbidden => AppError::Forbidden,
            AuthServiceError::SessionError(e) => AppError::Session(e),
            AuthServiceError::RepositoryError(e) => AppError::Repository(e),
        }
    }
}

impl From<ItemServiceError> for AppError {
    fn from(err: ItemServiceError) -> Self {
        match err {
            ItemServiceError::Validation(msg) => AppError::Validation(msg),
            ItemServiceError::ItemNotFound | ItemServiceError::NotOwner => {
                AppError::NotFound(err.to_string())
            }
            ItemServiceError::InvalidCategory | ItemServiceError::NothingToUpdate => {
                AppError::Validation(err.to_string())
            }
            ItemServiceError::RepositoryError(e) => AppError::Repository(e),
        }
    }
}

impl From<DashboardServiceError> for AppError {
    fn from(err: DashboardServiceError) -> Self {
        match err {
            DashboardServiceError::UserNotFound => AppError::NotFound(err.to_string()),
            DashboardServiceError::RepositoryError(e) => AppError::Repository(e),
        }
    }
}

impl From<AdminServiceError> for AppError {
    fn from(err: AdminServiceError) -> Self {
        match err {
            AdminServiceError::UserNotFound => AppError::NotFound(err.to_string()),
            AdminServiceError::User(e) => e.into(),
            AdminServiceError::RepositoryError(e) => AppError::Repository(e),
        }
    }
}
