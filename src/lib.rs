//! Thrifty is a backend for tracking personal finances.
//!
//! Users record income and expenses, save towards personal goals and pool
//! money into community goals. Every operation that moves money keeps the
//! user's balance, total savings and saving streak in step with the ledger.
//!
//! This library provides a JSON REST API secured with bearer tokens.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod community;
mod contribution;
mod database_id;
mod db;
pub mod endpoints;
mod expense;
mod goal;
mod income;
mod ledger;
mod logging;
mod profile;
mod routing;
mod streak;
mod timezone;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{DEFAULT_TOKEN_DURATION, JwtKeys, decode_token, encode_token};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use streak::{SavingStreak, apply_streak};
pub use user::{User, UserID, create_user, get_user_by_id};
pub use validation::FieldError;

use crate::database_id::DatabaseId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body was missing fields or had fields with invalid values.
    ///
    /// Each [FieldError] names the offending field so that the client can
    /// show the message next to the right input.
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    /// The user tried to contribute more money than their balance holds.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The community goal has been closed and no longer accepts contributions.
    #[error("community goal is not active")]
    InactiveCommunityGoal,

    /// An expense referred to a goal that does not exist or belongs to
    /// another user.
    #[error("the goal ID {0} does not refer to one of the user's goals")]
    InvalidGoal(DatabaseId),

    /// The requested resource was not found.
    ///
    /// Internally, this error occurs when a query returns no rows. Query
    /// functions replace it with one of the resource specific variants below
    /// before it reaches a route handler.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The income entry does not exist.
    #[error("income not found")]
    IncomeNotFound,

    /// The expense does not exist.
    #[error("expense not found")]
    ExpenseNotFound,

    /// The goal does not exist.
    #[error("goal not found")]
    GoalNotFound,

    /// The community goal does not exist.
    #[error("community goal not found")]
    CommunityGoalNotFound,

    /// The user in a valid token no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// The user tried to read or change a resource owned by someone else.
    #[error("user not authorized")]
    NotAuthorized,

    /// The bearer token was missing, malformed or expired.
    #[error("invalid or missing bearer token")]
    InvalidToken,

    /// A bearer token could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Validation failed",
                    "errors": errors,
                })),
            )
                .into_response(),
            Error::InsufficientBalance => message_response(StatusCode::BAD_REQUEST, "Insufficient balance"),
            Error::InactiveCommunityGoal => {
                message_response(StatusCode::BAD_REQUEST, "Community goal is not active")
            }
            Error::InvalidGoal(goal_id) => message_response(
                StatusCode::BAD_REQUEST,
                &format!("Goal {goal_id} does not exist"),
            ),
            Error::NotFound => message_response(StatusCode::NOT_FOUND, "Not found"),
            Error::IncomeNotFound => message_response(StatusCode::NOT_FOUND, "Income not found"),
            Error::ExpenseNotFound => message_response(StatusCode::NOT_FOUND, "Expense not found"),
            Error::GoalNotFound => message_response(StatusCode::NOT_FOUND, "Goal not found"),
            Error::CommunityGoalNotFound => {
                message_response(StatusCode::NOT_FOUND, "Community goal not found")
            }
            Error::UserNotFound => message_response(StatusCode::NOT_FOUND, "User not found"),
            Error::NotAuthorized => message_response(StatusCode::UNAUTHORIZED, "User not authorized"),
            Error::InvalidToken => message_response(StatusCode::UNAUTHORIZED, "Not authorized"),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                server_error_response(&error)
            }
        }
    }
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// The details of unexpected errors are only sent to the client in debug builds.
fn server_error_response(error: &Error) -> Response {
    let body = if cfg!(debug_assertions) {
        json!({ "message": "Server error", "error": error.to_string() })
    } else {
        json!({ "message": "Server error" })
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, FieldError};

    async fn body_json(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        (
            status,
            serde_json::from_slice(&bytes).expect("response body is not JSON"),
        )
    }

    #[tokio::test]
    async fn validation_error_lists_fields() {
        let (status, body) = body_json(Error::Validation(vec![FieldError::new(
            "title",
            "Title is required",
        )]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(body["errors"][0]["message"], "Title is required");
    }

    #[tokio::test]
    async fn business_rule_violations_are_bad_requests() {
        let (status, body) = body_json(Error::InsufficientBalance).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Insufficient balance");

        let (status, body) = body_json(Error::InactiveCommunityGoal).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Community goal is not active");
    }

    #[tokio::test]
    async fn ownership_failure_is_unauthorized() {
        let (status, body) = body_json(Error::NotAuthorized).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "User not authorized");
    }

    #[tokio::test]
    async fn missing_resources_are_not_found() {
        for (error, message) in [
            (Error::IncomeNotFound, "Income not found"),
            (Error::ExpenseNotFound, "Expense not found"),
            (Error::GoalNotFound, "Goal not found"),
            (Error::CommunityGoalNotFound, "Community goal not found"),
        ] {
            let (status, body) = body_json(error).await;

            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], message);
        }
    }

    #[tokio::test]
    async fn unexpected_errors_are_server_errors() {
        let (status, body) = body_json(Error::DatabaseLockError).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server error");
        // Tests are built with debug assertions, so the detail is included.
        assert_eq!(body["error"], "could not acquire the database lock");
    }
}
