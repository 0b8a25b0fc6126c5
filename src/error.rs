// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Request-level failure of a feed operation.
///
/// Ownership failures on posts and comments are reported as `NotFound` with
/// the same message as a missing row, so callers cannot discover ids they
/// do not own.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{0}")]
    NotFound(String),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    pub fn not_found(message: impl Into<String>) -> Self {
        FeedError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        FeedError::Conflict(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        FeedError::InvalidArgument(message.into())
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::NotFound(_) => "not_found",
            FeedError::Unauthenticated => "unauthenticated",
            FeedError::Conflict(_) => "conflict",
            FeedError::InvalidArgument(_) => "invalid_argument",
            FeedError::Storage(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            FeedError::NotFound(_) => StatusCode::NOT_FOUND,
            FeedError::Unauthenticated => StatusCode::UNAUTHORIZED,
            FeedError::Conflict(_) => StatusCode::CONFLICT,
            FeedError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            FeedError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let message = match &self {
            FeedError::Storage(e) => {
                error!("Storage failure: {}", e);
                "Internal storage error".to_string()
            }
            other => other.to_string(),
        };
        (
            self.status(),
            Json(json!({
                "error": message,
                "kind": self.kind(),
            })),
        )
            .into_response()
    }
}
