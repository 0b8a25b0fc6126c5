// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! `Json` and `Path` wrappers whose rejections use the [`FeedError`] body.

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use tracing::debug;

use crate::error::FeedError;

/// Request body; malformed or mistyped JSON is an invalid argument
#[derive(Debug, Clone)]
pub struct FeedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FeedJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = FeedError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(FeedJson(value)),
            Err(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                Err(FeedError::invalid_argument(rejection.body_text()))
            }
        }
    }
}

/// Path parameters; an unparsable id is an invalid argument
#[derive(Debug, Clone)]
pub struct FeedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for FeedPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = FeedError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(FeedPath(value)),
            Err(rejection) => Err(FeedError::invalid_argument(rejection.body_text())),
        }
    }
}
