// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use super::AppState;
use crate::error::FeedError;
use crate::models::User;

/// Header carrying the id of the user authenticated by the fronting identity provider
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller of a protected route.
///
/// A missing, malformed or unknown user id is rejected with
/// [`FeedError::Unauthenticated`]. Place it before `Path` and body extractors
/// so anonymous requests fail on identity before any argument is inspected.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// The caller in the form service functions take
    pub fn user(&self) -> Option<&User> {
        Some(&self.0)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = FeedError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
            return Err(FeedError::Unauthenticated);
        };
        let Some(user_id) = raw.to_str().ok().and_then(|v| v.trim().parse::<i32>().ok()) else {
            debug!("Ignoring malformed {} header", USER_ID_HEADER);
            return Err(FeedError::Unauthenticated);
        };

        match state.store.find_user(user_id).await? {
            Some(user) => Ok(AuthenticatedUser(user)),
            None => {
                debug!("Unknown user id {} in {} header", user_id, USER_ID_HEADER);
                Err(FeedError::Unauthenticated)
            }
        }
    }
}
