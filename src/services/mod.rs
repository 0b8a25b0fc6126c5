// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Feed operations, independent of the HTTP layer.
//!
//! Every function takes the store and, for protected operations, the caller
//! resolved by the identity provider (`None` for anonymous requests).

pub mod analytics;
pub mod content;
pub mod interactions;

use crate::error::{FeedError, FeedResult};
use crate::models::{Post, User};
use crate::store::FeedStore;

pub(crate) const POST_NOT_FOUND: &str = "Post not found";

/// Reject anonymous callers
pub(crate) fn require_caller(caller: Option<&User>) -> FeedResult<&User> {
    caller.ok_or(FeedError::Unauthenticated)
}

/// Fetch a post that exists and has not been soft-deleted
pub(crate) async fn active_post(store: &dyn FeedStore, post_id: i32) -> FeedResult<Post> {
    match store.find_post(post_id).await? {
        Some(post) if post.lifecycle.is_active() => Ok(post),
        _ => Err(FeedError::not_found(POST_NOT_FOUND)),
    }
}
