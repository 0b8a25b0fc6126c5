// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Storage seam for the feed.
//!
//! Every read and write the API performs goes through [`FeedStore`]. The
//! PostgreSQL implementation relies on database constraints for (user, post)
//! uniqueness; the in-memory implementation enforces the same rules under its
//! write lock.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::content::{NewComment, NewPost};
use crate::models::engagement::{NewInteractionEvent, NewLike, NewShare};
use crate::models::{
    Comment, CountsPatch, EngagementCounts, InteractionEvent, Like, NewUser, Post, PostAnalytics,
    Share, Tag, User,
};

/// Errors raised by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("duplicate row violates a unique constraint")]
    Duplicate,
    #[error("database query failed: {0}")]
    Query(diesel::result::Error),
    #[error("failed to get database connection: {0}")]
    Pool(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => StoreError::Duplicate,
            other => StoreError::Query(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which rows an interaction-log listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionFilter {
    All,
    Post(i32),
    User(i32),
}

impl InteractionFilter {
    pub fn matches(&self, event: &InteractionEvent) -> bool {
        match *self {
            InteractionFilter::All => true,
            InteractionFilter::Post(post_id) => event.post_id == post_id,
            InteractionFilter::User(user_id) => event.user_id == user_id,
        }
    }
}

#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Cheap round trip used by the health check.
    async fn ping(&self) -> StoreResult<()>;

    // --- Identity ---

    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>>;

    async fn users_by_ids(&self, user_ids: &[i32]) -> StoreResult<Vec<User>>;

    // --- Content ---

    /// Active posts, newest first, optionally restricted to one author.
    async fn list_active_posts(&self, author_id: Option<i32>) -> StoreResult<Vec<Post>>;

    /// Post by id regardless of lifecycle.
    async fn find_post(&self, post_id: i32) -> StoreResult<Option<Post>>;

    /// Insert a post and attach the given (already normalized) tag names,
    /// creating tags that do not exist yet. Runs as one unit.
    async fn insert_post(&self, post: NewPost, tag_names: &[String]) -> StoreResult<Post>;

    async fn mark_post_deleted(&self, post_id: i32) -> StoreResult<()>;

    async fn list_tags(&self) -> StoreResult<Vec<Tag>>;

    /// `(post_id, tag)` pairs for the given posts.
    async fn tags_for_posts(&self, post_ids: &[i32]) -> StoreResult<Vec<(i32, Tag)>>;

    /// Active comments on the given posts, oldest first.
    async fn active_comments_for_posts(&self, post_ids: &[i32]) -> StoreResult<Vec<Comment>>;

    /// Comment by id regardless of lifecycle.
    async fn find_comment(&self, comment_id: i32) -> StoreResult<Option<Comment>>;

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment>;

    async fn mark_comment_deleted(&self, comment_id: i32) -> StoreResult<()>;

    // --- Engagement ---

    /// Live like / active-comment / share totals keyed by post id. Posts
    /// without any engagement may be absent from the map.
    async fn engagement_counts(&self, post_ids: &[i32])
        -> StoreResult<HashMap<i32, EngagementCounts>>;

    /// Fails with [`StoreError::Duplicate`] when the (user, post) pair exists.
    async fn insert_like(&self, like: NewLike) -> StoreResult<Like>;

    /// Returns whether a like was removed.
    async fn delete_like(&self, user_id: i32, post_id: i32) -> StoreResult<bool>;

    /// Fails with [`StoreError::Duplicate`] when the (user, post) pair exists.
    async fn insert_share(&self, share: NewShare) -> StoreResult<Share>;

    // --- Interaction log ---

    async fn list_interactions(&self, filter: InteractionFilter)
        -> StoreResult<Vec<InteractionEvent>>;

    async fn insert_interaction(&self, event: NewInteractionEvent)
        -> StoreResult<InteractionEvent>;

    // --- Analytics ledger ---

    async fn find_analytics(&self, post_id: i32) -> StoreResult<Option<PostAnalytics>>;

    async fn list_analytics(&self) -> StoreResult<Vec<PostAnalytics>>;

    /// Create the row with zero counters if absent, then add one view.
    async fn upsert_view(&self, post_id: i32, at: DateTime<Utc>) -> StoreResult<PostAnalytics>;

    /// Create the row with zero counters if absent, then overwrite the
    /// counters present in `patch`.
    async fn upsert_counts(
        &self,
        post_id: i32,
        patch: &CountsPatch,
        at: DateTime<Utc>,
    ) -> StoreResult<PostAnalytics>;
}
