// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! The per-post analytics ledger.
//!
//! None of these operations check the caller: any client may bump views or
//! overwrite counters.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::active_post;
use crate::error::{FeedError, FeedResult};
use crate::models::{CountsPatch, PostAnalytics};
use crate::store::FeedStore;

/// Ledger row for a post, or `None` when nothing has been recorded yet
pub async fn analytics_by_post(
    store: &dyn FeedStore,
    post_id: i32,
) -> FeedResult<Option<PostAnalytics>> {
    let analytics = store.find_analytics(post_id).await?;
    if analytics.is_none() {
        debug!("No analytics recorded for post {}", post_id);
    }
    Ok(analytics)
}

pub async fn all_analytics(store: &dyn FeedStore) -> FeedResult<Vec<PostAnalytics>> {
    Ok(store.list_analytics().await?)
}

pub async fn increment_view(store: &dyn FeedStore, post_id: i32) -> FeedResult<PostAnalytics> {
    let post = active_post(store, post_id).await?;
    let analytics = store.upsert_view(post.id, Utc::now()).await?;
    debug!("Post {} now has {} views", post.id, analytics.view_count);
    Ok(analytics)
}

/// Overwrite the counters present in `patch` with absolute values
pub async fn update_interaction_counts(
    store: &dyn FeedStore,
    post_id: i32,
    patch: CountsPatch,
) -> FeedResult<PostAnalytics> {
    if let Some((field, value)) = patch.first_negative() {
        warn!("Rejected negative {} ({}) for post {}", field, value, post_id);
        return Err(FeedError::invalid_argument(format!(
            "{} must not be negative",
            field
        )));
    }

    let post = active_post(store, post_id).await?;
    let analytics = store.upsert_counts(post.id, &patch, Utc::now()).await?;
    info!("Updated interaction counts for post {}: {:?}", post.id, patch);
    Ok(analytics)
}
