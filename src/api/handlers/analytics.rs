// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::{AppState, FeedJson, FeedPath};
use crate::error::FeedError;
use crate::metrics::track;
use crate::models::{CountsPatch, PostAnalytics};
use crate::services::analytics;

/// Analytics ledger; none of these routes require a caller
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/analytics", get(all_analytics))
        .route(
            "/api/posts/:post_id/analytics",
            get(analytics_by_post).patch(update_interaction_counts),
        )
        .route("/api/posts/:post_id/views", post(increment_view))
}

/// Returns `null` when the post has no ledger row yet
pub async fn analytics_by_post(
    State(state): State<AppState>,
    FeedPath(post_id): FeedPath<i32>,
) -> Result<Json<Option<PostAnalytics>>, FeedError> {
    Ok(Json(analytics::analytics_by_post(state.store.as_ref(), post_id).await?))
}

pub async fn all_analytics(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostAnalytics>>, FeedError> {
    Ok(Json(analytics::all_analytics(state.store.as_ref()).await?))
}

pub async fn increment_view(
    State(state): State<AppState>,
    FeedPath(post_id): FeedPath<i32>,
) -> Result<Json<PostAnalytics>, FeedError> {
    let result = analytics::increment_view(state.store.as_ref(), post_id).await;
    Ok(Json(track("incrementView", result)?))
}

pub async fn update_interaction_counts(
    State(state): State<AppState>,
    FeedPath(post_id): FeedPath<i32>,
    FeedJson(patch): FeedJson<CountsPatch>,
) -> Result<Json<PostAnalytics>, FeedError> {
    let result = analytics::update_interaction_counts(state.store.as_ref(), post_id, patch).await;
    Ok(Json(track("updateInteractionCounts", result)?))
}
