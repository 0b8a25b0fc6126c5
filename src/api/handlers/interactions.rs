// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::{AppState, AuthenticatedUser, FeedJson, FeedPath};
use crate::error::FeedError;
use crate::metrics::track;
use crate::models::InteractionEvent;
use crate::services::interactions::{self, CreateInteractionInput};
use crate::store::InteractionFilter;

/// Interaction log
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/interactions", get(all_interactions))
        .route(
            "/api/posts/:post_id/interactions",
            get(interactions_by_post).post(create_interaction),
        )
        .route("/api/users/:user_id/interactions", get(interactions_by_user))
}

pub async fn all_interactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<InteractionEvent>>, FeedError> {
    let events = interactions::list_interactions(state.store.as_ref(), InteractionFilter::All).await?;
    Ok(Json(events))
}

pub async fn interactions_by_post(
    State(state): State<AppState>,
    FeedPath(post_id): FeedPath<i32>,
) -> Result<Json<Vec<InteractionEvent>>, FeedError> {
    let filter = InteractionFilter::Post(post_id);
    Ok(Json(interactions::list_interactions(state.store.as_ref(), filter).await?))
}

pub async fn interactions_by_user(
    State(state): State<AppState>,
    FeedPath(user_id): FeedPath<i32>,
) -> Result<Json<Vec<InteractionEvent>>, FeedError> {
    let filter = InteractionFilter::User(user_id);
    Ok(Json(interactions::list_interactions(state.store.as_ref(), filter).await?))
}

pub async fn create_interaction(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    FeedPath(post_id): FeedPath<i32>,
    FeedJson(input): FeedJson<CreateInteractionInput>,
) -> Result<(StatusCode, Json<InteractionEvent>), FeedError> {
    let result =
        interactions::create_interaction(state.store.as_ref(), caller.user(), post_id, input).await;
    Ok((StatusCode::CREATED, Json(track("createInteraction", result)?)))
}
