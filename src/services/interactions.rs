// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{active_post, require_caller};
use crate::error::{FeedError, FeedResult};
use crate::models::engagement::NewInteractionEvent;
use crate::models::{InteractionEvent, InteractionType, User};
use crate::store::{FeedStore, InteractionFilter};

/// Arguments of `createInteraction`. The type arrives as free text and is
/// validated against [`InteractionType`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInteractionInput {
    pub interaction_type: String,
}

pub async fn list_interactions(
    store: &dyn FeedStore,
    filter: InteractionFilter,
) -> FeedResult<Vec<InteractionEvent>> {
    let events = store.list_interactions(filter).await?;
    debug!("Listing {} interaction events for {:?}", events.len(), filter);
    Ok(events)
}

/// Append one event to the log. Repeated identical events are all stored.
pub async fn create_interaction(
    store: &dyn FeedStore,
    caller: Option<&User>,
    post_id: i32,
    input: CreateInteractionInput,
) -> FeedResult<InteractionEvent> {
    let user = require_caller(caller)?;
    let interaction_type: InteractionType = input.interaction_type.parse().map_err(|_| {
        warn!("User {} sent unknown interaction type {:?}", user.id, input.interaction_type);
        FeedError::invalid_argument("Invalid interaction type")
    })?;
    let post = active_post(store, post_id).await?;

    let event = store
        .insert_interaction(NewInteractionEvent {
            user_id: user.id,
            post_id: post.id,
            interaction_type,
        })
        .await?;
    info!("Recorded {} by user {} on post {}", interaction_type, user.id, post.id);
    Ok(event)
}
