// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::api::response::SuccessResponse;
use crate::api::{AppState, AuthenticatedUser, FeedJson, FeedPath};
use crate::error::FeedError;
use crate::metrics::track;
use crate::models::{CommentView, Like, PostView, Share, Tag};
use crate::services::content::{self, CreateCommentInput, CreatePostInput};

/// Posts, tags, comments, likes and shares
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(all_posts).post(create_post))
        .route("/api/posts/:post_id", get(post_by_id).delete(delete_post))
        .route("/api/users/:user_id/posts", get(posts_by_user))
        .route("/api/tags", get(all_tags))
        .route("/api/posts/:post_id/comments", post(create_comment))
        .route("/api/comments/:comment_id", delete(delete_comment))
        .route("/api/posts/:post_id/like", post(like_post).delete(unlike_post))
        .route("/api/posts/:post_id/share", post(share_post))
}

/// Get all visible posts, newest first
pub async fn all_posts(State(state): State<AppState>) -> Result<Json<Vec<PostView>>, FeedError> {
    Ok(Json(content::all_posts(state.store.as_ref()).await?))
}

pub async fn post_by_id(
    State(state): State<AppState>,
    FeedPath(post_id): FeedPath<i32>,
) -> Result<Json<PostView>, FeedError> {
    Ok(Json(content::post_by_id(state.store.as_ref(), post_id).await?))
}

pub async fn posts_by_user(
    State(state): State<AppState>,
    FeedPath(user_id): FeedPath<i32>,
) -> Result<Json<Vec<PostView>>, FeedError> {
    Ok(Json(content::posts_by_user(state.store.as_ref(), user_id).await?))
}

pub async fn all_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, FeedError> {
    Ok(Json(content::all_tags(state.store.as_ref()).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    FeedJson(input): FeedJson<CreatePostInput>,
) -> Result<(StatusCode, Json<PostView>), FeedError> {
    let result = content::create_post(state.store.as_ref(), caller.user(), input).await;
    let post = track("createPost", result)?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    FeedPath(post_id): FeedPath<i32>,
) -> Result<Json<SuccessResponse>, FeedError> {
    let result = content::delete_post(state.store.as_ref(), caller.user(), post_id).await;
    Ok(Json(track("deletePost", result)?.into()))
}

pub async fn create_comment(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    FeedPath(post_id): FeedPath<i32>,
    FeedJson(input): FeedJson<CreateCommentInput>,
) -> Result<(StatusCode, Json<CommentView>), FeedError> {
    let result = content::create_comment(state.store.as_ref(), caller.user(), post_id, input).await;
    let comment = track("createComment", result)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    FeedPath(comment_id): FeedPath<i32>,
) -> Result<Json<SuccessResponse>, FeedError> {
    let result = content::delete_comment(state.store.as_ref(), caller.user(), comment_id).await;
    Ok(Json(track("deleteComment", result)?.into()))
}

pub async fn like_post(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    FeedPath(post_id): FeedPath<i32>,
) -> Result<(StatusCode, Json<Like>), FeedError> {
    let result = content::like_post(state.store.as_ref(), caller.user(), post_id).await;
    Ok((StatusCode::CREATED, Json(track("likePost", result)?)))
}

pub async fn unlike_post(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    FeedPath(post_id): FeedPath<i32>,
) -> Result<Json<SuccessResponse>, FeedError> {
    let result = content::unlike_post(state.store.as_ref(), caller.user(), post_id).await;
    Ok(Json(track("unlikePost", result)?.into()))
}

pub async fn share_post(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    FeedPath(post_id): FeedPath<i32>,
) -> Result<(StatusCode, Json<Share>), FeedError> {
    let result = content::share_post(state.store.as_ref(), caller.user(), post_id).await;
    Ok((StatusCode::CREATED, Json(track("sharePost", result)?)))
}
