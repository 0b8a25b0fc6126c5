// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Posts, tags, comments, likes and shares.

use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{active_post, require_caller};
use crate::error::{FeedError, FeedResult};
use crate::models::content::{NewComment, NewPost};
use crate::models::engagement::{NewLike, NewShare};
use crate::models::{CommentView, Like, Post, PostView, Share, Tag, User};
use crate::store::{FeedStore, StoreError};

const POST_NOT_FOUND_OR_NOT_AUTHORIZED: &str = "Post not found or not authorized";
const COMMENT_NOT_FOUND_OR_NOT_AUTHORIZED: &str = "Comment not found or not authorized";

/// Width of the `tags.name` column, in characters
pub const MAX_TAG_NAME_CHARS: usize = 64;

/// Arguments of `createPost`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostInput {
    pub text: String,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

/// Arguments of `createComment`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentInput {
    pub text: String,
}

/// Fold tag names to lower case, drop blanks and collapse duplicates
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reject normalized tag names the tag table cannot hold
pub fn check_tag_names(names: &[String]) -> FeedResult<()> {
    match names.iter().find(|name| name.chars().count() > MAX_TAG_NAME_CHARS) {
        Some(name) => Err(FeedError::invalid_argument(format!(
            "Tag name '{}' exceeds {} characters",
            name, MAX_TAG_NAME_CHARS
        ))),
        None => Ok(()),
    }
}

pub async fn all_posts(store: &dyn FeedStore) -> FeedResult<Vec<PostView>> {
    let posts = store.list_active_posts(None).await?;
    debug!("Listing {} posts", posts.len());
    render_posts(store, posts).await
}

pub async fn post_by_id(store: &dyn FeedStore, post_id: i32) -> FeedResult<PostView> {
    let post = active_post(store, post_id).await?;
    let mut views = render_posts(store, vec![post]).await?;
    views.pop().ok_or_else(|| FeedError::not_found(super::POST_NOT_FOUND))
}

pub async fn posts_by_user(store: &dyn FeedStore, user_id: i32) -> FeedResult<Vec<PostView>> {
    let posts = store.list_active_posts(Some(user_id)).await?;
    debug!("Listing {} posts for user {}", posts.len(), user_id);
    render_posts(store, posts).await
}

pub async fn all_tags(store: &dyn FeedStore) -> FeedResult<Vec<Tag>> {
    Ok(store.list_tags().await?)
}

pub async fn create_post(
    store: &dyn FeedStore,
    caller: Option<&User>,
    input: CreatePostInput,
) -> FeedResult<PostView> {
    let user = require_caller(caller)?;
    let tag_names = normalize_tag_names(&input.tag_names);
    check_tag_names(&tag_names)?;

    let post = store
        .insert_post(
            NewPost {
                author_id: user.id,
                text: input.text,
            },
            &tag_names,
        )
        .await?;
    info!("User {} created post {} with tags {:?}", user.id, post.id, tag_names);

    let mut views = render_posts(store, vec![post]).await?;
    views.pop().ok_or_else(|| FeedError::not_found(super::POST_NOT_FOUND))
}

/// Soft-delete a post owned by the caller. A missing post and a post owned by
/// someone else produce the same error.
pub async fn delete_post(
    store: &dyn FeedStore,
    caller: Option<&User>,
    post_id: i32,
) -> FeedResult<bool> {
    let user = require_caller(caller)?;
    match store.find_post(post_id).await? {
        Some(post) if post.author_id == user.id => {
            store.mark_post_deleted(post.id).await?;
            info!("User {} deleted post {}", user.id, post.id);
            Ok(true)
        }
        _ => {
            warn!("User {} cannot delete post {}", user.id, post_id);
            Err(FeedError::not_found(POST_NOT_FOUND_OR_NOT_AUTHORIZED))
        }
    }
}

pub async fn create_comment(
    store: &dyn FeedStore,
    caller: Option<&User>,
    post_id: i32,
    input: CreateCommentInput,
) -> FeedResult<CommentView> {
    let user = require_caller(caller)?;
    let post = active_post(store, post_id).await?;

    let comment = store
        .insert_comment(NewComment {
            author_id: user.id,
            post_id: post.id,
            text: input.text,
        })
        .await?;
    info!("User {} commented {} on post {}", user.id, comment.id, post.id);

    Ok(CommentView::new(comment, user.clone()))
}

/// Soft-delete a comment owned by the caller, with the same conflation of
/// missing and foreign rows as [`delete_post`].
pub async fn delete_comment(
    store: &dyn FeedStore,
    caller: Option<&User>,
    comment_id: i32,
) -> FeedResult<bool> {
    let user = require_caller(caller)?;
    match store.find_comment(comment_id).await? {
        Some(comment) if comment.author_id == user.id => {
            store.mark_comment_deleted(comment.id).await?;
            info!("User {} deleted comment {}", user.id, comment.id);
            Ok(true)
        }
        _ => {
            warn!("User {} cannot delete comment {}", user.id, comment_id);
            Err(FeedError::not_found(COMMENT_NOT_FOUND_OR_NOT_AUTHORIZED))
        }
    }
}

pub async fn like_post(
    store: &dyn FeedStore,
    caller: Option<&User>,
    post_id: i32,
) -> FeedResult<Like> {
    let user = require_caller(caller)?;
    let post = active_post(store, post_id).await?;

    match store
        .insert_like(NewLike {
            user_id: user.id,
            post_id: post.id,
        })
        .await
    {
        Ok(like) => {
            info!("User {} liked post {}", user.id, post.id);
            Ok(like)
        }
        Err(StoreError::Duplicate) => {
            warn!("User {} already liked post {}", user.id, post.id);
            Err(FeedError::conflict("You have already liked this post"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove the caller's like. The post's lifecycle is not consulted.
pub async fn unlike_post(
    store: &dyn FeedStore,
    caller: Option<&User>,
    post_id: i32,
) -> FeedResult<bool> {
    let user = require_caller(caller)?;
    if store.delete_like(user.id, post_id).await? {
        info!("User {} unliked post {}", user.id, post_id);
        Ok(true)
    } else {
        warn!("User {} has no like on post {}", user.id, post_id);
        Err(FeedError::not_found("Like does not exist"))
    }
}

pub async fn share_post(
    store: &dyn FeedStore,
    caller: Option<&User>,
    post_id: i32,
) -> FeedResult<Share> {
    let user = require_caller(caller)?;
    let post = active_post(store, post_id).await?;

    match store
        .insert_share(NewShare {
            user_id: user.id,
            post_id: post.id,
        })
        .await
    {
        Ok(share) => {
            info!("User {} shared post {}", user.id, post.id);
            Ok(share)
        }
        Err(StoreError::Duplicate) => {
            warn!("User {} already shared post {}", user.id, post.id);
            Err(FeedError::conflict("You have already shared this post"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Attach authors, tags, live counts and visible comments to posts,
/// preserving the order of `posts`.
async fn render_posts(store: &dyn FeedStore, posts: Vec<Post>) -> FeedResult<Vec<PostView>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }
    let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();

    let mut tags_by_post: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (post_id, tag) in store.tags_for_posts(&post_ids).await? {
        tags_by_post.entry(post_id).or_default().push(tag);
    }

    let comments = store.active_comments_for_posts(&post_ids).await?;
    let counts = store.engagement_counts(&post_ids).await?;

    let author_ids: Vec<i32> = posts
        .iter()
        .map(|p| p.author_id)
        .chain(comments.iter().map(|c| c.author_id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let users: HashMap<i32, User> = store
        .users_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut comments_by_post: HashMap<i32, Vec<CommentView>> = HashMap::new();
    for comment in comments {
        match users.get(&comment.author_id) {
            Some(author) => comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(CommentView::new(comment, author.clone())),
            None => warn!("Comment {} has no author row, skipping", comment.id),
        }
    }

    let views = posts
        .into_iter()
        .filter_map(|post| {
            let Some(author) = users.get(&post.author_id) else {
                warn!("Post {} has no author row, skipping", post.id);
                return None;
            };
            Some(PostView {
                id: post.id,
                author: author.clone(),
                tags: tags_by_post.remove(&post.id).unwrap_or_default(),
                counts: counts.get(&post.id).copied().unwrap_or_default(),
                comments: comments_by_post.remove(&post.id).unwrap_or_default(),
                text: post.text,
                created_at: post.created_at,
                updated_at: post.updated_at,
            })
        })
        .collect();
    Ok(views)
}
