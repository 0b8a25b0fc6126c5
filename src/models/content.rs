// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::lifecycle::Lifecycle;
use crate::models::user::User;
use crate::schema::{comments, post_tags, posts, tags};

/// Free-form label attached to posts. Names are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[diesel(column_name = is_deleted)]
    pub lifecycle: Lifecycle,
}

/// DTO for inserting a new post; timestamps and lifecycle take column defaults
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub author_id: i32,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = post_tags)]
pub struct PostTag {
    pub post_id: i32,
    pub tag_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: i32,
    pub author_id: i32,
    pub post_id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[diesel(column_name = is_deleted)]
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub author_id: i32,
    pub post_id: i32,
    pub text: String,
}

/// Live engagement totals for a post, counted from the like, comment and
/// share tables rather than read from the analytics ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
}

/// Comment as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i32,
    pub author: User,
    pub post_id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, author: User) -> Self {
        Self {
            id: comment.id,
            author,
            post_id: comment.post_id,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

/// Post as returned by the API, with its author, tags, live counts and
/// visible comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: i32,
    pub author: User,
    pub text: String,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub counts: EngagementCounts,
    pub comments: Vec<CommentView>,
}
