// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::post_analytics;

/// Per-post counter row. These counters are written directly by the
/// analytics operations and are never recomputed from likes, comments,
/// shares or interaction events.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = post_analytics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostAnalytics {
    pub post_id: i32,
    pub view_count: i32,
    pub like_count: i32,
    pub comment_count: i32,
    pub share_count: i32,
    pub last_interaction_at: Option<DateTime<Utc>>,
}

impl PostAnalytics {
    /// Row as it looks right after the lazy create, before any update.
    pub fn empty(post_id: i32) -> Self {
        Self {
            post_id,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            share_count: 0,
            last_interaction_at: None,
        }
    }

    pub fn apply(&mut self, patch: &CountsPatch) {
        if let Some(like_count) = patch.like_count {
            self.like_count = like_count;
        }
        if let Some(comment_count) = patch.comment_count {
            self.comment_count = comment_count;
        }
        if let Some(share_count) = patch.share_count {
            self.share_count = share_count;
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = post_analytics)]
pub struct NewPostAnalytics {
    pub post_id: i32,
    pub view_count: i32,
    pub like_count: i32,
    pub comment_count: i32,
    pub share_count: i32,
    pub last_interaction_at: Option<DateTime<Utc>>,
}

impl NewPostAnalytics {
    /// Insert values for a lazily created row that receives `patch` at once.
    pub fn from_patch(post_id: i32, patch: &CountsPatch, at: DateTime<Utc>) -> Self {
        let mut row = PostAnalytics::empty(post_id);
        row.apply(patch);
        Self {
            post_id,
            view_count: row.view_count,
            like_count: row.like_count,
            comment_count: row.comment_count,
            share_count: row.share_count,
            last_interaction_at: Some(at),
        }
    }
}

/// Absolute counter values supplied by a caller; `None` leaves a counter unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountsPatch {
    pub like_count: Option<i32>,
    pub comment_count: Option<i32>,
    pub share_count: Option<i32>,
}

impl CountsPatch {
    /// Name and value of the first counter that is negative, if any
    pub fn first_negative(&self) -> Option<(&'static str, i32)> {
        [
            ("like_count", self.like_count),
            ("comment_count", self.comment_count),
            ("share_count", self.share_count),
        ]
        .into_iter()
        .find_map(|(name, value)| value.filter(|v| *v < 0).map(|v| (name, v)))
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = post_analytics)]
pub struct AnalyticsChangeset {
    pub like_count: Option<i32>,
    pub comment_count: Option<i32>,
    pub share_count: Option<i32>,
    pub last_interaction_at: Option<DateTime<Utc>>,
}

impl AnalyticsChangeset {
    pub fn from_patch(patch: &CountsPatch, at: DateTime<Utc>) -> Self {
        Self {
            like_count: patch.like_count,
            comment_count: patch.comment_count,
            share_count: patch.share_count,
            last_interaction_at: Some(at),
        }
    }
}
