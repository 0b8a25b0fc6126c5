// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{FeedStore, InteractionFilter, StoreError, StoreResult};
use crate::models::content::{NewComment, NewPost};
use crate::models::engagement::{NewInteractionEvent, NewLike, NewShare};
use crate::models::{
    Comment, CountsPatch, EngagementCounts, InteractionEvent, Lifecycle, Like, NewUser, Post,
    PostAnalytics, Share, Tag, User,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tags: BTreeMap<i32, Tag>,
    posts: BTreeMap<i32, Post>,
    post_tags: Vec<(i32, i32)>,
    comments: BTreeMap<i32, Comment>,
    likes: BTreeMap<i32, Like>,
    shares: BTreeMap<i32, Share>,
    interactions: Vec<InteractionEvent>,
    analytics: BTreeMap<i32, PostAnalytics>,
    last_id: i32,
}

impl Tables {
    // One sequence shared by every table keeps ids unique across kinds,
    // which makes mixed-up ids in tests fail loudly.
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn tag_id_or_insert(&mut self, name: &str) -> i32 {
        if let Some(tag) = self.tags.values().find(|tag| tag.name == name) {
            return tag.id;
        }
        let id = self.next_id();
        self.tags.insert(
            id,
            Tag {
                id,
                name: name.to_string(),
            },
        );
        id
    }
}

/// In-process [`FeedStore`] used by the test suite and for running the
/// service without PostgreSQL. Every write happens under one write guard, so
/// the (user, post) uniqueness checks cannot race.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        let _tables = self.tables.read().await;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate);
        }
        let id = tables.next_id();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).cloned())
    }

    async fn users_by_ids(&self, user_ids: &[i32]) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|user| user_ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn list_active_posts(&self, author_id: Option<i32>) -> StoreResult<Vec<Post>> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| post.lifecycle.is_active())
            .filter(|post| author_id.map_or(true, |author| post.author_id == author))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn find_post(&self, post_id: i32) -> StoreResult<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&post_id).cloned())
    }

    async fn insert_post(&self, post: NewPost, tag_names: &[String]) -> StoreResult<Post> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let now = Utc::now();
        let post = Post {
            id,
            author_id: post.author_id,
            text: post.text,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        };
        tables.posts.insert(id, post.clone());

        for name in tag_names {
            let tag_id = tables.tag_id_or_insert(name);
            if !tables.post_tags.contains(&(id, tag_id)) {
                tables.post_tags.push((id, tag_id));
            }
        }
        Ok(post)
    }

    async fn mark_post_deleted(&self, post_id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(post) = tables.posts.get_mut(&post_id) {
            post.lifecycle = post.lifecycle.delete();
            post.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_tags(&self) -> StoreResult<Vec<Tag>> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn tags_for_posts(&self, post_ids: &[i32]) -> StoreResult<Vec<(i32, Tag)>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(i32, Tag)> = tables
            .post_tags
            .iter()
            .filter(|(post_id, _)| post_ids.contains(post_id))
            .filter_map(|(post_id, tag_id)| {
                tables.tags.get(tag_id).map(|tag| (*post_id, tag.clone()))
            })
            .collect();
        rows.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        Ok(rows)
    }

    async fn active_comments_for_posts(&self, post_ids: &[i32]) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| post_ids.contains(&c.post_id) && c.lifecycle.is_active())
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn find_comment(&self, comment_id: i32) -> StoreResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(&comment_id).cloned())
    }

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let comment = Comment {
            id,
            author_id: comment.author_id,
            post_id: comment.post_id,
            text: comment.text,
            created_at: Utc::now(),
            lifecycle: Lifecycle::Active,
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn mark_comment_deleted(&self, comment_id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(comment) = tables.comments.get_mut(&comment_id) {
            comment.lifecycle = comment.lifecycle.delete();
        }
        Ok(())
    }

    async fn engagement_counts(
        &self,
        post_ids: &[i32],
    ) -> StoreResult<HashMap<i32, EngagementCounts>> {
        let tables = self.tables.read().await;
        let mut counts: HashMap<i32, EngagementCounts> = HashMap::new();
        for like in tables.likes.values().filter(|l| post_ids.contains(&l.post_id)) {
            counts.entry(like.post_id).or_default().like_count += 1;
        }
        for comment in tables
            .comments
            .values()
            .filter(|c| post_ids.contains(&c.post_id) && c.lifecycle.is_active())
        {
            counts.entry(comment.post_id).or_default().comment_count += 1;
        }
        for share in tables.shares.values().filter(|s| post_ids.contains(&s.post_id)) {
            counts.entry(share.post_id).or_default().share_count += 1;
        }
        Ok(counts)
    }

    async fn insert_like(&self, like: NewLike) -> StoreResult<Like> {
        let mut tables = self.tables.write().await;
        if tables
            .likes
            .values()
            .any(|l| l.user_id == like.user_id && l.post_id == like.post_id)
        {
            return Err(StoreError::Duplicate);
        }
        let id = tables.next_id();
        let like = Like {
            id,
            user_id: like.user_id,
            post_id: like.post_id,
            created_at: Utc::now(),
        };
        tables.likes.insert(id, like.clone());
        Ok(like)
    }

    async fn delete_like(&self, user_id: i32, post_id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|_, l| !(l.user_id == user_id && l.post_id == post_id));
        Ok(tables.likes.len() < before)
    }

    async fn insert_share(&self, share: NewShare) -> StoreResult<Share> {
        let mut tables = self.tables.write().await;
        if tables
            .shares
            .values()
            .any(|s| s.user_id == share.user_id && s.post_id == share.post_id)
        {
            return Err(StoreError::Duplicate);
        }
        let id = tables.next_id();
        let share = Share {
            id,
            user_id: share.user_id,
            post_id: share.post_id,
            created_at: Utc::now(),
        };
        tables.shares.insert(id, share.clone());
        Ok(share)
    }

    async fn list_interactions(
        &self,
        filter: InteractionFilter,
    ) -> StoreResult<Vec<InteractionEvent>> {
        let tables = self.tables.read().await;
        Ok(tables
            .interactions
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect())
    }

    async fn insert_interaction(
        &self,
        event: NewInteractionEvent,
    ) -> StoreResult<InteractionEvent> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let event = InteractionEvent {
            id,
            user_id: event.user_id,
            post_id: event.post_id,
            interaction_type: event.interaction_type,
            created_at: Utc::now(),
        };
        tables.interactions.push(event.clone());
        Ok(event)
    }

    async fn find_analytics(&self, post_id: i32) -> StoreResult<Option<PostAnalytics>> {
        let tables = self.tables.read().await;
        Ok(tables.analytics.get(&post_id).cloned())
    }

    async fn list_analytics(&self) -> StoreResult<Vec<PostAnalytics>> {
        let tables = self.tables.read().await;
        Ok(tables.analytics.values().cloned().collect())
    }

    async fn upsert_view(&self, post_id: i32, at: DateTime<Utc>) -> StoreResult<PostAnalytics> {
        let mut tables = self.tables.write().await;
        let row = tables
            .analytics
            .entry(post_id)
            .or_insert_with(|| PostAnalytics::empty(post_id));
        row.view_count += 1;
        row.last_interaction_at = Some(at);
        Ok(row.clone())
    }

    async fn upsert_counts(
        &self,
        post_id: i32,
        patch: &CountsPatch,
        at: DateTime<Utc>,
    ) -> StoreResult<PostAnalytics> {
        let mut tables = self.tables.write().await;
        let row = tables
            .analytics
            .entry(post_id)
            .or_insert_with(|| PostAnalytics::empty(post_id));
        row.apply(patch);
        row.last_interaction_at = Some(at);
        Ok(row.clone())
    }
}
