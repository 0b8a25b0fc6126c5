// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use super::{FeedStore, InteractionFilter, StoreError, StoreResult};
use crate::db::{DbConnection, DbPool};
use crate::models::analytics::{AnalyticsChangeset, NewPostAnalytics};
use crate::models::content::{NewComment, NewPost, NewTag, PostTag};
use crate::models::engagement::{NewInteractionEvent, NewLike, NewShare};
use crate::models::{
    Comment, CountsPatch, EngagementCounts, InteractionEvent, Lifecycle, Like, NewUser, Post,
    PostAnalytics, Share, Tag, User,
};
use crate::schema::{
    comments, interaction_events, likes, post_analytics, post_tags, posts, shares, tags, users,
};

/// [`FeedStore`] backed by PostgreSQL through a diesel-async pool
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> StoreResult<DbConnection> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }
}

#[async_trait]
impl FeedStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut conn = self.conn().await?;
        let user = diesel::insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(user)
    }

    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>> {
        let mut conn = self.conn().await?;
        let user = users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn users_by_ids(&self, user_ids: &[i32]) -> StoreResult<Vec<User>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn().await?;
        let users = users::table
            .filter(users::id.eq_any(user_ids.to_vec()))
            .select(User::as_select())
            .load(&mut conn)
            .await?;
        Ok(users)
    }

    async fn list_active_posts(&self, author_id: Option<i32>) -> StoreResult<Vec<Post>> {
        let mut conn = self.conn().await?;
        let mut query = posts::table
            .filter(posts::is_deleted.eq(Lifecycle::Active))
            .select(Post::as_select())
            .into_boxed();
        if let Some(author_id) = author_id {
            query = query.filter(posts::author_id.eq(author_id));
        }
        let posts = query
            .order((posts::created_at.desc(), posts::id.desc()))
            .load(&mut conn)
            .await?;
        debug!("Loaded {} active posts (author filter: {:?})", posts.len(), author_id);
        Ok(posts)
    }

    async fn find_post(&self, post_id: i32) -> StoreResult<Option<Post>> {
        let mut conn = self.conn().await?;
        let post = posts::table
            .find(post_id)
            .select(Post::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(post)
    }

    async fn insert_post(&self, post: NewPost, tag_names: &[String]) -> StoreResult<Post> {
        let mut conn = self.conn().await?;
        let new_post = &post;
        let post = conn
            .transaction::<Post, diesel::result::Error, _>(|conn| {
                async move {
                    let post: Post = diesel::insert_into(posts::table)
                        .values(new_post)
                        .returning(Post::as_returning())
                        .get_result(conn)
                        .await?;

                    if !tag_names.is_empty() {
                        let new_tags: Vec<NewTag<'_>> = tag_names
                            .iter()
                            .map(|name| NewTag { name: name.as_str() })
                            .collect();
                        diesel::insert_into(tags::table)
                            .values(&new_tags)
                            .on_conflict(tags::name)
                            .do_nothing()
                            .execute(conn)
                            .await?;

                        let tag_ids: Vec<i32> = tags::table
                            .filter(tags::name.eq_any(tag_names.to_vec()))
                            .select(tags::id)
                            .load(conn)
                            .await?;
                        let links: Vec<PostTag> = tag_ids
                            .into_iter()
                            .map(|tag_id| PostTag { post_id: post.id, tag_id })
                            .collect();
                        diesel::insert_into(post_tags::table)
                            .values(&links)
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .await?;
                    }

                    Ok(post)
                }
                .scope_boxed()
            })
            .await?;
        Ok(post)
    }

    async fn mark_post_deleted(&self, post_id: i32) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        diesel::update(posts::table.find(post_id))
            .set((
                posts::is_deleted.eq(Lifecycle::Deleted),
                posts::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn list_tags(&self) -> StoreResult<Vec<Tag>> {
        let mut conn = self.conn().await?;
        let tags = tags::table
            .order(tags::name.asc())
            .select(Tag::as_select())
            .load(&mut conn)
            .await?;
        Ok(tags)
    }

    async fn tags_for_posts(&self, post_ids: &[i32]) -> StoreResult<Vec<(i32, Tag)>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn().await?;
        let rows = post_tags::table
            .inner_join(tags::table)
            .filter(post_tags::post_id.eq_any(post_ids.to_vec()))
            .order(tags::name.asc())
            .select((post_tags::post_id, Tag::as_select()))
            .load::<(i32, Tag)>(&mut conn)
            .await?;
        Ok(rows)
    }

    async fn active_comments_for_posts(&self, post_ids: &[i32]) -> StoreResult<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn().await?;
        let comments = comments::table
            .filter(comments::post_id.eq_any(post_ids.to_vec()))
            .filter(comments::is_deleted.eq(Lifecycle::Active))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select(Comment::as_select())
            .load(&mut conn)
            .await?;
        Ok(comments)
    }

    async fn find_comment(&self, comment_id: i32) -> StoreResult<Option<Comment>> {
        let mut conn = self.conn().await?;
        let comment = comments::table
            .find(comment_id)
            .select(Comment::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(comment)
    }

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let mut conn = self.conn().await?;
        let comment = diesel::insert_into(comments::table)
            .values(&comment)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(comment)
    }

    async fn mark_comment_deleted(&self, comment_id: i32) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        diesel::update(comments::table.find(comment_id))
            .set(comments::is_deleted.eq(Lifecycle::Deleted))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn engagement_counts(
        &self,
        post_ids: &[i32],
    ) -> StoreResult<HashMap<i32, EngagementCounts>> {
        let mut counts: HashMap<i32, EngagementCounts> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(counts);
        }
        let mut conn = self.conn().await?;

        let like_rows: Vec<(i32, i64)> = likes::table
            .filter(likes::post_id.eq_any(post_ids.to_vec()))
            .group_by(likes::post_id)
            .select((likes::post_id, count_star()))
            .load(&mut conn)
            .await?;
        for (post_id, total) in like_rows {
            counts.entry(post_id).or_default().like_count = total;
        }

        let comment_rows: Vec<(i32, i64)> = comments::table
            .filter(comments::post_id.eq_any(post_ids.to_vec()))
            .filter(comments::is_deleted.eq(Lifecycle::Active))
            .group_by(comments::post_id)
            .select((comments::post_id, count_star()))
            .load(&mut conn)
            .await?;
        for (post_id, total) in comment_rows {
            counts.entry(post_id).or_default().comment_count = total;
        }

        let share_rows: Vec<(i32, i64)> = shares::table
            .filter(shares::post_id.eq_any(post_ids.to_vec()))
            .group_by(shares::post_id)
            .select((shares::post_id, count_star()))
            .load(&mut conn)
            .await?;
        for (post_id, total) in share_rows {
            counts.entry(post_id).or_default().share_count = total;
        }

        Ok(counts)
    }

    async fn insert_like(&self, like: NewLike) -> StoreResult<Like> {
        let mut conn = self.conn().await?;
        let like = diesel::insert_into(likes::table)
            .values(&like)
            .returning(Like::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(like)
    }

    async fn delete_like(&self, user_id: i32, post_id: i32) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(
            likes::table
                .filter(likes::user_id.eq(user_id))
                .filter(likes::post_id.eq(post_id)),
        )
        .execute(&mut conn)
        .await?;
        Ok(deleted > 0)
    }

    async fn insert_share(&self, share: NewShare) -> StoreResult<Share> {
        let mut conn = self.conn().await?;
        let share = diesel::insert_into(shares::table)
            .values(&share)
            .returning(Share::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(share)
    }

    async fn list_interactions(
        &self,
        filter: InteractionFilter,
    ) -> StoreResult<Vec<InteractionEvent>> {
        let mut conn = self.conn().await?;
        let mut query = interaction_events::table
            .select(InteractionEvent::as_select())
            .into_boxed();
        match filter {
            InteractionFilter::All => {}
            InteractionFilter::Post(post_id) => {
                query = query.filter(interaction_events::post_id.eq(post_id));
            }
            InteractionFilter::User(user_id) => {
                query = query.filter(interaction_events::user_id.eq(user_id));
            }
        }
        let events = query
            .order(interaction_events::id.asc())
            .load(&mut conn)
            .await?;
        Ok(events)
    }

    async fn insert_interaction(
        &self,
        event: NewInteractionEvent,
    ) -> StoreResult<InteractionEvent> {
        let mut conn = self.conn().await?;
        let event = diesel::insert_into(interaction_events::table)
            .values(&event)
            .returning(InteractionEvent::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(event)
    }

    async fn find_analytics(&self, post_id: i32) -> StoreResult<Option<PostAnalytics>> {
        let mut conn = self.conn().await?;
        let analytics = post_analytics::table
            .find(post_id)
            .select(PostAnalytics::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(analytics)
    }

    async fn list_analytics(&self) -> StoreResult<Vec<PostAnalytics>> {
        let mut conn = self.conn().await?;
        let rows = post_analytics::table
            .order(post_analytics::post_id.asc())
            .select(PostAnalytics::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows)
    }

    async fn upsert_view(&self, post_id: i32, at: DateTime<Utc>) -> StoreResult<PostAnalytics> {
        let mut conn = self.conn().await?;
        let analytics = diesel::insert_into(post_analytics::table)
            .values((
                post_analytics::post_id.eq(post_id),
                post_analytics::view_count.eq(1),
                post_analytics::last_interaction_at.eq(at),
            ))
            .on_conflict(post_analytics::post_id)
            .do_update()
            .set((
                post_analytics::view_count.eq(post_analytics::view_count + 1),
                post_analytics::last_interaction_at.eq(at),
            ))
            .returning(PostAnalytics::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(analytics)
    }

    async fn upsert_counts(
        &self,
        post_id: i32,
        patch: &CountsPatch,
        at: DateTime<Utc>,
    ) -> StoreResult<PostAnalytics> {
        let mut conn = self.conn().await?;
        let insert = NewPostAnalytics::from_patch(post_id, patch, at);
        let changes = AnalyticsChangeset::from_patch(patch, at);
        let analytics = diesel::insert_into(post_analytics::table)
            .values(&insert)
            .on_conflict(post_analytics::post_id)
            .do_update()
            .set(&changes)
            .returning(PostAnalytics::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(analytics)
    }
}
