// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::{allow_tables_to_appear_in_same_query, joinable, table};

table! {
    users (id) {
        id -> Integer,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
    }
}

table! {
    tags (id) {
        id -> Integer,
        name -> Varchar,
    }
}

table! {
    posts (id) {
        id -> Integer,
        author_id -> Integer,
        text -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        is_deleted -> Bool,
    }
}

table! {
    post_tags (post_id, tag_id) {
        post_id -> Integer,
        tag_id -> Integer,
    }
}

table! {
    comments (id) {
        id -> Integer,
        author_id -> Integer,
        post_id -> Integer,
        text -> Text,
        created_at -> Timestamptz,
        is_deleted -> Bool,
    }
}

table! {
    likes (id) {
        id -> Integer,
        user_id -> Integer,
        post_id -> Integer,
        created_at -> Timestamptz,
    }
}

table! {
    shares (id) {
        id -> Integer,
        user_id -> Integer,
        post_id -> Integer,
        created_at -> Timestamptz,
    }
}

table! {
    interaction_events (id) {
        id -> Integer,
        user_id -> Integer,
        post_id -> Integer,
        interaction_type -> Varchar,
        created_at -> Timestamptz,
    }
}

table! {
    post_analytics (post_id) {
        post_id -> Integer,
        view_count -> Integer,
        like_count -> Integer,
        comment_count -> Integer,
        share_count -> Integer,
        last_interaction_at -> Nullable<Timestamptz>,
    }
}

joinable!(posts -> users (author_id));
joinable!(post_tags -> posts (post_id));
joinable!(post_tags -> tags (tag_id));
joinable!(comments -> posts (post_id));
joinable!(likes -> posts (post_id));
joinable!(shares -> posts (post_id));
joinable!(interaction_events -> posts (post_id));
joinable!(post_analytics -> posts (post_id));

allow_tables_to_appear_in_same_query!(
    users,
    tags,
    posts,
    post_tags,
    comments,
    likes,
    shares,
    interaction_events,
    post_analytics,
);
