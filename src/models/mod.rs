// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod analytics;
pub mod content;
pub mod engagement;
pub mod lifecycle;
pub mod user;

pub use analytics::{CountsPatch, PostAnalytics};
pub use content::{Comment, CommentView, EngagementCounts, Post, PostView, Tag};
pub use engagement::{InteractionEvent, InteractionType, Like, Share};
pub use lifecycle::Lifecycle;
pub use user::{NewUser, User};
