// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use social_feed::api::{self, AppState, USER_ID_HEADER};
use social_feed::models::{NewUser, User};
use social_feed::store::{FeedStore, MemoryStore};

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = api::router(AppState::new(store.clone()));
        Self { store, router }
    }

    pub async fn user(&self, username: &str) -> User {
        self.store
            .insert_user(NewUser::new(username, format!("{}@example.com", username)))
            .await
            .expect("user should be created")
    }

    /// Send a request, optionally as `caller`, and return status and parsed JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&User>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = caller {
            builder = builder.header(USER_ID_HEADER, user.id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    /// Send a raw body with an explicit content type, bypassing JSON encoding
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&User>,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = caller {
            builder = builder.header(USER_ID_HEADER, user.id.to_string());
        }
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.dispatch(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    /// Create a post through the API and return its id
    pub async fn post_as(&self, author: &User, text: &str, tags: &[&str]) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/posts",
                Some(author),
                Some(serde_json::json!({ "text": text, "tag_names": tags })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create post failed: {}", body);
        body["id"].as_i64().expect("post id")
    }
}
