// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_fetch_post() {
    let app = TestApp::new();
    let ada = app.user("ada").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/posts",
            Some(&ada),
            Some(json!({ "text": "hello", "tag_names": ["Rust", "rust", "Web"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["text"], "hello");
    assert_eq!(body["author"]["username"], "ada");
    assert!(body["author"].get("password_hash").is_none());
    assert_eq!(body["like_count"], 0);
    assert_eq!(body["comment_count"], 0);
    assert_eq!(body["share_count"], 0);

    let tag_names: Vec<&str> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(tag_names, vec!["rust", "web"]);

    let post_id = body["id"].as_i64().unwrap();
    let (status, fetched) = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], post_id);

    let (status, tags) = app.get("/api/tags").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_anonymous_mutations_are_rejected() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let post_id = app.post_as(&ada, "hello", &[]).await;

    let attempts = [
        (Method::POST, "/api/posts".to_string(), Some(json!({ "text": "x" }))),
        (Method::DELETE, format!("/api/posts/{}", post_id), None),
        (Method::POST, format!("/api/posts/{}/comments", post_id), Some(json!({ "text": "x" }))),
        (Method::POST, format!("/api/posts/{}/like", post_id), None),
        (Method::DELETE, format!("/api/posts/{}/like", post_id), None),
        (Method::POST, format!("/api/posts/{}/share", post_id), None),
        (
            Method::POST,
            format!("/api/posts/{}/interactions", post_id),
            Some(json!({ "interaction_type": "view" })),
        ),
    ];

    for (method, uri, body) in attempts {
        let (status, response) = app.send(method.clone(), &uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(response["error"], "Authentication required");
        assert_eq!(response["kind"], "unauthenticated");
    }

    let (_, post) = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(post["comment_count"], 0);
    assert_eq!(post["like_count"], 0);
}

#[tokio::test]
async fn test_unknown_user_header_is_anonymous() {
    let app = TestApp::new();
    let (status, _) = app
        .send(
            Method::POST,
            "/api/posts",
            Some(&social_feed::models::User {
                id: 4242,
                username: "ghost".into(),
                email: String::new(),
                password_hash: String::new(),
            }),
            Some(json!({ "text": "boo" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_like_unlike_cycle() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let post_id = app.post_as(&ada, "hello", &[]).await;
    let like_uri = format!("/api/posts/{}/like", post_id);

    let (status, like) = app.send(Method::POST, &like_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(like["user_id"], bob.id);
    assert_eq!(like["post_id"], post_id);

    let (status, body) = app.send(Method::POST, &like_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You have already liked this post");

    let (_, post) = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(post["like_count"], 1);

    let (status, body) = app.send(Method::DELETE, &like_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = app.send(Method::DELETE, &like_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Like does not exist");
}

#[tokio::test]
async fn test_share_is_unique_per_user() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let post_id = app.post_as(&ada, "hello", &[]).await;
    let share_uri = format!("/api/posts/{}/share", post_id);

    let (status, _) = app.send(Method::POST, &share_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.send(Method::POST, &share_uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.send(Method::POST, &share_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You have already shared this post");

    let (_, post) = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(post["share_count"], 2);
}

#[tokio::test]
async fn test_delete_post_conflates_missing_and_foreign() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let post_id = app.post_as(&ada, "mine", &[]).await;

    let foreign = app
        .send(Method::DELETE, &format!("/api/posts/{}", post_id), Some(&bob), None)
        .await;
    let missing = app
        .send(Method::DELETE, "/api/posts/999999", Some(&bob), None)
        .await;

    assert_eq!(foreign.0, StatusCode::NOT_FOUND);
    assert_eq!(foreign, missing);
    assert_eq!(foreign.1["error"], "Post not found or not authorized");

    // still visible after the rejected delete
    let (status, _) = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_soft_deleted_post_hidden_but_references_remain() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let post_id = app.post_as(&ada, "short lived", &[]).await;
    let other_id = app.post_as(&ada, "keeper", &[]).await;

    app.send(Method::POST, &format!("/api/posts/{}/like", post_id), Some(&bob), None)
        .await;
    app.send(
        Method::POST,
        &format!("/api/posts/{}/interactions", post_id),
        Some(&bob),
        Some(json!({ "interaction_type": "like" })),
    )
    .await;

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/posts/{}", post_id), Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");

    let (_, all) = app.get("/api/posts").await;
    let ids: Vec<i64> = all.as_array().unwrap().iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![other_id]);

    let (_, by_user) = app.get(&format!("/api/users/{}/posts", ada.id)).await;
    assert_eq!(by_user.as_array().unwrap().len(), 1);

    let (_, events) = app.get(&format!("/api/posts/{}/interactions", post_id)).await;
    assert_eq!(events.as_array().unwrap().len(), 1);

    // the like row survives: unliking the hidden post still succeeds
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/posts/{}/like", post_id), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // but new engagement on it is refused
    let (status, _) = app
        .send(Method::POST, &format!("/api/posts/{}/share", post_id), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_lifecycle() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let post_id = app.post_as(&ada, "discuss", &[]).await;
    let comments_uri = format!("/api/posts/{}/comments", post_id);

    let (status, first) = app
        .send(Method::POST, &comments_uri, Some(&bob), Some(json!({ "text": "first" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["author"]["username"], "bob");
    let (_, second) = app
        .send(Method::POST, &comments_uri, Some(&ada), Some(json!({ "text": "second" })))
        .await;

    let (_, post) = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(post["comment_count"], 2);
    let texts: Vec<&str> = post["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);

    let first_uri = format!("/api/comments/{}", first["id"]);
    let (status, body) = app.send(Method::DELETE, &first_uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Comment not found or not authorized");

    let (status, _) = app.send(Method::DELETE, &first_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, post) = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(post["comment_count"], 1);
    assert_eq!(post["comments"][0]["id"], second["id"]);
}

#[tokio::test]
async fn test_comment_on_missing_post() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let (status, body) = app
        .send(Method::POST, "/api/posts/31337/comments", Some(&ada), Some(json!({ "text": "?" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");
}

#[tokio::test]
async fn test_analytics_endpoints() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let post_id = app.post_as(&ada, "watched", &[]).await;
    let analytics_uri = format!("/api/posts/{}/analytics", post_id);

    let (status, body) = app.get(&analytics_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    for _ in 0..3 {
        let (status, _) = app
            .send(Method::POST, &format!("/api/posts/{}/views", post_id), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app
        .send(Method::PATCH, &analytics_uri, None, Some(json!({ "like_count": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view_count"], 3);
    assert_eq!(body["like_count"], 5);
    assert_eq!(body["comment_count"], 0);
    assert!(body["last_interaction_at"].is_string());

    let (status, body) = app
        .send(Method::PATCH, &analytics_uri, None, Some(json!({ "share_count": -1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");

    let (_, all) = app.get("/api/analytics").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["post_id"], post_id);

    let (status, _) = app
        .send(Method::POST, "/api/posts/999999/views", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_interaction_log_endpoints() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let post_id = app.post_as(&ada, "log me", &[]).await;
    let uri = format!("/api/posts/{}/interactions", post_id);

    for (user, kind) in [(&bob, "view"), (&bob, "view"), (&ada, "share")] {
        let (status, event) = app
            .send(Method::POST, &uri, Some(user), Some(json!({ "interaction_type": kind })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(event["interaction_type"], kind);
    }

    let (status, body) = app
        .send(Method::POST, &uri, Some(&bob), Some(json!({ "interaction_type": "bookmark" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid interaction type");

    let (_, by_post) = app.get(&uri).await;
    assert_eq!(by_post.as_array().unwrap().len(), 3);

    let (_, by_user) = app.get(&format!("/api/users/{}/interactions", bob.id)).await;
    assert_eq!(by_user.as_array().unwrap().len(), 2);

    let (_, all) = app.get("/api/interactions").await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_metrics_endpoint_reports_mutations() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    app.post_as(&ada, "counted", &[]).await;

    let (status, body) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().expect("metrics are plain text");
    assert!(text.contains("feed_operations_total"));
    assert!(text.contains("createPost"));
}

#[tokio::test]
async fn test_anonymous_caller_is_rejected_before_arguments_are_read() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let post_id = app.post_as(&ada, "hello", &[]).await;
    let comments_uri = format!("/api/posts/{}/comments", post_id);

    let attempts = [
        (Method::POST, comments_uri.as_str(), None, ""),
        (Method::POST, "/api/posts", Some("application/json"), "{}"),
        (Method::POST, "/api/posts", Some("application/json"), "{not json"),
        (Method::POST, "/api/posts/abc/like", None, ""),
        (Method::DELETE, "/api/comments/abc", None, ""),
    ];
    for (method, uri, content_type, body) in attempts {
        let (status, response) = app.send_raw(method.clone(), uri, None, content_type, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(response["kind"], "unauthenticated");
    }
}

#[tokio::test]
async fn test_malformed_arguments_use_error_body() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let post_id = app.post_as(&ada, "hello", &[]).await;

    let attempts = [
        (Method::POST, "/api/posts".to_string(), Some("application/json"), "{}"),
        (Method::POST, "/api/posts".to_string(), None, r#"{"text": "no content type"}"#),
        (Method::POST, "/api/posts".to_string(), Some("application/json"), "{not json"),
        (
            Method::POST,
            format!("/api/posts/{}/interactions", post_id),
            Some("application/json"),
            r#"{"interaction_type": 5}"#,
        ),
        (Method::POST, "/api/posts/abc/like".to_string(), None, ""),
    ];
    for (method, uri, content_type, body) in attempts {
        let (status, response) =
            app.send_raw(method.clone(), &uri, Some(&ada), content_type, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(response["kind"], "invalid_argument", "{} {}", method, uri);
        assert!(response["error"].is_string());
    }

    let (status, response) = app.get("/api/posts/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "invalid_argument");

    let (status, response) = app
        .send_raw(
            Method::PATCH,
            &format!("/api/posts/{}/analytics", post_id),
            None,
            Some("application/json"),
            r#"{"like_count": "many"}"#,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "invalid_argument");

    let (_, posts) = app.get("/api/posts").await;
    assert_eq!(posts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_oversized_tag_is_a_client_error() {
    let app = TestApp::new();
    let ada = app.user("ada").await;

    let long_tag = "x".repeat(100);
    let (status, body) = app
        .send(
            Method::POST,
            "/api/posts",
            Some(&ada),
            Some(json!({ "text": "tagged", "tag_names": [long_tag] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");

    let (_, tags) = app.get("/api/tags").await;
    assert!(tags.as_array().unwrap().is_empty());
    let (_, posts) = app.get("/api/posts").await;
    assert!(posts.as_array().unwrap().is_empty());
}
