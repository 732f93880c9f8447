//! Thread and comment lifecycle over HTTP: capacity, paging and cascading delete.

mod common;

use axum::http::StatusCode;
use board_db::{Scope, timestamp};
use board_types::limits::{MAX_COMMENTS_PER_THREAD, MAX_THREADS};
use common::TestServer;
use serde_json::json;

async fn open_thread(server: &TestServer, token: &str, name: &str) -> i64 {
    let (status, body) = server
        .request("POST", "/api/threads", Some(json!({"name": name})), Some(token))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn thread_round_trip() {
    let server = TestServer::new();
    let (user_id, token) = server.user_with_token("alice");
    let id = open_thread(&server, &token, "Introductions").await;

    let (status, body) = server.request("GET", &format!("/api/threads/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Introductions");
    assert_eq!(body["owner_id"], user_id.to_string());
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn unknown_and_malformed_thread_ids() {
    let server = TestServer::new();

    let (status, body) = server.request("GET", "/api/threads/404", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Thread 404 not found");

    let (status, _) = server.request("GET", "/api/threads/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_thread_name_is_rejected() {
    let server = TestServer::new();
    let (_, token) = server.user_with_token("alice");

    let (status, _) = server
        .request("POST", "/api/threads", Some(json!({"name": ""})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(server.state.db.count(Scope::Threads).unwrap(), 0);
}

#[tokio::test]
async fn listing_pages_through_threads() {
    let server = TestServer::new();
    let (_, token) = server.user_with_token("alice");
    let mut ids = Vec::new();
    for i in 0..7 {
        ids.push(open_thread(&server, &token, &format!("thread {i}")).await);
    }
    server
        .request("POST", "/api/comments", Some(json!({"thread_id": ids[1], "message": "hi"})), Some(&token))
        .await;

    let (status, body) = server.request("GET", "/api/threads?page=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["thread_count"], 7);
    assert_eq!(body["page_count"], 2);
    assert_eq!(body["max_threads"], 500);
    assert_eq!(body["is_limit_reached"], false);
    let threads = body["threads"].as_array().unwrap();
    assert_eq!(threads.len(), 5);
    assert_eq!(threads[0]["id"], ids[0]);
    assert_eq!(threads[1]["comment_count"], 1);
    assert_eq!(threads[0]["comment_count"], 0);

    let (_, body) = server.request("GET", "/api/threads?page=2", None, None).await;
    let threads = body["threads"].as_array().unwrap();
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[1]["id"], ids[6]);

    let (status, body) = server.request("GET", "/api/threads?page=3", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["threads"].as_array().unwrap().is_empty());
    assert_eq!(body["page_count"], 2);

    let (_, body) = server.request("GET", "/api/threads", None, None).await;
    assert_eq!(body["threads"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn malformed_pages_are_bad_requests() {
    let server = TestServer::new();
    for uri in ["/api/threads?page=abc", "/api/threads?page=0", "/api/threads?page=-2"] {
        let (status, body) = server.request("GET", uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn thread_ceiling_returns_forbidden() {
    let server = TestServer::new();
    let (user_id, token) = server.user_with_token("alice");
    let now = timestamp(chrono::Utc::now());
    for i in 0..MAX_THREADS {
        server
            .state
            .db
            .insert_thread(&format!("seed {i}"), &user_id.to_string(), &now)
            .unwrap();
    }

    let (status, body) = server
        .request("POST", "/api/threads", Some(json!({"name": "501st"})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Thread limit reached");
    assert_eq!(server.state.db.count(Scope::Threads).unwrap(), MAX_THREADS);

    let (_, body) = server.request("GET", "/api/threads?page=100", None, None).await;
    assert_eq!(body["is_limit_reached"], true);
    assert_eq!(body["page_count"], 100);
    assert_eq!(body["threads"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn comments_list_newest_first_with_authors() {
    let server = TestServer::new();
    let (_, alice) = server.user_with_token("alice");
    let (_, bob) = server.user_with_token("bob");
    let thread = open_thread(&server, &alice, "chat").await;

    for (token, message) in [(&alice, "one"), (&bob, "two"), (&alice, "three")] {
        let (status, body) = server
            .request("POST", "/api/comments", Some(json!({"thread_id": thread, "message": message})), Some(token))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_i64());
    }

    let (status, body) = server
        .request("GET", &format!("/api/comments?threadID={thread}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comment_count"], 3);
    assert_eq!(body["max_comments"], 1000);
    assert_eq!(body["is_limit_reached"], false);

    let comments = body["comments"].as_array().unwrap();
    let messages: Vec<&str> = comments.iter().map(|c| c["message"].as_str().unwrap()).collect();
    assert_eq!(messages, vec!["three", "two", "one"]);
    assert_eq!(comments[1]["name"], "bob");
    assert_eq!(comments[0]["thread_id"], thread);

    let stamps: Vec<&str> = comments.iter().map(|c| c["created_at"].as_str().unwrap()).collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn comment_validation_and_missing_thread() {
    let server = TestServer::new();
    let (_, token) = server.user_with_token("alice");
    let thread = open_thread(&server, &token, "t").await;

    let (status, _) = server
        .request("POST", "/api/comments", Some(json!({"thread_id": thread, "message": ""})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .request("POST", "/api/comments", Some(json!({"thread_id": thread + 1, "message": "lost"})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.request("GET", "/api/comments", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comment_ceiling_is_per_thread() {
    let server = TestServer::new();
    let (user_id, token) = server.user_with_token("alice");
    let full = open_thread(&server, &token, "full").await;
    let other = open_thread(&server, &token, "other").await;

    let now = timestamp(chrono::Utc::now());
    for i in 0..MAX_COMMENTS_PER_THREAD {
        server
            .state
            .db
            .insert_comment(user_id, full, &format!("c{i}"), &now)
            .unwrap();
    }

    let (status, body) = server
        .request("POST", "/api/comments", Some(json!({"thread_id": full, "message": "1001st"})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Comment limit reached");

    let (_, body) = server
        .request("GET", &format!("/api/comments?threadID={full}"), None, None)
        .await;
    assert_eq!(body["comment_count"], 1000);
    assert_eq!(body["is_limit_reached"], true);

    let (status, _) = server
        .request("POST", "/api/comments", Some(json!({"thread_id": other, "message": "fine"})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(server.state.db.count(Scope::Comments { thread_id: other }).unwrap(), 1);
}

#[tokio::test]
async fn deleting_a_thread_removes_its_comments() {
    let server = TestServer::new();
    let (_, token) = server.user_with_token("alice");
    let doomed = open_thread(&server, &token, "doomed").await;
    let kept = open_thread(&server, &token, "kept").await;
    for i in 0..4 {
        server
            .request("POST", "/api/comments", Some(json!({"thread_id": doomed, "message": format!("m{i}")})), Some(&token))
            .await;
    }
    server
        .request("POST", "/api/comments", Some(json!({"thread_id": kept, "message": "stays"})), Some(&token))
        .await;

    // No token: deletion is open to any caller
    let (status, body) = server.request("DELETE", &format!("/api/threads/{doomed}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_thread"], true);
    assert_eq!(body["deleted_comments"], 4);

    let (status, _) = server.request("GET", &format!("/api/threads/{doomed}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = server
        .request("GET", &format!("/api/comments?threadID={doomed}"), None, None)
        .await;
    assert_eq!(body["comment_count"], 0);

    let (_, body) = server
        .request("GET", &format!("/api/comments?threadID={kept}"), None, None)
        .await;
    assert_eq!(body["comment_count"], 1);
}

#[tokio::test]
async fn interrupted_delete_leaves_everything_in_place() {
    let server = TestServer::new();
    let (_, token) = server.user_with_token("alice");
    let thread = open_thread(&server, &token, "sticky").await;
    for i in 0..3 {
        server
            .request("POST", "/api/comments", Some(json!({"thread_id": thread, "message": format!("m{i}")})), Some(&token))
            .await;
    }

    server
        .state
        .db
        .with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER fail_thread_delete BEFORE DELETE ON threads
                 BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
            )?;
            Ok(())
        })
        .unwrap();

    let (status, body) = server.request("DELETE", &format!("/api/threads/{thread}"), None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "An internal error occurred");

    let (status, _) = server.request("GET", &format!("/api/threads/{thread}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.state.db.count(Scope::Comments { thread_id: thread }).unwrap(), 3);
}

#[tokio::test]
async fn health_reports_version() {
    let server = TestServer::new();
    let (status, body) = server.request("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
