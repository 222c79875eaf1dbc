/// Integration tests for comment endpoints

mod common;

use axum::http::StatusCode;
use common::{error_fields, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_who_may_comment() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;
    let carol = ctx.user("Carol").await;
    let board = ctx.board(&alice, &[&bob]).await;
    let task = ctx.task(&board, &bob, &bob).await;
    let uri = format!("/api/tasks/{}/comments", task);

    let (status, _) = ctx.post(&uri, &carol, json!({ "content": "hello" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.post(&uri, &bob, json!({ "content": "on it" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"], "Bob");

    let (status, _) = ctx.post(&uri, &alice, json!({ "content": "thanks" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = ctx.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["content"], "on it");
    assert_eq!(listed[1]["content"], "thanks");

    let (_, task_view) = ctx.get(&format!("/api/tasks/{}", task), &bob).await;
    assert_eq!(task_view["comments_count"], 2);
}

#[tokio::test]
async fn test_only_author_deletes() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;
    let board = ctx.board(&alice, &[&bob]).await;
    let task = ctx.task(&board, &bob, &bob).await;

    let (_, comment) = ctx
        .post(
            &format!("/api/tasks/{}/comments", task),
            &bob,
            json!({ "content": "mine" }),
        )
        .await;
    let uri = format!(
        "/api/tasks/{}/comments/{}",
        task,
        comment["id"].as_str().unwrap()
    );

    let (status, _) = ctx.delete(&uri, &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.patch(&uri, &alice, json!({ "content": "tidied" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "tidied");
    assert_eq!(body["author_id"], bob.id());

    let (status, _) = ctx.delete(&uri, &bob).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_under_other_task_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;
    let board = ctx.board(&alice, &[]).await;
    let first = ctx.task(&board, &alice, &alice).await;
    let second = ctx.task(&board, &alice, &alice).await;

    let (_, comment) = ctx
        .post(
            &format!("/api/tasks/{}/comments", first),
            &alice,
            json!({ "content": "here" }),
        )
        .await;
    let comment_id = comment["id"].as_str().unwrap();

    let (status, body) = ctx
        .get(&format!("/api/tasks/{}/comments/{}", second, comment_id), &alice)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Comment not found");
}

#[tokio::test]
async fn test_blank_comment_rejected() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;
    let board = ctx.board(&alice, &[]).await;
    let task = ctx.task(&board, &alice, &alice).await;

    let (status, body) = ctx
        .post(
            &format!("/api/tasks/{}/comments", task),
            &alice,
            json!({ "content": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["content"]);
}
