/// Integration tests for board endpoints

mod common;

use axum::http::StatusCode;
use common::{error_fields, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_board_visibility() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;
    let carol = ctx.user("Carol").await;
    let board = ctx.board(&alice, &[&bob]).await;
    let uri = format!("/api/boards/{}", board);

    let (status, body) = ctx.get(&uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner_id"], alice.id());
    assert_eq!(body["members"][0]["id"], bob.id());

    let (status, _) = ctx.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.get(&uri, &carol).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (_, listed) = ctx.get("/api/boards", &carol).await;
    assert_eq!(listed, json!([]));

    let (status, listed) = ctx.get("/api/boards", &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["id"], board);
    assert_eq!(listed[0]["member_count"], 1);
}

#[tokio::test]
async fn test_board_list_counts() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;
    let board = ctx.board(&alice, &[]).await;
    ctx.task(&board, &alice, &alice).await;
    let (status, _) = ctx
        .post(
            "/api/tasks",
            &alice,
            json!({ "board": board, "title": "Urgent", "status": "review", "priority": "high" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listed) = ctx.get("/api/boards", &alice).await;
    assert_eq!(listed[0]["ticket_count"], 2);
    assert_eq!(listed[0]["tasks_to_do_count"], 1);
    assert_eq!(listed[0]["tasks_high_prio_count"], 1);
}

#[tokio::test]
async fn test_board_update_and_delete_rights() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;
    let carol = ctx.user("Carol").await;
    let board = ctx.board(&alice, &[&bob]).await;
    let uri = format!("/api/boards/{}", board);

    let (status, body) = ctx
        .patch(&uri, &bob, json!({ "members": [bob.id(), carol.id()] }))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["members"].as_array().unwrap().len(), 2);
    assert_eq!(body["owner_id"], alice.id());

    let (status, _) = ctx.delete(&uri, &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.delete(&uri, &alice).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = ctx.get(&uri, &alice).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_board_validation() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;

    let (status, body) = ctx.post("/api/boards", &alice, json!({ "title": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["title"]);

    let (status, body) = ctx
        .post(
            "/api/boards",
            &alice,
            json!({ "title": "Ghosts", "members": [uuid::Uuid::new_v4()] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["members"]);

    let (status, body) = ctx
        .post("/api/boards", &alice, json!({ "title": "x".repeat(256) }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["title"]);

    let (status, body) = ctx
        .post("/api/boards", &alice, json!({ "title": "Typo", "members": ["bob"] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(error_fields(&body), vec!["members"]);
}

#[tokio::test]
async fn test_email_check() {
    let ctx = TestContext::new();
    let alice = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;

    let (status, body) = ctx
        .get("/api/boards/email-check?email=bob@example.com", &alice)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], bob.id());
    assert_eq!(body["fullname"], "Bob");

    let (status, _) = ctx
        .get("/api/boards/email-check?email=nobody@example.com", &alice)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.get("/api/boards/email-check?email=nope", &alice).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["email"]);
}
