mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp};

async fn create_category(app: &TestApp, cookie: &str, name: &str) -> i64 {
    let resp = app
        .post_json(
            "/api/categories",
            serde_json::json!({"name": name}),
            Some(cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn listing_requires_auth() {
    let app = TestApp::new().await;
    let resp = app.get("/api/categories", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_and_list_newest_first() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;

    create_category(&app, &cookie, "Work").await;
    create_category(&app, &cookie, "Home").await;

    let resp = app.get("/api/categories", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["results"], 2);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Home", "Work"]);
}

#[tokio::test]
async fn create_trims_name_and_rejects_duplicates_after_trim() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;

    let resp = app
        .post_json(
            "/api/categories",
            serde_json::json!({"name": "  Work  "}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["data"]["name"], "Work");

    let resp = app
        .post_json(
            "/api/categories",
            serde_json::json!({"name": "Work "}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["message"],
        "Category with this name already exists"
    );
}

#[tokio::test]
async fn duplicate_name_is_allowed_for_another_user() {
    let app = TestApp::new().await;
    let alice = app.signup("alice", "alice@example.com", "hunter22").await;
    let bob = app.signup("bob", "bob@example.com", "hunter22").await;

    create_category(&app, &alice, "Work").await;
    create_category(&app, &bob, "Work").await;
}

#[tokio::test]
async fn blank_name_fails_validation() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;

    let resp = app
        .post_json(
            "/api/categories",
            serde_json::json!({"name": "   "}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "name");
}

#[tokio::test]
async fn get_one_hides_foreign_categories() {
    let app = TestApp::new().await;
    let alice = app.signup("alice", "alice@example.com", "hunter22").await;
    let bob = app.signup("bob", "bob@example.com", "hunter22").await;

    let id = create_category(&app, &alice, "Work").await;

    let resp = app
        .get(&format!("/api/categories/{id}"), Some(&alice))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.get(&format!("/api/categories/{id}"), Some(&bob)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Category not found");
}

#[tokio::test]
async fn update_renames_in_place() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;
    let id = create_category(&app, &cookie, "Work").await;

    let resp = app
        .put_json(
            &format!("/api/categories/{id}"),
            serde_json::json!({"name": "Projects"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["name"], "Projects");
}

#[tokio::test]
async fn update_rejects_name_held_by_sibling_category() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;
    create_category(&app, &cookie, "Work").await;
    let id = create_category(&app, &cookie, "Home").await;

    let resp = app
        .put_json(
            &format!("/api/categories/{id}"),
            serde_json::json!({"name": "Work"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Renaming to its own current name is not a conflict.
    let resp = app
        .put_json(
            &format!("/api/categories/{id}"),
            serde_json::json!({"name": "Home"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn archive_moves_category_to_archived_list() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;
    let id = create_category(&app, &cookie, "Work").await;

    let resp = app.delete(&format!("/api/categories/{id}"), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(app.get("/api/categories", Some(&cookie)).await).await;
    assert_eq!(body["results"], 0);

    let body = body_json(app.get("/api/categories/archived", Some(&cookie)).await).await;
    assert_eq!(body["results"], 1);
    assert_eq!(body["data"][0]["is_deleted"], true);
    assert!(!body["data"][0]["deleted_at"].is_null());
}

#[tokio::test]
async fn archived_category_cannot_be_updated_or_archived_again() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;
    let id = create_category(&app, &cookie, "Work").await;
    app.delete(&format!("/api/categories/{id}"), Some(&cookie)).await;

    let resp = app
        .put_json(
            &format!("/api/categories/{id}"),
            serde_json::json!({"name": "Renamed"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await["message"],
        "Category not found or is archived"
    );

    let resp = app.delete(&format!("/api/categories/{id}"), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_one_still_returns_archived_category() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;
    let id = create_category(&app, &cookie, "Work").await;
    app.delete(&format!("/api/categories/{id}"), Some(&cookie)).await;

    let resp = app
        .get(&format!("/api/categories/{id}"), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["is_deleted"], true);
}

#[tokio::test]
async fn archive_is_refused_while_active_notes_reference_it() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;
    let id = create_category(&app, &cookie, "Work").await;

    let resp = app
        .post_json(
            "/api/notes",
            serde_json::json!({"title": "Linked", "categories": [id]}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let note_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = app.delete(&format!("/api/categories/{id}"), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["message"],
        "Cannot delete category. It is being used by 1 active note(s)."
    );

    // Archiving the note releases the category.
    app.delete(&format!("/api/notes/{note_id}"), Some(&cookie)).await;
    let resp = app.delete(&format!("/api/categories/{id}"), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn reported_in_use_count_matches_active_notes() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;
    let id = create_category(&app, &cookie, "Work").await;

    for title in ["One", "Two", "Three"] {
        let resp = app
            .post_json(
                "/api/notes",
                serde_json::json!({"title": title, "categories": [id]}),
                Some(&cookie),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app.delete(&format!("/api/categories/{id}"), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["message"],
        "Cannot delete category. It is being used by 3 active note(s)."
    );
}

#[tokio::test]
async fn archived_list_orders_most_recently_archived_first() {
    let app = TestApp::new().await;
    let cookie = app.signup("alice", "alice@example.com", "hunter22").await;
    let first = create_category(&app, &cookie, "First").await;
    let second = create_category(&app, &cookie, "Second").await;

    // Archive in reverse creation order so the ordering cannot be
    // mistaken for created_at.
    app.delete(&format!("/api/categories/{second}"), Some(&cookie)).await;
    app.delete(&format!("/api/categories/{first}"), Some(&cookie)).await;

    let body = body_json(app.get("/api/categories/archived", Some(&cookie)).await).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First", "Second"]);
}
