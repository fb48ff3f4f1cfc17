use serde_json::Value;

use crate::helpers::{spawn_app, TestApp, TestUser};

async fn detail(app: &TestApp, viewer: &TestUser) -> Value {
    let response = app.get_as(viewer, "/api/v1/posts/hades-review").await;
    assert_eq!(response.status().as_u16(), 200);
    response.json().await.unwrap()
}

fn messages(body: &Value) -> Vec<String> {
    body["notices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["message"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn a_new_comment_waits_for_approval() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    let reader = app.register("reader").await;
    let staff = app.register_staff("moderator").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;

    let response = app
        .post_form(&reader, "/api/v1/auth/comments/hades-review", "Great game")
        .await;
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(
        response.headers()["location"],
        "/api/v1/posts/hades-review"
    );

    let mine = detail(&app, &reader).await;
    assert_eq!(messages(&mine), vec!["Comment submitted and awaiting approval"]);
    assert_eq!(mine["comments"].as_array().unwrap().len(), 1);
    assert_eq!(mine["comment_count"], 0);

    // Notices are shown once.
    assert!(messages(&detail(&app, &reader).await).is_empty());

    let theirs = detail(&app, &author).await;
    assert!(theirs["comments"].as_array().unwrap().is_empty());

    let pending: Value = app
        .get_as(&staff, "/api/v1/admin/comments/pending")
        .await
        .json()
        .await
        .unwrap();
    let comment_id = pending[0]["id"].as_str().unwrap().to_string();
    let approve = app
        .api_client
        .post(app.url(&format!("/api/v1/admin/comments/{}/approve", comment_id)))
        .bearer_auth(&staff.token)
        .send()
        .await
        .unwrap();
    assert_eq!(approve.status().as_u16(), 200);

    let theirs = detail(&app, &author).await;
    assert_eq!(theirs["comment_count"], 1);
    assert_eq!(theirs["comments"][0]["body"], "Great game");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn a_blank_comment_is_dropped_without_a_notice() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    let reader = app.register("reader").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;

    let response = app
        .post_form(&reader, "/api/v1/auth/comments/hades-review", "   ")
        .await;
    assert_eq!(response.status().as_u16(), 303);

    let body = detail(&app, &reader).await;
    assert!(messages(&body).is_empty());
    assert!(body["comments"].as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn only_the_author_may_edit_or_delete_a_comment() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    let reader = app.register("reader").await;
    let other = app.register("other").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;

    app.post_form(&reader, "/api/v1/auth/comments/hades-review", "First take")
        .await;
    let body = detail(&app, &reader).await;
    let comment_id = body["comments"][0]["id"].as_str().unwrap().to_string();
    let edit_path = format!("/api/v1/auth/comments/hades-review/{}/edit", comment_id);
    let delete_path = format!("/api/v1/auth/comments/hades-review/{}/delete", comment_id);

    let response = app.post_form(&other, &edit_path, "Hijacked").await;
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(messages(&detail(&app, &other).await), vec!["Error updating comment!"]);

    let response = app.post_form(&other, &delete_path, "").await;
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(
        messages(&detail(&app, &other).await),
        vec!["You can only delete your own comments!"]
    );

    app.post_form(&reader, &edit_path, "Second take").await;
    let body = detail(&app, &reader).await;
    assert_eq!(messages(&body), vec!["Comment Updated!"]);
    assert_eq!(body["comments"][0]["body"], "Second take");
    assert_eq!(body["comments"][0]["approved"], false);

    app.post_form(&reader, &delete_path, "").await;
    let body = detail(&app, &reader).await;
    assert_eq!(messages(&body), vec!["Comment deleted!"]);
    assert!(body["comments"].as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn comment_actions_on_missing_posts_are_not_found() {
    let app = spawn_app().await;
    let reader = app.register("reader").await;

    let response = app
        .post_form(&reader, "/api/v1/auth/comments/no-such-post", "Hello")
        .await;
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn commenting_requires_a_token() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(app.url("/api/v1/auth/comments/hades-review"))
        .form(&[("body", "Anonymous")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn a_logged_out_token_reads_the_detail_page_anonymously() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    let reader = app.register("reader").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;

    app.post_form(&reader, "/api/v1/auth/comments/hades-review", "Great game")
        .await;

    let logout = app
        .api_client
        .post(app.url("/api/v1/user/protected/logout"))
        .bearer_auth(&reader.token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status().as_u16(), 200);

    let body = detail(&app, &reader).await;
    assert!(messages(&body).is_empty());
    assert!(body["comments"].as_array().unwrap().is_empty());
    assert_eq!(body["comment_count"], 0);

    app.cleanup().await;
}
