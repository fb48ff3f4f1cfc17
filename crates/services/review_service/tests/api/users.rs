use serde_json::json;

use crate::helpers::spawn_app;

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app.get("/health_check").await;
    assert!(response.status().is_success());

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn weak_passwords_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(app.url("/api/v1/users/register"))
        .json(&json!({
            "username": "reader",
            "email": "reader@example.com",
            "password": "short"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn wrong_passwords_do_not_log_in() {
    let app = spawn_app().await;
    app.register("reader").await;

    let response = app
        .api_client
        .post(app.url("/api/v1/users/login"))
        .json(&json!({ "email": "reader@example.com", "password": "password124" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn a_logged_out_token_cannot_comment() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;

    let logout = app
        .api_client
        .post(app.url("/api/v1/user/protected/logout"))
        .bearer_auth(&author.token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status().as_u16(), 200);

    let response = app
        .post_form(&author, "/api/v1/auth/comments/hades-review", "Still here?")
        .await;
    assert_eq!(response.status().as_u16(), 401);

    app.cleanup().await;
}
