use serde_json::{json, Value};

use crate::helpers::spawn_app;

fn slugs(body: &Value) -> Vec<String> {
    body["posts"]
        .as_array()
        .expect("posts should be a list")
        .iter()
        .map(|p| p["slug"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn listing_shows_published_posts_newest_first() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;
    app.publish(&author, "Celeste Review", "Maddy Makes Games").await;
    let draft = app
        .create_post(&author, json!({"title": "Unfinished Thoughts"}))
        .await;
    assert_eq!(draft.status().as_u16(), 201);

    let response = app.get("/api/v1/posts").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(slugs(&body), vec!["celeste-review", "hades-review"]);
    assert_eq!(body["total"], 2);
    assert!(body["genre_list"].is_array());
    assert!(body["publisher_list"].is_array());

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn genre_filter_uses_the_fixture() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;
    app.publish(&author, "Celeste Review", "Maddy Makes Games").await;
    app.publish(&author, "Hollow Knight Review", "Team Cherry").await;

    let body: Value = app.get("/api/v1/posts?genre=platformer").await.json().await.unwrap();
    assert_eq!(slugs(&body), vec!["hollow-knight-review", "celeste-review"]);
    assert_eq!(body["filters"]["genre"], "platformer");

    let body: Value = app
        .get("/api/v1/posts?genre=action-adventure")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(slugs(&body), vec!["hollow-knight-review"]);

    let body: Value = app.get("/api/v1/posts?genre=racing").await.json().await.unwrap();
    assert!(slugs(&body).is_empty());

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn genre_and_publisher_filters_intersect() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    app.publish(&author, "Celeste Review", "Maddy Makes Games").await;
    app.publish(&author, "Hollow Knight Review", "Team Cherry").await;

    let body: Value = app
        .get("/api/v1/posts?genre=platformer&publisher=team-cherry")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(slugs(&body), vec!["hollow-knight-review"]);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn publisher_filter_falls_back_to_the_developer_name() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;
    app.publish(&author, "Celeste Review", "Maddy Makes Games").await;

    let body: Value = app
        .get("/api/v1/posts?publisher=supergiant-games")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(slugs(&body), vec!["hades-review"]);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn out_of_range_pages_are_not_found() {
    let app = spawn_app().await;

    assert_eq!(app.get("/api/v1/posts?page=1").await.status().as_u16(), 200);
    assert_eq!(app.get("/api/v1/posts?page=2").await.status().as_u16(), 404);
    assert_eq!(app.get("/api/v1/posts?page=0").await.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn drafts_have_no_detail_page_until_published() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    let draft = app
        .create_post(&author, json!({"title": "Work In Progress"}))
        .await;
    assert_eq!(draft.status().as_u16(), 201);

    assert_eq!(
        app.get("/api/v1/posts/work-in-progress").await.status().as_u16(),
        404
    );

    let published = app
        .api_client
        .patch(app.url("/api/v1/auth/posts/work-in-progress"))
        .bearer_auth(&author.token)
        .json(&json!({"status": "published"}))
        .send()
        .await
        .unwrap();
    assert_eq!(published.status().as_u16(), 200);

    let detail = app.get("/api/v1/posts/work-in-progress").await;
    assert_eq!(detail.status().as_u16(), 200);
    let body: Value = detail.json().await.unwrap();
    assert_eq!(body["author"], "writer");
    assert_eq!(body["comment_count"], 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn only_the_author_may_edit_a_post() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    let intruder = app.register("intruder").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;

    let response = app
        .api_client
        .patch(app.url("/api/v1/auth/posts/hades-review"))
        .bearer_auth(&intruder.token)
        .json(&json!({"title": "Hijacked"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn duplicate_titles_conflict() {
    let app = spawn_app().await;
    let author = app.register("writer").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;

    let again = app
        .create_post(&author, json!({"title": "Hades Review", "slug": "hades-again"}))
        .await;
    assert_eq!(again.status().as_u16(), 409);

    app.cleanup().await;
}
