use serde_json::{json, Value};

use crate::helpers::spawn_app;

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn staff_manage_genres_and_readers_see_them_sorted() {
    let app = spawn_app().await;
    let staff = app.register_staff("moderator").await;

    for name in ["shooter", "Adventure", "Role-Playing"] {
        let response = app
            .api_client
            .post(app.url("/api/v1/admin/genres"))
            .bearer_auth(&staff.token)
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let menu: Value = app.get("/api/v1/genres").await.json().await.unwrap();
    let names: Vec<&str> = menu
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Adventure", "Role-Playing", "shooter"]);
    assert_eq!(menu[1]["slug"], "role-playing");

    let found: Value = app
        .get_as(&staff, "/api/v1/admin/genres?q=ROLE")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(found.as_array().unwrap().len(), 1);

    let renamed = app
        .api_client
        .patch(app.url("/api/v1/admin/genres/shooter"))
        .bearer_auth(&staff.token)
        .json(&json!({ "name": "First-Person Shooter" }))
        .send()
        .await
        .unwrap();
    assert_eq!(renamed.status().as_u16(), 200);
    let renamed: Value = renamed.json().await.unwrap();
    assert_eq!(renamed["slug"], "first-person-shooter");

    let deleted = app
        .api_client
        .delete(app.url("/api/v1/admin/genres/adventure"))
        .bearer_auth(&staff.token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 200);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn readers_cannot_use_the_admin() {
    let app = spawn_app().await;
    let reader = app.register("reader").await;

    let response = app
        .api_client
        .post(app.url("/api/v1/admin/publishers"))
        .bearer_auth(&reader.token)
        .json(&json!({ "name": "Annapurna Interactive" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn duplicate_publishers_conflict() {
    let app = spawn_app().await;
    let staff = app.register_staff("moderator").await;

    let create = || {
        app.api_client
            .post(app.url("/api/v1/admin/publishers"))
            .bearer_auth(&staff.token)
            .json(&json!({ "name": "Devolver Digital" }))
            .send()
    };
    assert_eq!(create().await.unwrap().status().as_u16(), 201);
    assert_eq!(create().await.unwrap().status().as_u16(), 409);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn posts_link_to_stored_publishers() {
    let app = spawn_app().await;
    let staff = app.register_staff("moderator").await;
    let author = app.register("writer").await;

    app.api_client
        .post(app.url("/api/v1/admin/publishers"))
        .bearer_auth(&staff.token)
        .json(&json!({ "name": "Team Cherry" }))
        .send()
        .await
        .unwrap();

    let linked = app
        .create_post(
            &author,
            json!({
                "title": "Silksong Review",
                "status": "published",
                "developer": "Somebody Else",
                "publisher": "team-cherry"
            }),
        )
        .await;
    assert_eq!(linked.status().as_u16(), 201);

    let unknown = app
        .create_post(
            &author,
            json!({ "title": "Other Review", "publisher": "nobody-games" }),
        )
        .await;
    assert_eq!(unknown.status().as_u16(), 400);

    let body: Value = app
        .get("/api/v1/posts?publisher=team-cherry")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["posts"][0]["slug"], "silksong-review");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn publisher_filter_matches_linked_posts_or_the_developer_name() {
    let app = spawn_app().await;
    let staff = app.register_staff("moderator").await;
    let author = app.register("writer").await;

    let created = app
        .api_client
        .post(app.url("/api/v1/admin/publishers"))
        .bearer_auth(&staff.token)
        .json(&json!({ "name": "Electronic Arts", "slug": "ea" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);

    let linked = app
        .create_post(
            &author,
            json!({
                "title": "Dead Space Review",
                "status": "published",
                "developer": "Motive Studio",
                "publisher": "ea"
            }),
        )
        .await;
    assert_eq!(linked.status().as_u16(), 201);
    app.publish(&author, "Mass Effect Review", "ELECTRONIC ARTS").await;
    app.publish(&author, "Hades Review", "Supergiant Games").await;

    let body: Value = app
        .get("/api/v1/posts?publisher=ea")
        .await
        .json()
        .await
        .unwrap();
    let slugs: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["mass-effect-review", "dead-space-review"]);
    assert_eq!(body["total"], 2);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Postgres and Redis"]
async fn a_logged_out_staff_token_cannot_use_the_admin() {
    let app = spawn_app().await;
    let staff = app.register_staff("moderator").await;

    let before = app.get_as(&staff, "/api/v1/admin/comments/pending").await;
    assert_eq!(before.status().as_u16(), 200);

    let logout = app
        .api_client
        .post(app.url("/api/v1/user/protected/logout"))
        .bearer_auth(&staff.token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status().as_u16(), 200);

    let after = app.get_as(&staff, "/api/v1/admin/comments/pending").await;
    assert_eq!(after.status().as_u16(), 401);

    let create = app
        .api_client
        .post(app.url("/api/v1/admin/genres"))
        .bearer_auth(&staff.token)
        .json(&json!({ "name": "Puzzle" }))
        .send()
        .await
        .unwrap();
    assert_eq!(create.status().as_u16(), 401);

    app.cleanup().await;
}
