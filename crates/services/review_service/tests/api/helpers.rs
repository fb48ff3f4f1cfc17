use diesel::prelude::*;
use diesel::PgConnection;
use diesel_async::RunQueryDsl;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use lib_config::config::configuration::Settings;
use lib_config::db::db::{create_database, drop_database, establish_connection, PgPool};
use once_cell::sync::Lazy;
use review_service::schema::users;
use review_service::startup::Application;
use serde_json::{json, Value};
use utils::telemetry::{get_subscriber, init_subscriber};
use uuid::Uuid;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub const PASSWORD: &str = "password123";

// Set TEST_LOG=1 to see the server's logs.
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber("test".into(), "debug".into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber("test".into(), "debug".into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub pool: PgPool,
    pub api_client: reqwest::Client,
    db_name: String,
    maintenance_url: String,
}

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

fn run_migrations(database_url: &str) {
    let mut conn = PgConnection::establish(database_url).expect("Failed to connect for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let mut config = Settings::new().expect("Failed to load configurations");
    config.database.database_name = format!("reviews_test_{}", Uuid::new_v4().simple());
    config.application.port = 0;

    let maintenance_url = config.database.maintenance_string();
    create_database(&config.database.database_name, &maintenance_url)
        .await
        .expect("Failed to create test database");
    let database_url = config.database.connection_string();
    let migration_url = database_url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .expect("Migration task panicked");

    let pool = establish_connection(&database_url).expect("Failed to build pool");
    let application = Application::build(pool.clone(), &config)
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", application.port());
    tokio::spawn(application.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client");

    TestApp {
        address,
        pool,
        api_client,
        db_name: config.database.database_name,
        maintenance_url,
    }
}

impl TestApp {
    pub async fn cleanup(self) {
        drop(self.pool);
        drop_database(&self.db_name, &self.maintenance_url).await;
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, username: &str) -> TestUser {
        let response = self
            .api_client
            .post(self.url("/api/v1/users/register"))
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Invalid register response");
        TestUser {
            id: body["user"]["id"]
                .as_str()
                .and_then(|id| Uuid::parse_str(id).ok())
                .expect("Missing user id"),
            token: body["token"].as_str().expect("Missing token").to_string(),
        }
    }

    pub async fn login(&self, username: &str) -> String {
        let response = self
            .api_client
            .post(self.url("/api/v1/users/login"))
            .json(&json!({
                "email": format!("{}@example.com", username),
                "password": PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.expect("Invalid login response");
        body["token"].as_str().expect("Missing token").to_string()
    }

    /// Registers a user, flags them as staff and logs in again for a staff token.
    pub async fn register_staff(&self, username: &str) -> TestUser {
        let user = self.register(username).await;
        let mut conn = self.pool.get().await.expect("Failed to get connection");
        diesel::update(users::table.filter(users::id.eq(user.id)))
            .set(users::is_staff.eq(true))
            .execute(&mut conn)
            .await
            .expect("Failed to flag staff");
        TestUser {
            id: user.id,
            token: self.login(username).await,
        }
    }

    pub async fn create_post(&self, author: &TestUser, body: Value) -> reqwest::Response {
        self.api_client
            .post(self.url("/api/v1/auth/posts/new"))
            .bearer_auth(&author.token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn publish(&self, author: &TestUser, title: &str, developer: &str) -> Value {
        let response = self
            .create_post(
                author,
                json!({
                    "title": title,
                    "status": "published",
                    "developer": developer,
                    "excerpt": format!("{} in short", title)
                }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Invalid post response")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_as(&self, user: &TestUser, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .bearer_auth(&user.token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_form(&self, user: &TestUser, path: &str, body: &str) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .bearer_auth(&user.token)
            .form(&[("body", body)])
            .send()
            .await
            .expect("Failed to execute request")
    }
}
