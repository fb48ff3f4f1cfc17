use actix_web::{dev::Server, web, App, HttpServer};
use actix_web_lab::middleware::from_fn;
use lib_config::config::configuration::{FixtureSettings, JwtSettings, ListingSettings, Settings};
use lib_config::db::db::PgPool;
use lib_config::session::redis::RedisService;
use middleware::jwt::{jwt_auth_middleware, role_auth_middleware, StaffOnly};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::routes::{
    catalog::{
        genres::{create_genre, delete_genre, list_genres, search_genres, update_genre},
        publishers::{
            create_publisher, delete_publisher, list_publishers, search_publishers,
            update_publisher,
        },
    },
    comments::{
        comments::{delete_comment, edit_comment, submit_comment},
        moderation::{approve_comment, pending_comments},
    },
    health_check::health_check,
    posts::{
        authoring::{create_post, my_posts, update_post},
        detail::post_detail,
        listing::list_posts,
    },
    users::crud::{login_user, logout_user, register_user},
};

/// Shared state handed to every worker.
pub struct AppState {
    pub pool: PgPool,
    pub redis_service: RedisService,
    pub jwt: JwtSettings,
    pub fixtures: FixtureSettings,
    pub listing: ListingSettings,
}

/**************************************************************/
// Application State re reuse the same code in main and tests
/***************************************************************/
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(pool: PgPool, config: &Settings) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(&address)?;
        let actual_port = listener.local_addr()?.port();
        tracing::info!("Listening on {}:{}", config.application.host, actual_port);

        let state = AppState {
            pool,
            redis_service: RedisService::new(config.redis.uri.clone())?,
            jwt: config.jwt.clone(),
            fixtures: config.fixtures.clone(),
            listing: config.listing.clone(),
        };
        let server = run_server(listener, state)?;
        Ok(Self {
            port: actual_port,
            server,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/******************************************/
// Running Server
/******************************************/
pub fn run_server(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let pool = web::Data::new(state.pool);
    let redis_service = web::Data::new(state.redis_service);
    let jwt = web::Data::new(state.jwt);
    let fixtures = web::Data::new(state.fixtures);
    let listing = web::Data::new(state.listing);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(redis_service.clone())
            .app_data(jwt.clone())
            .app_data(fixtures.clone())
            .app_data(listing.clone())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api/v1")
                    .route("/posts", web::get().to(list_posts))
                    .route("/posts/{slug}", web::get().to(post_detail))
                    .route("/genres", web::get().to(list_genres))
                    .route("/publishers", web::get().to(list_publishers))
                    .service(
                        web::scope("/users")
                            .route("/register", web::post().to(register_user))
                            .route("/login", web::post().to(login_user)),
                    )
                    .service(
                        web::scope("/user/protected")
                            .wrap(from_fn(jwt_auth_middleware))
                            .route("/logout", web::post().to(logout_user)),
                    )
                    .service(
                        web::scope("/auth")
                            .wrap(from_fn(jwt_auth_middleware))
                            .route("/posts/new", web::post().to(create_post))
                            .route("/posts/mine", web::get().to(my_posts))
                            .route("/posts/{slug}", web::patch().to(update_post))
                            .route("/comments/{slug}", web::post().to(submit_comment))
                            .route(
                                "/comments/{slug}/{comment_id}/edit",
                                web::post().to(edit_comment),
                            )
                            .route(
                                "/comments/{slug}/{comment_id}/delete",
                                web::post().to(delete_comment),
                            ),
                    )
                    .service(
                        web::scope("/admin")
                            .wrap(from_fn(role_auth_middleware::<StaffOnly>))
                            .route("/genres", web::get().to(search_genres))
                            .route("/genres", web::post().to(create_genre))
                            .route("/genres/{slug}", web::patch().to(update_genre))
                            .route("/genres/{slug}", web::delete().to(delete_genre))
                            .route("/publishers", web::get().to(search_publishers))
                            .route("/publishers", web::post().to(create_publisher))
                            .route("/publishers/{slug}", web::patch().to(update_publisher))
                            .route("/publishers/{slug}", web::delete().to(delete_publisher))
                            .route("/comments/pending", web::get().to(pending_comments))
                            .route(
                                "/comments/{comment_id}/approve",
                                web::post().to(approve_comment),
                            ),
                    ),
            )
    })
    .listen(listener)?
    .run();
    Ok(server)
}
