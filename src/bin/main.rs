use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use alliance_portal::backend::{MemberBackend, PgBackend};
use alliance_portal::config::settings;
use alliance_portal::import::runner::ImportOptions;
use alliance_portal::notify::{HttpNotifier, Notifier};
use alliance_portal::state::AppState;
use alliance_portal::{http, metrics};
use redis::Client as RedisClient;
use sqlx::postgres::PgPoolOptions;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let cfg = settings();

    // Postgres pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create Postgres pool");

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations");

    // Redis client
    let redis_client = RedisClient::open(cfg.redis_url.as_str()).expect("Invalid REDIS_URL");

    let notifier: Option<Arc<dyn Notifier>> = if cfg.notify_new_members {
        let n = HttpNotifier::new(cfg.send_email_url.clone()).expect("Failed to build notifier");
        log::info!("credential notices go to {}", cfg.send_email_url);
        Some(Arc::new(n))
    } else {
        None
    };

    let backend: Arc<dyn MemberBackend> = Arc::new(PgBackend::new(db_pool));
    let state = AppState::new(
        backend,
        notifier,
        ImportOptions {
            default_password: cfg.default_member_password.clone(),
            portal_url: cfg.portal_url.clone(),
        },
    );

    log::info!("listening on {}", cfg.server_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(redis_client.clone()))
            .configure(http::routes::init_routes)
    })
    .bind(&cfg.server_addr)?
    .run()
    .await
}
