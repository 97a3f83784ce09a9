use actix_web::{web, App, HttpServer};
use auth_service::config::db::db_url;
use auth_service::routes;
use auth_service::services::users::ensure_user;
use auth_service::state::app_state::AppState;
use auth_service::state::security_config::SecurityConfig;
use mesh_web::middleware::request_trace::RequestTrace;
use mesh_web::middleware::structured_logger::StructuredLogger;
use sea_orm::Database;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    mesh_web::telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("AUTH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("AUTH_PORT")
        .unwrap_or_else(|_| "4005".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ AUTH_PORT must be a valid port number");
            std::process::exit(1);
        });

    let jwt = match std::env::var("JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("❌ JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let security_config = SecurityConfig::new(jwt.as_bytes());

    let url = match db_url() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("❌ Database configuration error: {e}");
            std::process::exit(1);
        }
    };
    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = migration::migrate_up(&db).await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }

    // Optional startup seed so a fresh environment has a login that works.
    if let (Ok(email), Ok(password)) = (
        std::env::var("AUTH_SEED_EMAIL"),
        std::env::var("AUTH_SEED_PASSWORD"),
    ) {
        let role = std::env::var("AUTH_SEED_ROLE").unwrap_or_else(|_| "ADMIN".to_string());
        if let Err(e) = ensure_user(&db, &email, &password, &role).await {
            eprintln!("❌ Failed to seed user: {e}");
            std::process::exit(1);
        }
    }

    println!("🚀 Starting Auth Service on http://{}:{}", host, port);

    let data = web::Data::new(AppState::new(db, security_config));

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger::new("auth-service"))
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
