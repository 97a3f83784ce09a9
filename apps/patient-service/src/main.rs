use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use mesh_web::middleware::request_trace::RequestTrace;
use mesh_web::middleware::structured_logger::StructuredLogger;
use patient_service::adapters::patients_sea::SeaPatientRepo;
use patient_service::clients::billing::GrpcBillingClient;
use patient_service::config::db::db_url;
use patient_service::events::publisher::RedisEventPublisher;
use patient_service::routes;
use patient_service::services::patients::PatientService;
use patient_service::state::app_state::AppState;
use sea_orm::Database;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    mesh_web::telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("PATIENT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PATIENT_PORT")
        .unwrap_or_else(|_| "4000".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ PATIENT_PORT must be a valid port number");
            std::process::exit(1);
        });

    let billing_address = match std::env::var("BILLING_SERVICE_ADDRESS") {
        Ok(addr) => addr,
        Err(_) => {
            eprintln!("❌ BILLING_SERVICE_ADDRESS must be set");
            std::process::exit(1);
        }
    };
    let redis_url = match std::env::var("REDIS_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("❌ REDIS_URL must be set");
            std::process::exit(1);
        }
    };
    let timeout_ms = std::env::var("OUTBOUND_TIMEOUT_MS")
        .unwrap_or_else(|_| "2000".to_string())
        .parse::<u64>()
        .unwrap_or_else(|_| {
            eprintln!("❌ OUTBOUND_TIMEOUT_MS must be a number of milliseconds");
            std::process::exit(1);
        });

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

    let billing =
        match GrpcBillingClient::connect_lazy(&billing_address, Duration::from_millis(timeout_ms)) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("❌ Billing client configuration error: {e}");
                std::process::exit(1);
            }
        };
    let events = match RedisEventPublisher::connect(&redis_url).await {
        Ok(publisher) => publisher,
        Err(e) => {
            eprintln!("❌ Failed to connect to event bus: {e}");
            std::process::exit(1);
        }
    };

    let patients = Arc::new(PatientService::new(
        Arc::new(SeaPatientRepo::new(db.clone())),
        Arc::new(billing),
        Arc::new(events),
    ));

    println!("🚀 Starting Patient Service on http://{}:{}", host, port);

    let data = web::Data::new(AppState::new(db, patients));

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger::new("patient-service"))
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
