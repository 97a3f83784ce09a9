use actix_web::{web, App, HttpServer};
use gateway::config::GatewayConfig;
use gateway::middleware::jwt_validation::JwtValidation;
use gateway::state::GatewayState;
use gateway::{health, proxy};
use mesh_web::middleware::request_trace::RequestTrace;
use mesh_web::middleware::structured_logger::StructuredLogger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    mesh_web::telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("GATEWAY_PORT")
        .unwrap_or_else(|_| "4004".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ GATEWAY_PORT must be a valid port number");
            std::process::exit(1);
        });

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Gateway configuration error: {e}");
            std::process::exit(1);
        }
    };

    let state = match GatewayState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build gateway state: {e}");
            std::process::exit(1);
        }
    };

    println!("🚀 Starting API Gateway on http://{}:{}", host, port);

    let data = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger::new("gateway"))
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(health::configure_routes)
            .service(
                web::scope("/auth")
                    .default_service(web::route().to(proxy::forward_auth)),
            )
            .service(
                web::scope("/patients")
                    .wrap(JwtValidation)
                    .default_service(web::route().to(proxy::forward_patients)),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
