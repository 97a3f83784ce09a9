use billing_service::service::BillingAccountProvisioner;
use mesh_proto::billing::billing_service_server::BillingServiceServer;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    mesh_web::telemetry::init_tracing();

    let host = std::env::var("BILLING_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BILLING_PORT")
        .unwrap_or_else(|_| "9001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BILLING_PORT must be a valid port number");
            std::process::exit(1);
        });
    let addr = format!("{host}:{port}").parse()?;

    println!("🚀 Starting Billing Service gRPC server on {}", addr);

    Server::builder()
        .add_service(BillingServiceServer::new(BillingAccountProvisioner))
        .serve(addr)
        .await?;

    Ok(())
}
