//! Relay tests against a live stub upstream: what the gateway forwards is
//! what the upstream receives, and what the upstream answers is what the
//! client gets back.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpRequest, HttpResponse};
use async_trait::async_trait;
use gateway::{proxy, CredentialAuthority, GatewayState, JwtValidation, ValidationOutcome};
use mesh_web::middleware::request_trace::RequestTrace;
use test_support::problem_details::assert_problem_details_from_service_response;

struct AlwaysValid;

#[async_trait]
impl CredentialAuthority for AlwaysValid {
    async fn check(&self, _token: &str) -> ValidationOutcome {
        ValidationOutcome::Valid
    }
}

/// Echoes the received path, query, and Authorization header back in
/// response headers, and the body verbatim, so assertions can see exactly
/// what crossed the wire.
async fn echo(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let auth = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    HttpResponse::Created()
        .insert_header(("x-echo-path", req.path().to_string()))
        .insert_header(("x-echo-query", req.query_string().to_string()))
        .insert_header(("x-echo-auth", auth))
        .body(body)
}

fn start_upstream() -> actix_test::TestServer {
    actix_test::start(|| {
        App::new()
            .route("/patients", web::post().to(echo))
            .route("/login", web::post().to(echo))
            .route(
                "/patients/{id}",
                web::get().to(|| async { HttpResponse::NotFound().body("no such patient") }),
            )
    })
}

fn gateway_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth").default_service(web::route().to(proxy::forward_auth)),
    )
    .service(
        web::scope("/patients")
            .wrap(JwtValidation)
            .default_service(web::route().to(proxy::forward_patients)),
    );
}

fn state_for(upstream_base: String) -> GatewayState {
    GatewayState::with_authority(Arc::new(AlwaysValid), upstream_base.clone(), upstream_base)
        .unwrap()
}

#[actix_web::test]
async fn patients_traffic_is_relayed_verbatim() {
    let upstream = start_upstream();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_for(upstream.url(""))))
            .configure(gateway_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/patients?page=2&size=5")
        .insert_header(("Authorization", "Bearer good"))
        .set_payload(r#"{"name":"Jane Roe"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers().get("x-echo-path").unwrap(), "/patients");
    assert_eq!(resp.headers().get("x-echo-query").unwrap(), "page=2&size=5");
    assert_eq!(resp.headers().get("x-echo-auth").unwrap(), "Bearer good");

    let body = test::read_body(resp).await;
    assert_eq!(body, web::Bytes::from_static(br#"{"name":"Jane Roe"}"#));
}

#[actix_web::test]
async fn auth_traffic_is_relayed_with_prefix_stripped() {
    let upstream = start_upstream();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_for(upstream.url(""))))
            .configure(gateway_routes),
    )
    .await;

    // No Authorization header: the /auth scope is where tokens come from.
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_payload(r#"{"email":"jane@example.com","password":"pw"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers().get("x-echo-path").unwrap(), "/login");

    let body = test::read_body(resp).await;
    assert_eq!(
        body,
        web::Bytes::from_static(br#"{"email":"jane@example.com","password":"pw"}"#)
    );
}

#[actix_web::test]
async fn upstream_error_statuses_are_relayed_unchanged() {
    let upstream = start_upstream();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_for(upstream.url(""))))
            .configure(gateway_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/patients/5a3e0a59-9c5a-4c4e-9e22-6a4a5ad0a000")
        .insert_header(("Authorization", "Bearer good"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = test::read_body(resp).await;
    assert_eq!(body, web::Bytes::from_static(b"no such patient"));
}

#[actix_web::test]
async fn unreachable_upstream_is_a_500_problem() {
    test_support::test_logging::init();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_for(
                // Unroutable port, connection refused.
                "http://127.0.0.1:9".to_string(),
            )))
            .configure(gateway_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/patients")
        .insert_header(("Authorization", "Bearer good"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "UPSTREAM_UNAVAILABLE",
        StatusCode::INTERNAL_SERVER_ERROR,
        Some("Upstream call failed"),
    )
    .await;
}
