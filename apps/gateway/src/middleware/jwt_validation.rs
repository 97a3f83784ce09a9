//! Gateway authentication filter.
//!
//! Intercepts every request on the protected scope. Per request, terminal
//! in one hop:
//! 1. Authorization header absent or not "Bearer <token>" → 401, request
//!    never forwarded.
//! 2. Credential present → exactly one call to the authority delegate.
//! 3. `Valid` → forward the original request unchanged; the downstream
//!    response is returned verbatim.
//! 4. `InvalidCredential` → 401, request never forwarded.
//! 5. `AuthorityUnavailable` → 500 (server-side failure, distinct from a
//!    client auth failure), request never forwarded.
//!
//! No retry loop and no caching of validation results across requests.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::clients::auth::ValidationOutcome;
use crate::error::AppError;
use crate::state::GatewayState;

pub struct JwtValidation;

impl<S, B> Transform<S, ServiceRequest> for JwtValidation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtValidationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtValidationMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtValidationMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtValidationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token = extract_bearer(req.headers().get(header::AUTHORIZATION));
        let state = req.app_data::<web::Data<GatewayState>>().cloned();

        Box::pin(async move {
            let Some(token) = token else {
                return Ok(reject(req, AppError::unauthorized_missing_bearer()));
            };

            let Some(state) = state else {
                return Ok(reject(
                    req,
                    AppError::internal("GatewayState not available".to_string()),
                ));
            };

            match state.authority.check(&token).await {
                ValidationOutcome::Valid => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                ValidationOutcome::InvalidCredential => {
                    Ok(reject(req, AppError::unauthorized_invalid_token()))
                }
                ValidationOutcome::AuthorityUnavailable => {
                    Ok(reject(req, AppError::authority_unavailable()))
                }
            }
        })
    }
}

/// Terminates the request with the error's Problem Details response.
fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let res = err.error_response();
    req.into_response(res).map_into_right_body()
}

/// Returns the token when the header is exactly of the "Bearer <token>"
/// form, mirroring what the authority itself accepts.
fn extract_bearer(header_value: Option<&header::HeaderValue>) -> Option<String> {
    let auth_str = header_value?.to_str().ok()?;
    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Some(token.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};
    use async_trait::async_trait;

    use super::{extract_bearer, JwtValidation};
    use crate::clients::auth::{CredentialAuthority, ValidationOutcome};
    use crate::state::GatewayState;

    /// Authority stub that records how many times it was consulted.
    struct StubAuthority {
        outcome: ValidationOutcome,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CredentialAuthority for StubAuthority {
        async fn check(&self, _token: &str) -> ValidationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    struct Spy {
        downstream_calls: Arc<AtomicUsize>,
    }

    async fn spy_route(spy: web::Data<Spy>) -> HttpResponse {
        spy.downstream_calls.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().body("downstream-ok")
    }

    struct Harness {
        authority_calls: Arc<AtomicUsize>,
        downstream_calls: Arc<AtomicUsize>,
    }

    async fn run(
        outcome: ValidationOutcome,
        auth_header: Option<&str>,
    ) -> (StatusCode, String, Harness) {
        let authority_calls = Arc::new(AtomicUsize::new(0));
        let downstream_calls = Arc::new(AtomicUsize::new(0));

        let state = GatewayState::with_authority(
            Arc::new(StubAuthority {
                outcome,
                calls: Arc::clone(&authority_calls),
            }),
            "http://auth.invalid".to_string(),
            "http://patients.invalid".to_string(),
        )
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(Spy {
                    downstream_calls: Arc::clone(&downstream_calls),
                }))
                .service(
                    web::scope("/patients")
                        .wrap(JwtValidation)
                        .route("", web::get().to(spy_route)),
                ),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/patients");
        if let Some(value) = auth_header {
            req = req.insert_header(("Authorization", value));
        }

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

        (
            status,
            body,
            Harness {
                authority_calls,
                downstream_calls,
            },
        )
    }

    #[actix_web::test]
    async fn missing_header_is_401_without_any_calls() {
        let (status, _, h) = run(ValidationOutcome::Valid, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(h.authority_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.downstream_calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn malformed_scheme_is_401_without_any_calls() {
        let (status, _, h) = run(ValidationOutcome::Valid, Some("Token abc")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(h.authority_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.downstream_calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn valid_outcome_forwards_and_relays_response() {
        let (status, body, h) = run(ValidationOutcome::Valid, Some("Bearer good")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "downstream-ok");
        assert_eq!(h.authority_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.downstream_calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn invalid_credential_is_401_and_never_forwarded() {
        let (status, _, h) = run(ValidationOutcome::InvalidCredential, Some("Bearer bad")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(h.authority_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.downstream_calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn authority_unavailable_is_500_and_never_forwarded() {
        let (status, _, h) =
            run(ValidationOutcome::AuthorityUnavailable, Some("Bearer any")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(h.authority_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.downstream_calls.load(Ordering::SeqCst), 0);
    }

    #[::core::prelude::v1::test]
    fn bearer_extraction_edge_cases() {
        use actix_web::http::header::HeaderValue;

        let hv = HeaderValue::from_static("Bearer tok-123");
        assert_eq!(extract_bearer(Some(&hv)), Some("tok-123".to_string()));

        let hv = HeaderValue::from_static("Bearer ");
        assert_eq!(extract_bearer(Some(&hv)), None);

        let hv = HeaderValue::from_static("bearer tok");
        assert_eq!(extract_bearer(Some(&hv)), None);

        assert_eq!(extract_bearer(None), None);
    }
}
