//! One log line per completed request, tagged with the owning service.
//!
//! Sits inside `RequestTrace` in the middleware stack, so the task-local
//! trace context is already established when the line is emitted and the
//! logged trace_id matches the `x-trace-id` the client received. Level
//! follows the status class: 5xx at error, 4xx at warn, the rest at info.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error as ActixError;
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::trace_ctx;

pub struct StructuredLogger {
    service: &'static str,
}

impl StructuredLogger {
    /// `service` names the binary in every log line, so one log stream can
    /// carry the whole mesh.
    pub fn new(service: &'static str) -> Self {
        Self { service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, inner: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware {
            service: self.service,
            inner,
        }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: &'static str,
    inner: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let service = self.service;
        let method = req.method().to_string();
        let path = req.path().to_string();

        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let trace_id = trace_ctx::trace_id();
            let status = status.as_u16();

            if status >= 500 {
                error!(service, %method, %path, status, elapsed_ms, %trace_id, "request completed");
            } else if status >= 400 {
                warn!(service, %method, %path, status, elapsed_ms, %trace_id, "request completed");
            } else {
                info!(service, %method, %path, status, elapsed_ms, %trace_id, "request completed");
            }

            result
        })
    }
}
