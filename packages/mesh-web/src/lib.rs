//! Web-boundary plumbing shared by the actix services in the mesh.
//!
//! Each service keeps its own error taxonomy; this crate only carries the
//! pieces that are identical across services: trace context, request
//! middleware, telemetry initialization, and the Problem Details envelope.

pub mod middleware;
pub mod problem;
pub mod telemetry;
pub mod trace_ctx;

pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use problem::ProblemDetails;
