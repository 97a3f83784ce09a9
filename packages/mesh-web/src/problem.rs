//! RFC-7807 Problem Details envelope shared by every service's error type.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use crate::trace_ctx;

#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Build the `application/problem+json` response every `AppError` renders.
/// The trace_id is read from the task-local request context and mirrored in
/// the `x-trace-id` header so clients and logs can be correlated.
pub fn respond(status: StatusCode, code: &str, detail: String) -> HttpResponse {
    let trace_id = trace_ctx::trace_id();

    let problem = ProblemDetails {
        type_: format!("https://pm-mesh.dev/errors/{}", code.to_uppercase()),
        title: humanize_code(code),
        status: status.as_u16(),
        detail,
        code: code.to_string(),
        trace_id: trace_id.clone(),
    };

    HttpResponse::build(status)
        .content_type("application/problem+json")
        .insert_header(("x-trace-id", trace_id))
        .json(problem)
}

fn humanize_code(code: &str) -> String {
    code.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
