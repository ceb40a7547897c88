//! Request correlation.
//!
//! Every request carries an `x-request-id`. A well-formed id from an upstream
//! proxy is kept; a missing or malformed one is replaced with a UUID v4. The
//! id is recorded on the request span, tagged on the Sentry scope next to the
//! shopper id (when the `x-shopper-id` header names one), and echoed on the
//! response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use marche_core::ShopperId;
use tracing::Span;
use uuid::Uuid;

use super::shopper::SHOPPER_ID_HEADER;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request id that is passed through.
const MAX_REQUEST_ID_LEN: usize = 128;

fn is_acceptable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Middleware that ensures every request has a usable request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let headers = request.headers();
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_acceptable(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);
    let shopper_id = headers
        .get(SHOPPER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|raw| raw.trim().parse::<ShopperId>().ok());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
        if let Some(shopper_id) = shopper_id {
            scope.set_tag("shopper_id", shopper_id);
        }
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
