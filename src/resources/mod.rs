//! The two collections exposed by the API.
//!
//! Each handler runs its request through a chain of stages (existence guard, shape validator,
//! identity reconciler) before touching the store. Every stage returns an [`ApiResult`], so the
//! first failing stage ends the request and the error is rendered by the caller.
//!
//! [`ApiResult`]: crate::errors::ApiResult

pub mod dishes;
pub mod orders;
pub mod payload;

use crate::api::Envelope;
use crate::http::Response;
use serde::Serialize;

/// Serialize `data` inside the `{"data": ...}` envelope
pub fn json_response<T: Serialize>(status: u16, data: T) -> Response {
    match serde_json::to_string(&Envelope::new(data)) {
        Ok(body) => Response::json(status, body),
        Err(err) => {
            tracing::error!(%err, "failed to serialize response body");
            Response::internal_server_error()
        }
    }
}
