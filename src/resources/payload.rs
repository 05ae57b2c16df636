//! Helpers shared by the validators of both collections.
//!
//! Payloads arrive as untyped JSON. Field presence follows the usual JavaScript truthiness rules
//! since that is what clients of this API have always been held to: `null`, `false`, `0` and `""`
//! count as missing, while arrays and objects (even empty ones) count as present.

use crate::errors::{ApiError, ApiResult};
use crate::routes::HttpParams;
use serde_json::{Map, Value};

/// The content of the `data` property of a request body
pub type Payload = Map<String, Value>;

/// Extract the payload from a `{"data": {...}}` request body
pub fn read_payload(body: &str) -> ApiResult<Payload> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| ApiError::MalformedBody(err.to_string()))?;

    let Value::Object(mut envelope) = value else {
        return Err(ApiError::MalformedBody("expected a JSON object".to_string()));
    };

    match envelope.remove("data") {
        Some(Value::Object(data)) => Ok(data),
        Some(_) => Err(ApiError::MalformedBody("'data' must be an object".to_string())),
        None => Err(ApiError::MalformedBody("'data' is missing".to_string())),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The value of `field`, unless it is absent or falsy
pub fn present<'a>(payload: &'a Payload, field: &str) -> Option<&'a Value> {
    payload.get(field).filter(|value| is_truthy(value))
}

/// Fails on the first field of `fields` that is absent or falsy
pub fn require_fields(payload: &Payload, fields: &[&'static str]) -> ApiResult<()> {
    match fields
        .iter()
        .copied()
        .find(|field| present(payload, field).is_none())
    {
        Some(field) => Err(ApiError::MissingField(field)),
        None => Ok(()),
    }
}

pub fn required_string(payload: &Payload, field: &'static str) -> ApiResult<String> {
    match present(payload, field) {
        None => Err(ApiError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApiError::InvalidType(format!(
            "'{}' must be a string",
            field
        ))),
    }
}

/// Identifiers are strings, but clients may send integers. Those are turned into their decimal
/// representation so that `42` and `"42"` designate the same record.
pub fn canonical_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

/// The canonical identifier in `field`, or None if it is absent or falsy
pub fn optional_id(payload: &Payload, field: &'static str) -> ApiResult<Option<String>> {
    match present(payload, field) {
        None => Ok(None),
        Some(value) => canonical_id(value).map(Some).ok_or_else(|| {
            ApiError::InvalidType(format!("'{}' must be a string or an integer", field))
        }),
    }
}

/// Align the id of an update payload with the id of the route.
///
/// A payload without id takes the route id. A payload with a different id is rejected.
pub fn reconcile_identity(
    resource: &'static str,
    route_id: &str,
    payload_id: Option<String>,
) -> ApiResult<String> {
    match payload_id {
        None => Ok(route_id.to_string()),
        Some(id) if id == route_id => Ok(id),
        Some(id) => Err(ApiError::IdentityMismatch {
            resource,
            route: route_id.to_string(),
            payload: id,
        }),
    }
}

/// Fetch a path parameter. The router guarantees it for the routes that declare it.
pub fn route_param<'a>(params: &'a HttpParams, name: &str) -> ApiResult<&'a str> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| ApiError::RouteNotFound(format!("missing path parameter {}", name)))
}
