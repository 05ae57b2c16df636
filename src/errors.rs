use crate::cli::CLIError;
use crate::http::Response;
use thiserror::Error;

/// Failures of the plumbing around the API: sockets, HTTP framing, JSON, routing setup and
/// command line parsing. None of these are caused by the content of a well-formed request.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No response from server")]
    NoResponse,

    #[error("Connection closed before the message was complete")]
    ConnectionReset,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed HTTP message: {0}")]
    Http(#[from] httparse::Error),

    #[error("Message body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid route definition: {0}")]
    Route(#[from] matchit::InsertError),

    #[error(transparent)]
    Cli(#[from] CLIError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a request is rejected by a guard, a validator or the router.
///
/// Every stage of a request chain returns `ApiResult`, and the first error ends the request.
/// The message of each variant is what the client sees.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("{resource} does not exist: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Method {method} is not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("Request body must be a JSON object with a 'data' property: {0}")]
    MalformedBody(String),

    #[error("A '{0}' property is required.")]
    MissingField(&'static str),

    #[error("{0}")]
    InvalidType(String),

    #[error("{0}")]
    InvalidEnum(String),

    #[error("{resource} id {payload} does not match the route id {route}")]
    IdentityMismatch {
        resource: &'static str,
        route: String,
        payload: String,
    },

    #[error("{0}")]
    InvalidCollection(String),

    #[error("{0}")]
    InvalidState(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status code for this error. Everything but lookups is the client's fault.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound { .. } | ApiError::RouteNotFound(_) => 404,
            ApiError::MethodNotAllowed { .. } => 405,
            _ => 400,
        }
    }

    /// Render the error as `{"error": "<message>"}`
    pub fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        Response::json(self.status_code(), body.to_string())
    }
}
