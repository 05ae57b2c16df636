use std::io::{BufReader, Read};

use crate::errors::{Error, Result};
use crate::http::request::{content_length, owned_headers, read_body};

/// An HTTP response to be sent to a client
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code of the response. Optional because that's what httparse returns, but it
    /// shouldn't happen in practice since we control the responses.
    pub status: Option<u16>,
    /// Headers for the response. It is not necessary to add Content-Length to it, this is done
    /// automatically on serialization.
    pub headers: Vec<(String, String)>,
    /// Body of the response. Give an empty string for an empty body
    pub body: String,
}

impl Response {
    /// Creates an empty No Content (204) response
    pub fn no_content() -> Response {
        Response {
            status: Some(204),
            headers: vec![],
            body: String::new(),
        }
    }

    /// Creates a response with the given status and JSON body
    pub fn json(status: u16, body: String) -> Response {
        Response {
            status: Some(status),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    /// Creates an error response without body.
    ///
    /// The code must be in the 4xx or 5xx range. Errors raised while handling a request go
    /// through `ApiError::into_response` instead, which explains what went wrong.
    pub fn error(code: u16) -> Response {
        assert!((400..600).contains(&code), "Invalid error code");
        Response {
            status: Some(code),
            headers: vec![],
            body: String::new(),
        }
    }

    /// Creates a Bad Request (400) response.
    pub fn bad_request() -> Response {
        Self::error(400)
    }

    /// Creates an Internal Server Error (500) response.
    pub fn internal_server_error() -> Response {
        Self::error(500)
    }

    /// Look up a header by name, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse an HTTP response from a byte stream
pub fn parse_response<T>(mut buf_reader: BufReader<T>) -> Result<Response>
where
    T: Sized + Read,
{
    let mut buf = [0; 4096];
    let mut bytes = Vec::new();

    let (body_len, head_len, mut response) = loop {
        let bytes_read = buf_reader.read(&mut buf)?;
        if bytes_read == 0 {
            return Err(if bytes.is_empty() {
                Error::NoResponse
            } else {
                Error::ConnectionReset
            });
        }
        bytes.extend_from_slice(&buf[..bytes_read]);

        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut resp = httparse::Response::new(&mut headers);
        match resp.parse(&bytes)? {
            httparse::Status::Complete(head_len) => {
                break (
                    content_length(resp.headers),
                    head_len,
                    Response {
                        status: resp.code,
                        headers: owned_headers(resp.headers),
                        body: String::new(),
                    },
                );
            }
            httparse::Status::Partial => continue,
        }
    };

    response.body = read_body(&mut buf_reader, bytes, head_len, body_len)?;
    Ok(response)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::Rng;

    fn random_text(len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len).map(|_| rng.gen_range('a'..='z')).collect()
    }

    #[test]
    fn test_parse_simple_response() {
        let resp_str = b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n";
        let buf_reader = BufReader::new(&resp_str[..]);

        let parsed_resp = parse_response(buf_reader).unwrap();

        assert_eq!(parsed_resp.status, Some(204));
        assert_eq!(parsed_resp.headers.len(), 1);
        assert_eq!(parsed_resp.body, "");
    }

    #[test]
    fn test_parse_empty_stream() {
        let buf_reader = BufReader::new(&b""[..]);
        assert!(matches!(parse_response(buf_reader), Err(Error::NoResponse)));
    }

    #[test]
    fn test_parse_response_with_body() {
        let body = r#"{ "data": [] }"#;
        let resp_str = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/json\r\n\r\n{}",
            body.len(),
            body
        );

        let buf_reader = BufReader::new(resp_str.as_bytes());
        let parsed_resp = parse_response(buf_reader).unwrap();

        assert_eq!(parsed_resp.status, Some(200));
        assert_eq!(parsed_resp.header("content-type"), Some("application/json"));
        assert_eq!(parsed_resp.body, body);
    }

    #[test]
    fn test_parse_response_with_large_body() {
        let body = random_text(40960);

        let resp_str = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let buf_reader = BufReader::new(resp_str.as_bytes());
        let parsed_resp = parse_response(buf_reader).unwrap();

        assert_eq!(parsed_resp.headers.len(), 1);
        assert_eq!(parsed_resp.body, body);
    }

    #[test]
    fn test_json_response_has_content_type() {
        let response = Response::json(201, "{}".to_string());
        assert_eq!(response.status, Some(201));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[test]
    #[should_panic(expected = "Invalid error code")]
    fn test_error_rejects_success_codes() {
        Response::error(200);
    }
}
