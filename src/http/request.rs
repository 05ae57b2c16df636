use crate::errors::{Error, Result};
use std::io::{BufReader, Read};

/// Represents an HTTP request.
///
/// The path is kept whole (query string included), the router strips what it doesn't need.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method used in the request
    pub method: String,
    /// The full path of the request
    pub path: String,
    /// Headers of the request
    pub headers: Vec<(String, String)>,
    /// Body of the request
    pub body: String,
}

impl Request {
    /// Create a new request from scratch
    pub fn new(method: &str, path: &str, headers: Vec<(String, String)>, body: String) -> Request {
        Request {
            method: method.to_string(),
            path: path.to_string(),
            headers,
            body,
        }
    }
    /// Create a new GET request for the given path, with an empty body
    pub fn get(path: &str) -> Request {
        Self::new("GET", path, vec![], String::new())
    }
    /// Create a new POST request for the given path, with the given body
    pub fn post(path: &str, body: String) -> Request {
        Self::new("POST", path, vec![], body)
    }
    /// Create a new PUT request for the given path, with the given body
    pub fn put(path: &str, body: String) -> Request {
        Self::new("PUT", path, vec![], body)
    }
    /// Create a new DELETE request for the given path, with an empty body
    pub fn delete(path: &str) -> Request {
        Self::new("DELETE", path, vec![], String::new())
    }
}

/// Value of the Content-Length header, 0 if absent or unreadable
pub(crate) fn content_length(headers: &[httparse::Header]) -> usize {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("Content-Length"))
        .and_then(|length| String::from_utf8_lossy(length.value).trim().parse::<usize>().ok())
        .unwrap_or(0)
}

pub(crate) fn owned_headers(headers: &[httparse::Header]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|h| {
            (
                h.name.to_string(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect()
}

/// Keep reading until `bytes` holds `body_len` bytes past the head, then return the body.
///
/// Anything past the body is dropped. That is fine for HTTP/1.1 without keep-alive, which is all
/// the server does. A body that is not valid UTF-8 is an `Error::Utf8`.
pub(crate) fn read_body<T: Read>(
    buf_reader: &mut BufReader<T>,
    mut bytes: Vec<u8>,
    head_len: usize,
    body_len: usize,
) -> Result<String> {
    let mut buf = [0; 4096];
    while bytes.len() - head_len < body_len {
        let bytes_read = buf_reader.read(&mut buf)?;
        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }
        bytes.extend_from_slice(&buf[..bytes_read]);
    }
    bytes.truncate(head_len + body_len);
    Ok(String::from_utf8(bytes.split_off(head_len))?)
}

/// Parse an HTTP request from a byte stream
///
/// Reads until the head is complete, then until the whole body announced by Content-Length has
/// arrived. A stream that closes before that is an `Error::ConnectionReset`.
pub fn parse_request<T>(mut buf_reader: BufReader<T>) -> Result<Request>
where
    T: Sized + Read,
{
    let mut buf = [0; 4096];
    let mut bytes = Vec::new();

    let (body_len, head_len, mut request) = loop {
        let bytes_read = buf_reader.read(&mut buf)?;
        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }
        bytes.extend_from_slice(&buf[..bytes_read]);

        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        match req.parse(&bytes)? {
            httparse::Status::Complete(head_len) => {
                break (
                    content_length(req.headers),
                    head_len,
                    Request {
                        method: req.method.unwrap_or("GET").to_string(),
                        path: req.path.unwrap_or("/").to_string(),
                        headers: owned_headers(req.headers),
                        body: String::new(),
                    },
                );
            }
            httparse::Status::Partial => continue,
        }
    };

    request.body = read_body(&mut buf_reader, bytes, head_len, body_len)?;
    Ok(request)
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
    fn test_parse_simple_request() {
        let req_str = b"GET /dishes HTTP/1.1\r\nHost: localhost:5000\r\nUser-Agent: curl/7.68.0\r\nAccept: */*\r\n\r\n";
        let buf_reader = BufReader::new(&req_str[..]);

        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.method, "GET");
        assert_eq!(parsed_req.path, "/dishes");
        assert_eq!(parsed_req.headers.len(), 3);
        assert_eq!(parsed_req.body, "");
    }

    #[test]
    fn test_parse_incomplete_request() {
        let req_str =
            b"GET / HTTP/1.1\r\nHost: localhost:5000\r\nUser-Agent: curl/7.68.0\r\nAccept: */*";
        let buf_reader = BufReader::new(&req_str[..]);

        let parsed_req = parse_request(buf_reader);

        assert!(matches!(parsed_req, Err(Error::ConnectionReset)));
    }

    #[test]
    fn test_parse_truncated_body() {
        let req_str = b"POST /orders HTTP/1.1\r\nContent-Length: 50\r\n\r\n{\"data\":";
        let buf_reader = BufReader::new(&req_str[..]);

        assert!(matches!(
            parse_request(buf_reader),
            Err(Error::ConnectionReset)
        ));
    }

    #[test]
    fn test_parse_garbage() {
        let buf_reader = BufReader::new(&b"\x01\x02 nonsense\r\n\r\n"[..]);
        assert!(matches!(parse_request(buf_reader), Err(Error::Http(_))));
    }

    #[test]
    fn test_parse_request_with_body() {
        let body = r#"{ "data": { "name": "Taco" } }"#;
        let req_str = format!(
            "POST /dishes HTTP/1.1\r\nHost: localhost:5000\r\nUser-Agent: curl/7.68.0\r\nAccept: */*\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let buf_reader = BufReader::new(req_str.as_bytes());

        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.method, "POST");
        assert_eq!(parsed_req.path, "/dishes");
        assert_eq!(parsed_req.headers.len(), 4);
        assert_eq!(parsed_req.body, body);
    }

    #[test]
    fn test_parse_request_with_invalid_utf8_body() {
        let body = b"{\"data\":{\"name\":\"Ta\xffco\"}}";
        let mut req_bytes = format!(
            "POST /dishes HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        req_bytes.extend_from_slice(body);

        let buf_reader = BufReader::new(&req_bytes[..]);
        assert!(matches!(parse_request(buf_reader), Err(Error::Utf8(_))));
    }

    #[test]
    fn test_content_length_is_case_insensitive() {
        let body = r#"{"data":{}}"#;
        let req_str = format!(
            "PUT /orders/1 HTTP/1.1\r\ncontent-length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let parsed_req = parse_request(BufReader::new(req_str.as_bytes())).unwrap();
        assert_eq!(parsed_req.method, "PUT");
        assert_eq!(parsed_req.body, body);
    }

    #[test]
    fn test_parse_request_with_large_header() {
        let x_test_header = random_text(4096);

        let req_str = format!(
            "GET / HTTP/1.1\r\nHost: localhost:5000\r\nUser-Agent: curl/7.68.0\r\nAccept: */*\r\nX-Test: {}\r\n\r\n",
            x_test_header
        );

        let buf_reader = BufReader::new(req_str.as_bytes());
        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.headers.len(), 4);
        let x_test = parsed_req
            .headers
            .iter()
            .find(|(k, _)| k == "X-Test")
            .unwrap();
        assert_eq!(x_test.1, x_test_header);
    }

    #[test]
    fn test_parse_request_with_very_large_body_and_header() {
        let body = random_text(40960);
        let x_test_header = random_text(40960);

        let req_str = format!(
            "POST /orders HTTP/1.1\r\nHost: localhost:5000\r\nContent-Length: {}\r\nX-TEST: {}\r\n\r\n{}",
            body.len(),
            x_test_header,
            body
        );

        let buf_reader = BufReader::new(req_str.as_bytes());
        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.method, "POST");
        assert_eq!(parsed_req.headers.len(), 3);
        assert_eq!(parsed_req.body, body);
        let x_test = parsed_req
            .headers
            .iter()
            .find(|(k, _)| k == "X-TEST")
            .unwrap();

        assert_eq!(x_test.1, x_test_header);
    }
}
