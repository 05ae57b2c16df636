use crate::errors;
use crate::http::{parse_request, Request, Response};
use crate::threadpool::ThreadPool;
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

/// How long a connection may stay silent before the server gives up on it
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Turn an HTTP status code into its reason phrase
pub fn code_to_string(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// This is the main server.
///
/// It listens for incomming connections on a TCP socket, parses the requests and dispatches them
/// to a handler. Whatever the handler produces is then converted in an HTTP response and sent
/// back to the client.
pub struct HttpServer {
    listener: TcpListener,
    read_timeout: Duration,
}

impl HttpServer {
    /// Create a new server listening on the given address
    pub fn new(addr: &str) -> errors::Result<Self> {
        Ok(HttpServer {
            listener: TcpListener::bind(addr)?,
            read_timeout: READ_TIMEOUT,
        })
    }

    /// Change how long a connection may stay silent before it is answered with a 400
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Address the server is actually bound to. Useful when binding to port 0.
    pub fn local_addr(&self) -> errors::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Start the server
    ///
    /// Calls the handler with the incoming requests, on a pool of `workers` threads.
    ///
    /// This function is blocking, with no real way of stopping it (except the socket being
    /// forcefully closed by the OS or the program being killed)
    pub fn serve<F>(&self, workers: usize, handler: F)
    where
        F: Fn(Request) -> Response + Send + Sync + 'static + Clone,
    {
        let threadpool = ThreadPool::new(workers);
        for stream in self.listener.incoming() {
            match stream {
                Ok(mut stream) => {
                    let handler = handler.clone();
                    let read_timeout = self.read_timeout;
                    threadpool.execute(move || handle_stream(&mut stream, read_timeout, &handler))
                }
                Err(err) => tracing::error!(%err, "failed to accept connection"),
            }
        }
    }

    /// Utility function for one-shot servers.
    ///
    /// This is mostly for testing, it listens to a single connection, processes the
    /// request and exit.
    pub fn serve_once<F>(&self, handler: F) -> errors::Result<()>
    where
        F: Fn(Request) -> Response,
    {
        let (mut stream, _) = self.listener.accept()?;
        handle_stream(&mut stream, self.read_timeout, &handler);
        Ok(())
    }
}

/// Parse an HTTP request from a TCP stream, calls the handler and write back the answer
///
/// A client that stays silent longer than `read_timeout` gets a 400, so it can't hold a worker.
fn handle_stream<F>(mut stream: &mut TcpStream, read_timeout: Duration, handler: F)
where
    F: Fn(Request) -> Response,
{
    if let Err(err) = stream.set_read_timeout(Some(read_timeout)) {
        tracing::error!(%err, "failed to set read timeout");
        return;
    }
    let buf_reader = BufReader::new(&mut stream);
    match parse_request(buf_reader) {
        Ok(req) => respond(stream, handler(req)),
        Err(err) => {
            tracing::warn!(%err, "unreadable request");
            respond(stream, Response::bad_request())
        }
    }
}

/// Serialize a response to HTTP/1.1. A 204 carries neither body nor Content-Length.
fn serialize_response(resp: &Response) -> String {
    let code = resp.status.unwrap_or(500);
    let content_length = if code == 204 {
        String::new()
    } else {
        format!("Content-Length: {}\r\n", resp.body.len())
    };
    let body = if code == 204 { "" } else { resp.body.as_str() };

    format!(
        "HTTP/1.1 {} {}\r\n{}{}\r\n{}",
        code,
        code_to_string(code),
        content_length,
        resp.headers
            .iter()
            .map(|(k, v)| format!["{}: {}\r\n", k, v])
            .collect::<Vec<_>>()
            .join(""),
        body
    )
}

/// Writes an HTTP response to a stream
fn respond(stream: &mut TcpStream, resp: Response) {
    if let Err(err) = stream.write_all(serialize_response(&resp).as_bytes()) {
        tracing::error!(%err, "failed to respond");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::parse_response;
    use std::io::Read;

    #[test]
    fn test_serialize_json_response() {
        let text = serialize_response(&Response::json(201, "{}".to_string()));
        assert_eq!(
            text,
            "HTTP/1.1 201 Created\r\nContent-Length: 2\r\nContent-Type: application/json\r\n\r\n{}"
        );
    }

    #[test]
    fn test_no_content_has_no_content_length() {
        let text = serialize_response(&Response::no_content());
        assert_eq!(text, "HTTP/1.1 204 No Content\r\n\r\n");
    }

    #[test]
    fn test_silent_client_times_out() {
        let server = HttpServer::new("127.0.0.1:0")
            .expect("Failed to bind server")
            .with_read_timeout(Duration::from_millis(50));
        let addr = server.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            server
                .serve_once(|_| Response::no_content())
                .expect("Failed to serve")
        });

        // Connect without sending anything
        let mut stream = TcpStream::connect(addr).expect("Failed to connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let response = parse_response(BufReader::new(&mut stream)).unwrap();
        assert_eq!(response.status, Some(400));

        let mut rest = Vec::new();
        stream.read_to_end(&mut rest).unwrap();
        assert!(rest.is_empty());

        handle.join().unwrap();
    }
}
