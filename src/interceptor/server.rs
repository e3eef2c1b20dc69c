//! Plain-HTTP forward proxy loop around the response interceptor.
//!
//! This is the transport adapter that delivers exchanges to the filter:
//!
//! 1. Accept a client connection
//! 2. Forward the absolute-form request to the origin server
//! 3. Buffer the origin's response body (it must be hashed anyway)
//! 4. Run the interceptor over the buffered response
//! 5. Send the (possibly rewritten) response back to the client
//!
//! TLS termination is owned by whatever sits in front of this filter;
//! CONNECT requests are answered with `501 Not Implemented`. Each connection
//! is handled in its own Tokio task, so concurrent exchanges are independent
//! units of work sharing only the immutable catalog.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::{TokioExecutor, TokioIo};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::ServerError;
use super::rewrite::{InterceptedResponse, ResponseInterceptor};

/// Hop-by-hop headers that must not be forwarded after buffering.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

/// The proxy server that feeds exchanges to the interceptor.
pub struct ProxyServer {
    bind_address: String,
    interceptor: Arc<ResponseInterceptor>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
    /// Upstream client shared across connections.
    client: Client<HttpConnector, Incoming>,
}

impl ProxyServer {
    /// Create a new proxy server.
    pub fn new(
        bind_address: String,
        interceptor: Arc<ResponseInterceptor>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();

        Self {
            bind_address,
            interceptor,
            shutdown_rx,
            client,
        }
    }

    /// Run the accept loop until the shutdown signal fires.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.bind_address).await?;
        let local_addr = listener.local_addr()?;

        info!(address = %local_addr, "Proxy listening");

        let mut shutdown_rx = self.shutdown_rx.clone();
        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => {
                            debug!(peer = %peer, "Accepted connection");
                            self.spawn_connection_handler(stream);
                        }
                        Err(e) => {
                            warn!("Failed to accept connection: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Proxy shutting down");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Spawn a task to handle a single connection.
    fn spawn_connection_handler(&self, stream: tokio::net::TcpStream) {
        let interceptor = self.interceptor.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, interceptor, client).await {
                // Connection resets are common; don't log them as errors
                let err_str = e.to_string();
                if err_str.contains("connection reset") || err_str.contains("broken pipe") {
                    debug!("Connection ended: {}", e);
                } else {
                    warn!("Connection error: {}", e);
                }
            }
        });
    }
}

/// Handle a single client connection.
async fn handle_connection(
    stream: tokio::net::TcpStream,
    interceptor: Arc<ResponseInterceptor>,
    client: Client<HttpConnector, Incoming>,
) -> Result<(), ServerError> {
    let io = TokioIo::new(stream);

    let service = service_fn(move |req: Request<Incoming>| {
        let interceptor = interceptor.clone();
        let client = client.clone();

        async move { proxy_request(req, interceptor, client).await }
    });

    http1::Builder::new()
        .preserve_header_case(true)
        .serve_connection(io, service)
        .await
        .map_err(ServerError::from)
}

/// Process a single proxy exchange.
///
/// Errors returned here are per-exchange: they are converted into plain
/// status responses below rather than tearing down the connection.
async fn proxy_request(
    req: Request<Incoming>,
    interceptor: Arc<ResponseInterceptor>,
    client: Client<HttpConnector, Incoming>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, ServerError> {
    if req.method() == Method::CONNECT {
        // TLS termination belongs to the surrounding proxy deployment.
        return Ok(status_response(
            StatusCode::NOT_IMPLEMENTED,
            "CONNECT tunneling is not supported by this filter",
        ));
    }

    let request_uri = req.uri().clone();
    if request_uri.host().is_none() {
        debug!(uri = %request_uri, "Rejecting non-absolute proxy request");
        return Ok(status_response(
            StatusCode::BAD_REQUEST,
            "Proxy requests must use absolute-form URIs",
        ));
    }

    debug!(method = %req.method(), uri = %request_uri, "Forwarding request");

    let upstream_response = match client.request(req).await {
        Ok(response) => response,
        Err(e) => {
            warn!(uri = %request_uri, error = %e, "Upstream request failed");
            return Ok(status_response(
                StatusCode::BAD_GATEWAY,
                "Upstream request failed",
            ));
        }
    };

    // Buffer the body: the interceptor hashes it, and a buffered copy is
    // what gets passed through unchanged on the dominant path.
    let (parts, body) = upstream_response.into_parts();
    let body_bytes = body.collect().await?.to_bytes();

    let intercepted = InterceptedResponse {
        request_uri,
        status: parts.status,
        headers: parts.headers,
        body: body_bytes,
    };

    let result = interceptor.on_response_receive(intercepted).await;

    Ok(to_client_response(result))
}

/// Rebuild a hyper response from the interceptor's output.
///
/// Hop-by-hop headers (and content-length, which hyper recomputes for the
/// buffered body) are stripped; everything else is forwarded as-is.
fn to_client_response(response: InterceptedResponse) -> Response<BoxBody<Bytes, hyper::Error>> {
    let mut builder = Response::builder().status(response.status);

    if let Some(headers) = builder.headers_mut() {
        for (name, value) in response.headers.iter() {
            if !is_hop_by_hop(name.as_str()) {
                headers.insert(name.clone(), value.clone());
            }
        }
    }

    builder
        .body(full_body(response.body))
        .unwrap_or_else(|_| status_response(StatusCode::BAD_GATEWAY, "Invalid upstream response"))
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| name.eq_ignore_ascii_case(h))
}

/// Create a response body with content.
fn full_body(content: Bytes) -> BoxBody<Bytes, hyper::Error> {
    Full::new(content).map_err(|never| match never {}).boxed()
}

/// Create a plain-text status response.
fn status_response(status: StatusCode, message: &str) -> Response<BoxBody<Bytes, hyper::Error>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(full_body(Bytes::from(message.to_string())))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue, Uri};

    #[test]
    fn test_hop_by_hop_detection() {
        assert!(is_hop_by_hop("Transfer-Encoding"));
        assert!(is_hop_by_hop("connection"));
        assert!(is_hop_by_hop("Content-Length"));
        assert!(!is_hop_by_hop("content-type"));
        assert!(!is_hop_by_hop("location"));
    }

    #[test]
    fn test_to_client_response_strips_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/javascript"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("connection", HeaderValue::from_static("keep-alive"));

        let response = to_client_response(InterceptedResponse {
            request_uri: Uri::from_static("http://cdn.example.com/lib.min.js"),
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(b"var x=1;"),
        });

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("content-type"));
        assert!(!response.headers().contains_key("transfer-encoding"));
        assert!(!response.headers().contains_key("connection"));
    }

    #[test]
    fn test_status_response() {
        let response = status_response(StatusCode::NOT_IMPLEMENTED, "nope");
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
