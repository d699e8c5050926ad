//! Exposition Server
//!
//! Serves the current registry state as OpenMetrics text on `/metrics`.
//! OpenMetrics (rather than the classic text format) is required for
//! exemplars to appear in the scrape output.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use prometheus_client::encoding::text::encode;
use prometheus_client::registry::Registry;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::Result;

const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Encode the registry's current state as OpenMetrics text.
pub fn render(registry: &Registry) -> Result<String> {
    let mut body = String::new();
    encode(&mut body, registry)?;
    Ok(body)
}

/// Bind `addr` and serve `/metrics` and `/healthz` until process exit.
///
/// Runs concurrently with the tick driver; the registry's primitives are
/// internally synchronized, so scrapes never observe a partial mutation.
/// Bind and accept errors are fatal, per-request encode errors are answered
/// with a 500 and otherwise ignored.
pub async fn run(addr: &str, registry: Arc<Registry>) -> Result<()> {
    let addr: SocketAddr = addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Exposition server listening on {}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let registry = registry.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let registry = registry.clone();
                async move { handle(req, &registry) }
            });
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                error!("Exposition connection error: {}", e);
            }
        });
    }
}

fn handle(
    req: Request<hyper::body::Incoming>,
    registry: &Registry,
) -> std::result::Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let response = match req.uri().path() {
        "/metrics" => match render(registry) {
            Ok(body) => Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", OPENMETRICS_CONTENT_TYPE)
                .body(Full::new(Bytes::from(body)))
                .unwrap(),
            Err(e) => {
                error!("Failed to encode exposition output: {}", e);
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Full::new(Bytes::from("encode error")))
                    .unwrap()
            }
        },
        "/healthz" => Response::builder()
            .status(StatusCode::OK)
            .body(Full::new(Bytes::from("ok")))
            .unwrap(),
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("not found")))
            .unwrap(),
    };
    Ok(response)
}

// =============================================================================
// Tests
// =============================================================================
