//! HTTP server.
//!
//! A `tiny_http` server in front of the pure [`router::route`] function:
//!
//! - Binds the configured interface and port (retrying the next ports when busy)
//! - Reads each request's body and hands it to the router on the rayon pool
//! - Writes the resulting [`Reply`] back
//! - Shuts down gracefully on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐        ┌──────────────────┐
//! │   Main Thread   │ spawn  │   Rayon Worker   │
//! │  (accept loop)  │ ─────▶ │ route() → Reply  │
//! └─────────────────┘        └────────┬─────────┘
//!                                     │
//!                     ┌───────────────┼───────────────┐
//!                     ▼               ▼               ▼
//!               RenderCache     ContentSource   SectionRegistry
//! ```

pub mod reply;
pub mod router;

pub use reply::Reply;
pub use router::{App, route};

use crate::log;
use anyhow::{Context, Result, anyhow};
use std::{io::Read, net::SocketAddr, sync::Arc};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Largest request body read; the webhook and forms are far smaller.
const MAX_BODY_BYTES: u64 = 1 << 20;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the server. Blocks until Ctrl+C is received.
pub fn serve_site(app: App) -> Result<()> {
    let interface: std::net::IpAddr = app
        .config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", app.config.serve.interface))?;
    let base_port = app.config.serve.port;

    let (server, addr) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    let app = Arc::new(app);
    for request in server.incoming_requests() {
        let app = Arc::clone(&app);
        rayon::spawn(move || {
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// Read the request, route it and send the reply.
fn handle_request(mut request: Request, app: &App) -> Result<()> {
    let mut body = String::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)
        .context("Failed to read request body")?;

    let reply = route(app, request.method(), request.url(), &body);
    if reply.status >= 500 {
        log!("serve"; "{} {} -> {}", request.method(), request.url(), reply.status);
    }
    request.respond(into_response(reply)?)?;
    Ok(())
}

/// Map a [`Reply`] onto a `tiny_http` response.
fn into_response(reply: Reply) -> Result<Response<std::io::Cursor<Vec<u8>>>> {
    let mut response = Response::from_string(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header("Content-Type", reply.content_type)?);
    for (name, value) in &reply.headers {
        response.add_header(header(name, value)?);
    }
    Ok(response)
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|()| anyhow!("invalid header `{name}: {value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_carries_headers() {
        let reply = Reply::html("<p>x</p>").with_header("Vary", "Accept-Encoding");
        let response = into_response(reply).unwrap();

        assert_eq!(response.status_code(), StatusCode(200));
        let headers: Vec<String> = response
            .headers()
            .iter()
            .map(|h| format!("{}: {}", h.field, h.value))
            .collect();
        assert!(headers.contains(&"Content-Type: text/html; charset=utf-8".to_string()));
        assert!(headers.contains(&"Vary: Accept-Encoding".to_string()));
    }

    #[test]
    fn test_into_response_status() {
        let response = into_response(Reply::not_found()).unwrap();
        assert_eq!(response.status_code(), StatusCode(404));
    }

    #[test]
    fn test_header_rejects_non_ascii() {
        assert!(header("X-Title", "Strategi Pertumbuhan").is_ok());
        assert!(header("X-Title", "café").is_err());
    }
}
