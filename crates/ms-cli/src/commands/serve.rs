//! Health-check HTTP server.

use anyhow::Context;

/// Status code and body for a health-check request.
fn route(method: &tiny_http::Method, url: &str) -> (u16, &'static str) {
    let path = url.split('?').next().unwrap_or_default();
    match (method, path) {
        (tiny_http::Method::Get, "/" | "/health" | "/healthz") => (200, "ok"),
        _ => (404, "not found"),
    }
}

/// Handle `mailsort serve`: answer health checks until the process exits.
pub async fn handle(port: u16) -> anyhow::Result<()> {
    let server = tiny_http::Server::http(("0.0.0.0", port))
        .map_err(|error| anyhow::anyhow!("failed to bind port {port}: {error}"))?;
    eprintln!("Health server listening on :{port}");

    // tiny_http::recv blocks, so the accept loop runs on the blocking pool
    tokio::task::spawn_blocking(move || serve_forever(&server))
        .await
        .context("health server task failed")?
}

fn serve_forever(server: &tiny_http::Server) -> anyhow::Result<()> {
    let content_type = tiny_http::Header::from_bytes("Content-Type", "text/plain; charset=utf-8")
        .map_err(|()| anyhow::anyhow!("invalid content-type header"))?;
    loop {
        let request = server.recv().context("failed to receive request")?;
        let (status, body) = route(request.method(), request.url());
        tracing::debug!(url = request.url(), status, "health check");
        let response = tiny_http::Response::from_string(body)
            .with_status_code(status)
            .with_header(content_type.clone());
        if let Err(error) = request.respond(response) {
            tracing::warn!(%error, "failed to send health response");
        }
    }
}
