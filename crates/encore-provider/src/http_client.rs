use std::time::Duration;

use reqwest::Client;

/// Build the shared HTTP client for provider calls
///
/// Only connection setup is bounded here; each request carries its own
/// overall timeout so uploads can wait longer than chat calls.
pub fn http_client() -> anyhow::Result<Client> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build provider HTTP client: {e}"))
}
