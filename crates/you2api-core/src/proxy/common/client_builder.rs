use std::time::Duration;

/// Build HTTP client with optional upstream proxy and timeout.
///
/// `timeout` of `None` leaves the total request time unbounded, which the
/// streaming search call relies on.
pub fn build_http_client(
    upstream_proxy: Option<&str>,
    timeout: Option<Duration>,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .tcp_nodelay(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(url) = upstream_proxy.map(str::trim).filter(|u| !u.is_empty()) {
        builder = builder.proxy(reqwest::Proxy::all(url)?);
        tracing::info!("[HTTP-Client] Routing upstream traffic through proxy");
    }

    builder.build()
}
