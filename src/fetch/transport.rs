use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, redirect};
use std::collections::BTreeMap;
use std::time::Duration;

pub const REDIRECT_LIMIT: usize = 10;

/// What a transport hands back for a 2xx response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub final_url: String,
    pub body: String,
}

/// One way of turning a URL into a response.
///
/// Implementations must not carry cookies or pooled connections from one call
/// to the next, and must treat non-2xx statuses as errors.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;
    async fn get(&self, url: &str, headers: HeaderMap, timeout: Duration) -> Result<RawResponse>;
}

fn base_builder(timeout: Duration) -> ClientBuilder {
    Client::builder()
        .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .pool_max_idle_per_host(0)
}

async fn send(client: Client, url: &str, headers: HeaderMap) -> Result<RawResponse> {
    let response = client.get(url).headers(headers).send().await?;
    let response = response.error_for_status()?;

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    let body = response.text().await?;
    log::debug!("{} -> {} ({} bytes)", url, status_code, body.len());

    Ok(RawResponse {
        status_code,
        headers,
        final_url,
        body,
    })
}

/// Default client: negotiates HTTP/2 where offered. A fresh client per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTransport;

#[async_trait]
impl Transport for BrowserTransport {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn get(&self, url: &str, headers: HeaderMap, timeout: Duration) -> Result<RawResponse> {
        let client = base_builder(timeout).build()?;
        send(client, url, headers).await
    }
}

/// Alternate client stack: HTTP/1.1 only, Nagle disabled, separate connect timeout.
/// Presents a different connection fingerprint from [`BrowserTransport`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Http1Transport;

#[async_trait]
impl Transport for Http1Transport {
    fn name(&self) -> &'static str {
        "http1"
    }

    async fn get(&self, url: &str, headers: HeaderMap, timeout: Duration) -> Result<RawResponse> {
        let client = base_builder(timeout)
            .http1_only()
            .http1_title_case_headers()
            .tcp_nodelay(true)
            .connect_timeout(timeout)
            .build()?;
        send(client, url, headers).await
    }
}
