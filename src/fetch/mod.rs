//! Page fetching under anti-bot conditions.
//!
//! A fetch walks a fixed chain of three strategies and stops at the first
//! success:
//!
//! 1. `primary`: browser transport, full randomized browser identity
//! 2. `secondary`: HTTP/1.1 transport, a freshly drawn browser identity
//! 3. `tertiary`: browser transport, User-Agent and Accept only
//!
//! Each attempt builds its own client, so no cookies or connections are shared
//! between attempts or URLs. A non-2xx status counts as a failure like any other.

pub mod identity;
pub mod transport;

use crate::error::{Error, Result};
use identity::{DelayRange, IdentityPool, browser_headers, draw_delay, minimal_headers};
use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use transport::{BrowserTransport, Http1Transport, RawResponse, Transport};

/// Which stage of the fallback chain produced a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    Primary,
    Secondary,
    Tertiary,
}

impl FetchMethod {
    pub const ALL: [FetchMethod; 3] = [Self::Primary, Self::Secondary, Self::Tertiary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
        }
    }
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully fetched page. Failures surface as [`Error::FetchExhausted`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    pub html: String,
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub resolved_url: String,
    pub method: FetchMethod,
}

impl FetchedPage {
    fn from_raw(raw: RawResponse, method: FetchMethod) -> Self {
        Self {
            html: raw.body,
            status_code: raw.status_code,
            headers: raw.headers,
            resolved_url: raw.final_url,
            method,
        }
    }
}

/// Prepend `https://` when the URL carries no http(s) scheme.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

pub struct Fetcher {
    primary: Arc<dyn Transport>,
    secondary: Arc<dyn Transport>,
    identities: IdentityPool,
    delay: DelayRange,
    rng: Mutex<StdRng>,
}

impl Default for Fetcher {
    fn default() -> Self {
        FetcherBuilder::default().build()
    }
}

impl Fetcher {
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::default()
    }

    fn draw<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    /// Fetch `url`, walking primary → secondary → tertiary until one succeeds.
    /// `timeout` bounds each attempt separately.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage> {
        let url = normalize_url(url);

        let pause = self.draw(|rng| draw_delay(rng, self.delay));
        if !pause.is_zero() {
            log::debug!("Waiting {}ms before {}", pause.as_millis(), url);
            tokio::time::sleep(pause).await;
        }

        let mut causes = Vec::with_capacity(FetchMethod::ALL.len());
        for method in FetchMethod::ALL {
            let (transport, headers) = self.plan(method);
            match transport.get(&url, headers, timeout).await {
                Ok(raw) => {
                    log::info!("Fetched {} via {} ({})", url, method, transport.name());
                    return Ok(FetchedPage::from_raw(raw, method));
                }
                Err(e) => {
                    log::warn!("{} attempt failed for {}: {}", method, url, e);
                    causes.push(e.to_string());
                }
            }
        }

        let mut causes = causes.into_iter();
        Err(Error::FetchExhausted {
            url,
            primary: causes.next().unwrap_or_default(),
            secondary: causes.next().unwrap_or_default(),
            tertiary: causes.next().unwrap_or_default(),
        })
    }

    fn plan(&self, method: FetchMethod) -> (&Arc<dyn Transport>, HeaderMap) {
        match method {
            FetchMethod::Primary => (
                &self.primary,
                self.draw(|rng| browser_headers(rng, &self.identities)),
            ),
            FetchMethod::Secondary => (
                &self.secondary,
                self.draw(|rng| browser_headers(rng, &self.identities)),
            ),
            FetchMethod::Tertiary => (
                &self.primary,
                self.draw(|rng| minimal_headers(rng, &self.identities)),
            ),
        }
    }
}

pub struct FetcherBuilder {
    primary: Arc<dyn Transport>,
    secondary: Arc<dyn Transport>,
    identities: IdentityPool,
    delay: DelayRange,
    seed: Option<u64>,
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self {
            primary: Arc::new(BrowserTransport),
            secondary: Arc::new(Http1Transport),
            identities: IdentityPool::default(),
            delay: DelayRange::default(),
            seed: None,
        }
    }
}

impl FetcherBuilder {
    /// Transport used by the primary and tertiary stages.
    pub fn primary(mut self, transport: Arc<dyn Transport>) -> Self {
        self.primary = transport;
        self
    }

    pub fn secondary(mut self, transport: Arc<dyn Transport>) -> Self {
        self.secondary = transport;
        self
    }

    pub fn identities(mut self, identities: IdentityPool) -> Self {
        self.identities = identities;
        self
    }

    pub fn delay(mut self, delay: DelayRange) -> Self {
        self.delay = delay;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Fetcher {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Fetcher {
            primary: self.primary,
            secondary: self.secondary,
            identities: self.identities,
            delay: self.delay,
            rng: Mutex::new(rng),
        }
    }
}
