//! Request identities: the fixed header pools and the pure functions that draw
//! randomized header sets and delays from them.
//!
//! Nothing here touches global state. Every draw takes the random source as a
//! parameter, so a seeded `StdRng` reproduces the exact same identities.

use rand::Rng;
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

pub const DEFAULT_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    // Chrome on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    // Safari on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Safari/605.1.15",
    // Edge on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
    // Chrome on Linux
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

pub const DEFAULT_ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-US,en;q=0.9,es;q=0.8",
    "en-US,en;q=0.9,fr;q=0.8",
];

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const MINIMAL_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

const BASE_BROWSER_HEADERS: &[(&str, &str)] = &[
    ("accept", BROWSER_ACCEPT),
    ("accept-encoding", "gzip, deflate, br"),
    ("cache-control", "max-age=0"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
    (
        "sec-ch-ua",
        "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
];

/// Immutable pools an identity is drawn from.
#[derive(Debug, Clone)]
pub struct IdentityPool {
    pub user_agents: Vec<String>,
    pub accept_languages: Vec<String>,
    pub referer: String,
    /// Probability that `DNT: 1` is sent.
    pub dnt_probability: f64,
    /// Probability that the search-engine referer is sent.
    pub referer_probability: f64,
}

impl Default for IdentityPool {
    fn default() -> Self {
        Self {
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            accept_languages: DEFAULT_ACCEPT_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            referer: "https://www.google.com/".to_string(),
            dnt_probability: 0.5,
            referer_probability: 0.3,
        }
    }
}

/// Inclusive range the pre-request delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn none() -> Self {
        Self::new(0, 0)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::new(250, 1000)
    }
}

/// Draw a delay uniformly from `range`. A reversed range collapses to `min_ms`.
pub fn draw_delay<R: Rng + ?Sized>(rng: &mut R, range: DelayRange) -> Duration {
    if range.max_ms <= range.min_ms {
        return Duration::from_millis(range.min_ms);
    }
    Duration::from_millis(rng.gen_range(range.min_ms..=range.max_ms))
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &'a [String], fallback: &'a str) -> &'a str {
    pool.choose(rng).map(String::as_str).unwrap_or(fallback)
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(val) = HeaderValue::from_str(value) {
        headers.insert(HeaderName::from_static(name), val);
    }
}

/// Clamp to a valid probability; NaN counts as never.
fn chance(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Full browser-like header set with a rotated User-Agent and probabilistic extras.
pub fn browser_headers<R: Rng + ?Sized>(rng: &mut R, pool: &IdentityPool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for &(name, value) in BASE_BROWSER_HEADERS {
        insert(&mut headers, name, value);
    }

    insert(
        &mut headers,
        "user-agent",
        pick(rng, &pool.user_agents, DEFAULT_USER_AGENTS[0]),
    );

    if rng.gen_bool(chance(pool.dnt_probability)) {
        insert(&mut headers, "dnt", "1");
    }

    insert(
        &mut headers,
        "accept-language",
        pick(rng, &pool.accept_languages, DEFAULT_ACCEPT_LANGUAGES[0]),
    );

    if rng.gen_bool(chance(pool.referer_probability)) {
        insert(&mut headers, "referer", &pool.referer);
    }

    headers
}

/// Bare identity: User-Agent and Accept only.
pub fn minimal_headers<R: Rng + ?Sized>(rng: &mut R, pool: &IdentityPool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(
        &mut headers,
        "user-agent",
        pick(rng, &pool.user_agents, DEFAULT_USER_AGENTS[0]),
    );
    insert(&mut headers, "accept", MINIMAL_ACCEPT);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn default_pool_has_enough_user_agents() {
        assert!(IdentityPool::default().user_agents.len() >= 10);
    }

    #[test]
    fn browser_headers_carry_fetch_metadata() {
        let mut rng = StdRng::seed_from_u64(7);
        let headers = browser_headers(&mut rng, &IdentityPool::default());
        assert_eq!(header(&headers, "sec-fetch-mode"), Some("navigate"));
        assert_eq!(header(&headers, "sec-fetch-dest"), Some("document"));
        assert!(headers.contains_key("accept-encoding"));
        let ua = header(&headers, "user-agent").unwrap();
        assert!(DEFAULT_USER_AGENTS.contains(&ua));
        let lang = header(&headers, "accept-language").unwrap();
        assert!(DEFAULT_ACCEPT_LANGUAGES.contains(&lang));
    }

    #[test]
    fn same_seed_same_identity() {
        let pool = IdentityPool::default();
        let a = browser_headers(&mut StdRng::seed_from_u64(42), &pool);
        let b = browser_headers(&mut StdRng::seed_from_u64(42), &pool);
        assert_eq!(a, b);
    }

    #[test]
    fn extras_follow_probabilities() {
        let mut pool = IdentityPool::default();
        pool.dnt_probability = 1.0;
        pool.referer_probability = 0.0;
        let headers = browser_headers(&mut StdRng::seed_from_u64(1), &pool);
        assert_eq!(header(&headers, "dnt"), Some("1"));
        assert!(!headers.contains_key("referer"));

        pool.dnt_probability = 0.0;
        pool.referer_probability = 1.0;
        let headers = browser_headers(&mut StdRng::seed_from_u64(1), &pool);
        assert!(!headers.contains_key("dnt"));
        assert_eq!(header(&headers, "referer"), Some("https://www.google.com/"));
    }

    #[test]
    fn invalid_probabilities_never_panic() {
        let mut pool = IdentityPool::default();
        pool.dnt_probability = f64::NAN;
        pool.referer_probability = 7.5;
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let headers = browser_headers(&mut rng, &pool);
            assert!(!headers.contains_key("dnt"));
            assert!(headers.contains_key("referer"));
        }
    }

    #[test]
    fn user_agents_rotate() {
        let pool = IdentityPool::default();
        let mut rng = StdRng::seed_from_u64(3);
        let seen: std::collections::HashSet<String> = (0..50)
            .map(|_| {
                header(&browser_headers(&mut rng, &pool), "user-agent")
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert!(seen.len() > 1);
    }

    #[test]
    fn minimal_has_only_user_agent_and_accept() {
        let headers = minimal_headers(&mut StdRng::seed_from_u64(9), &IdentityPool::default());
        assert_eq!(headers.len(), 2);
        assert!(headers.contains_key("user-agent"));
        assert!(headers.contains_key("accept"));
    }

    #[test]
    fn delay_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let range = DelayRange::default();
        for _ in 0..100 {
            let ms = draw_delay(&mut rng, range).as_millis() as u64;
            assert!((250..=1000).contains(&ms), "delay {} out of range", ms);
        }
        assert_eq!(draw_delay(&mut rng, DelayRange::none()), Duration::ZERO);
    }
}
