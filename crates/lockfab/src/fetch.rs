// Author: Dustin Pilgrim
// License: MIT
//
// Remote wallpaper discovery and download.
//
// The page is scanned for short direct `.jpg` links; one is picked at random.
// Every request carries a throwaway random User-Agent.

use std::collections::BTreeSet;
use std::time::Duration;

use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::IndexedRandom;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use uuid::Uuid;

use lockfab_core::{LockfabError, Result};

use crate::config::ProxyConfig;

static IMAGE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^ ]+?jpg").expect("valid regex"));

/// Longer links are thumbnails/previews with query strings, not the image.
const MAX_URL_LEN: usize = 35;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub trait ImageSource {
    /// Pick one direct image link from the page at `page_url`.
    fn find_image_url(&self, page_url: &str) -> Result<String>;

    /// Download `url` verbatim.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Candidate links in page order of first appearance, deduplicated.
pub fn extract_candidates(page: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    IMAGE_URL_RE
        .find_iter(page)
        .map(|m| m.as_str())
        .filter(|url| url.len() < MAX_URL_LEN && !url.contains("out"))
        .filter(|url| seen.insert(*url))
        .map(str::to_string)
        .collect()
}

pub fn pick_candidate<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> Option<String> {
    candidates.choose(rng).cloned()
}

#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new(proxies: &ProxyConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);

        if let Some(http) = &proxies.http {
            let proxy = reqwest::Proxy::http(http)
                .map_err(|e| LockfabError::Fetch(format!("invalid http proxy {http:?}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(https) = &proxies.https {
            let proxy = reqwest::Proxy::https(https)
                .map_err(|e| LockfabError::Fetch(format!("invalid https proxy {https:?}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| LockfabError::Fetch(format!("build http client: {e}")))?;

        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        self.client
            .get(url)
            .header(USER_AGENT, Uuid::new_v4().to_string())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| LockfabError::Fetch(format!("GET {url}: {e}")))
    }
}

impl ImageSource for HttpImageSource {
    fn find_image_url(&self, page_url: &str) -> Result<String> {
        let page = self
            .get(page_url)?
            .text()
            .map_err(|e| LockfabError::Fetch(format!("read {page_url}: {e}")))?;

        let candidates = extract_candidates(&page);
        pick_candidate(&candidates, &mut rand::rng())
            .ok_or_else(|| LockfabError::Fetch(format!("no image links found on {page_url}")))
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .get(url)?
            .bytes()
            .map_err(|e| LockfabError::Fetch(format!("read {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const PAGE: &str = r#"
        <a href="https://i.redd.it/abc123.jpg">one</a>
        <img src="https://i.redd.it/abc123.jpg">
        <img src="http://i.imgur.com/Xy9.jpg">
        <img src="https://preview.redd.it/very/long/path/to/a/thumbnail.jpg">
        <img src="https://i.redd.it/layout1.jpg">
        <img src="https://i.redd.it/q.png">
    "#;

    #[test]
    fn extracts_short_unique_jpg_links() {
        assert_eq!(
            extract_candidates(PAGE),
            vec![
                "https://i.redd.it/abc123.jpg".to_string(),
                "http://i.imgur.com/Xy9.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn no_links_no_candidates() {
        assert!(extract_candidates("<html><body>nothing</body></html>").is_empty());
        assert_eq!(pick_candidate(&[], &mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn pick_is_always_a_candidate_and_reaches_each() {
        let candidates = extract_candidates(PAGE);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = BTreeSet::new();

        for _ in 0..200 {
            let pick = pick_candidate(&candidates, &mut rng).unwrap();
            assert!(candidates.contains(&pick));
            seen.insert(pick);
        }
        assert_eq!(seen.len(), candidates.len());
    }

    #[test]
    fn bad_proxy_is_a_fetch_error() {
        let proxies = ProxyConfig {
            http: Some("::not a url::".into()),
            https: None,
        };
        assert!(matches!(
            HttpImageSource::new(&proxies),
            Err(LockfabError::Fetch(_))
        ));
    }
}
