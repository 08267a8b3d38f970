use std::collections::BTreeSet;

use serde_json::Value;
use wreq::{Client, header};

use crate::error::{Result, SearchError};
use crate::query::{certificate_query, host_query};
use crate::types::{FINGERPRINT_FIELDS, IP_FIELDS, SearchRequest, SearchResponse, first_present};

pub const BASE_URL: &str = "https://search.censys.io/api/v2";
pub const USER_AGENT: &str = "CloudFlair (+https://github.com/christophetd/CloudFlair)";

const CERTIFICATES_PATH: &str = "/certificates/search";
const HOSTS_PATH: &str = "/hosts/search";
const PER_PAGE: u32 = 100;

/// Certificate pages fetched when the caller doesn't choose
pub const DEFAULT_CERTIFICATE_PAGES: usize = 2;

/// Configuration for CensysClient
#[derive(Debug, Clone)]
pub struct CensysConfig {
    /// API root; a trailing slash is dropped
    pub base_url: String,
    pub user_agent: String,
    /// Hits requested per page
    pub per_page: u32,
    /// Proxy URL for all API requests (http, https or socks5)
    pub proxy: Option<String>,
}

impl Default for CensysConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            per_page: PER_PAGE,
            proxy: None,
        }
    }
}

/// Authenticated client for the Censys certificate and host search endpoints.
///
/// Requests are issued one at a time; each call awaits its response before
/// sending the next.
pub struct CensysClient {
    http_client: Client,
    api_key: String,
    config: CensysConfig,
}

impl CensysClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, CensysConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, mut config: CensysConfig) -> Result<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let mut http_builder = Client::builder().gzip(true);

        if let Some(ref proxy_url) = config.proxy {
            http_builder = http_builder.proxy(wreq::Proxy::all(proxy_url.as_str())?);
        }

        Ok(Self {
            http_client: http_builder.build()?,
            api_key: api_key.into(),
            config,
        })
    }

    /// Fingerprints of certificates for `domain`, over the default page count
    pub async fn fetch_certificates(&self, domain: &str) -> Result<BTreeSet<String>> {
        self.fetch_certificate_fingerprints(domain, DEFAULT_CERTIFICATE_PAGES)
            .await
    }

    /// Fingerprints of valid certificates naming `domain`, excluding CDN reissues.
    ///
    /// Follows the result cursor for at most `max_pages` requests, stopping
    /// early once the server stops returning one.
    pub async fn fetch_certificate_fingerprints(
        &self,
        domain: &str,
        max_pages: usize,
    ) -> Result<BTreeSet<String>> {
        let query = certificate_query(domain);
        let mut fingerprints = BTreeSet::new();
        let mut cursor: Option<String> = None;

        for page in 1..=max_pages {
            tracing::debug!("Certificate search page {}/{} for {}", page, max_pages, domain);

            let request = SearchRequest {
                q: query.clone(),
                per_page: self.config.per_page,
                cursor: cursor.take(),
            };
            let response = self.search(CERTIFICATES_PATH, &request).await?;

            collect_field(response.hits(), FINGERPRINT_FIELDS, &mut fingerprints);

            cursor = response.next_cursor();
            if cursor.is_none() {
                break;
            }
        }

        tracing::info!(
            "Found {} certificate fingerprint(s) for {}",
            fingerprints.len(),
            domain
        );
        Ok(fingerprints)
    }

    /// IPs of hosts presenting any of `fingerprints`.
    ///
    /// Only the first page of hosts is fetched.
    pub async fn fetch_hosts(&self, fingerprints: &BTreeSet<String>) -> Result<BTreeSet<String>> {
        let mut ips = BTreeSet::new();
        if fingerprints.is_empty() {
            tracing::debug!("No fingerprints given, skipping host search");
            return Ok(ips);
        }

        let request = SearchRequest {
            q: host_query(fingerprints),
            per_page: self.config.per_page,
            cursor: None,
        };
        let response = self.search(HOSTS_PATH, &request).await?;

        collect_field(response.hits(), IP_FIELDS, &mut ips);

        tracing::info!(
            "Found {} host(s) presenting {} certificate(s)",
            ips.len(),
            fingerprints.len()
        );
        Ok(ips)
    }

    /// POST one search request and classify the response
    async fn search(&self, path: &str, request: &SearchRequest) -> Result<SearchResponse> {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::USER_AGENT, &self.config.user_agent)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(request)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned {}", url, status);
            return Err(SearchError::from_status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Add the first present value of `fields` from each hit into `out`
fn collect_field(hits: &[Value], fields: &[&str], out: &mut BTreeSet<String>) {
    let mut skipped = 0;
    for hit in hits {
        match first_present(hit, fields) {
            Some(value) => {
                out.insert(value.to_string());
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!("Skipped {} hit(s) without {:?}", skipped, fields);
    }
}
