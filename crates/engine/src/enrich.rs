//! Enrichment clients — best-effort callers for the two external providers.
//!
//! Both providers are optional: a missing API key or endpoint URL disables
//! the corresponding lookup entirely. Failures never cross this module's
//! boundary as errors; a non-200 status or a transport/parse problem comes
//! back as an embedded JSON error object instead, and only successful
//! payloads are written to the cache (so errors are retried on the next
//! request).

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};

use explorer_common::config::AppConfig;
use explorer_common::types::AddressRecord;

use crate::cache::{EnrichmentCache, EnrichmentKind};

/// Instruction sent to the classification provider ahead of the context.
const CLASSIFY_PROMPT: &str = "Classify the following context into categories: \
    Scam, Drugs, Ransomware, Laundering, Fraud, Other. \
    Explain briefly and give confidence (0-1).";

/// One configured provider endpoint.
#[derive(Debug, Clone)]
struct ProviderEndpoint {
    api_key: String,
    url: String,
}

/// Best-effort enrichment service over the two external providers.
///
/// Holds a single shared [`reqwest::Client`]; per-provider timeouts are
/// applied on each request.
#[derive(Debug, Clone)]
pub struct Enricher {
    http: reqwest::Client,
    cache: EnrichmentCache,
    address_intel: Option<ProviderEndpoint>,
    classifier: Option<ProviderEndpoint>,
    address_intel_timeout: Duration,
    classifier_timeout: Duration,
}

impl Enricher {
    /// Build the enrichment service from application config.
    ///
    /// A provider is enabled only when both its API key and its URL are set.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;

        let address_intel = config
            .address_intel_api_key
            .clone()
            .zip(config.address_intel_api_url.clone())
            .map(|(api_key, url)| ProviderEndpoint { api_key, url });
        let classifier = config
            .classifier_api_key
            .clone()
            .zip(config.classifier_api_url.clone())
            .map(|(api_key, url)| ProviderEndpoint { api_key, url });

        if address_intel.is_none() {
            tracing::info!("Address-intelligence enrichment disabled (no key/URL configured)");
        }
        if classifier.is_none() {
            tracing::info!("Classification enrichment disabled (no key/URL configured)");
        }

        Ok(Self {
            http,
            cache: EnrichmentCache::new(),
            address_intel,
            classifier,
            address_intel_timeout: Duration::from_secs(config.address_intel_timeout_secs),
            classifier_timeout: Duration::from_secs(config.classifier_timeout_secs),
        })
    }

    /// The underlying write-once cache.
    pub fn cache(&self) -> &EnrichmentCache {
        &self.cache
    }

    /// Run both providers for one record. The calls are independent and run
    /// concurrently; either side may come back `None` (disabled) or an
    /// embedded error object.
    pub async fn enrich(&self, record: &AddressRecord) -> (Option<Value>, Option<Value>) {
        tokio::join!(
            self.address_intel(&record.address),
            self.classify(record.context.as_deref().unwrap_or("")),
        )
    }

    /// Look up address intelligence for one address.
    ///
    /// Cache first; on miss, an authenticated GET against the configured URL
    /// template with `{address}` substituted.
    pub async fn address_intel(&self, address: &str) -> Option<Value> {
        let endpoint = self.address_intel.as_ref()?;

        if let Some(cached) = self.cache.get(address, EnrichmentKind::AddressIntel).await {
            return Some(cached);
        }

        let url = endpoint.url.replace("{address}", address);
        let response = match self
            .http
            .get(&url)
            .bearer_auth(&endpoint.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.address_intel_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Some(exception_error("addressIntel", &e.to_string())),
        };

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(address, status, "Address-intel provider returned non-200");
            return Some(status_error("addressIntel", status, &body));
        }

        match response.json::<Value>().await {
            Ok(data) => {
                self.cache
                    .put(address, EnrichmentKind::AddressIntel, data.clone())
                    .await;
                Some(data)
            }
            Err(e) => Some(exception_error("addressIntel", &e.to_string())),
        }
    }

    /// Classify a free-text context via the model provider.
    ///
    /// Keyed by the context string itself; records sharing a context share
    /// one cache entry.
    pub async fn classify(&self, context: &str) -> Option<Value> {
        let endpoint = self.classifier.as_ref()?;

        if let Some(cached) = self.cache.get(context, EnrichmentKind::Classification).await {
            return Some(cached);
        }

        let payload = json!({
            "prompt": format!(
                "{CLASSIFY_PROMPT}\n\nContext:\n{context}\n\nReturn as JSON: \
                 {{'label':..., 'explanation':..., 'confidence':...}}"
            ),
            "max_tokens": 200,
        });

        let response = match self
            .http
            .post(&endpoint.url)
            .bearer_auth(&endpoint.api_key)
            .json(&payload)
            .timeout(self.classifier_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Some(exception_error("classification", &e.to_string())),
        };

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status, "Classification provider returned non-200");
            return Some(status_error("classification", status, &body));
        }

        match response.json::<Value>().await {
            Ok(data) => {
                self.cache
                    .put(context, EnrichmentKind::Classification, data.clone())
                    .await;
                Some(data)
            }
            Err(e) => Some(exception_error("classification", &e.to_string())),
        }
    }
}

/// Embedded error for a non-200 provider response. Body text is truncated
/// to 200 chars.
fn status_error(provider: &str, status_code: u16, body: &str) -> Value {
    let prefix: String = body.chars().take(200).collect();
    json!({
        "error": format!("{provider}_status"),
        "statusCode": status_code,
        "bodyPrefix": prefix,
    })
}

/// Embedded error for a transport, timeout, or body-parse failure.
fn exception_error(provider: &str, message: &str) -> Value {
    json!({
        "error": format!("{provider}_exception"),
        "message": message,
    })
}
