//! REST client for the UCTM appliance API
//!
//! All device endpoints share the same convention: HTTPS POST with an empty
//! body under a fixed path prefix. Every failure mode of a single request -
//! connection error, timeout, non-2xx status, undecodable body - maps to
//! "no data" for that endpoint. A missing section must never abort the poll.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::repair::repair;

/// HTTP client for a single UCTM appliance. Holds no mutable per-call state;
/// one instance is shared across all endpoint requests of a poll cycle.
pub struct UctmClient {
    client: reqwest::Client,
    base_url: String,
}

impl UctmClient {
    pub fn new(host: &str, port: u16, verify_ssl: bool, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("https://{}:{}/rs/rest", host, port),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One logical request against a device endpoint.
    pub async fn request(&self, endpoint: &str) -> Option<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = match self.client.post(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned HTTP {}", url, status);
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read response body from {}: {}", url, e);
                return None;
            }
        };

        decode_payload(&body)
    }
}

/// Strict JSON decode with a single repair-and-retry fallback. Still
/// undecodable bodies are reported as "no data", never as a partial value.
pub fn decode_payload(body: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(body) {
        return Some(value);
    }

    let repaired = repair(body);
    match serde_json::from_str(&repaired) {
        Ok(value) => {
            debug!("Decoded payload after repairing malformed JSON");
            Some(value)
        }
        Err(e) => {
            warn!("Undecodable payload: {}", e);
            None
        }
    }
}
