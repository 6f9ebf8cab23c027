//! Outbound webhook notifications
//!
//! Delivers store events (entry created, achievement unlocked, ...) to a
//! user-configured URL. Delivery is fire-and-forget: a slow or failing
//! endpoint is logged at warn and never blocks or fails the triggering
//! operation. In-flight deliveries are tracked so a short-lived process can
//! [`drain`](WebhookNotifier::drain) them before exit; dropping the runtime
//! cancels anything still spawned.
//!
//! When a shared secret is configured, the payload carries a hex HMAC-SHA256
//! signature computed over the payload JSON without the signature field, so
//! receivers can verify origin.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

type HmacSha256 = Hmac<Sha256>;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Webhook delivery configuration
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    /// Target URL; empty disables delivery
    pub url: String,
    /// Shared secret for payload signing
    pub secret: Option<String>,
}

/// The delivered payload shape
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookPayload {
    pub event: String,
    /// RFC 3339 timestamp of the event
    pub timestamp: String,
    pub data: serde_json::Value,
    pub app: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Fire-and-forget webhook sender
pub struct WebhookNotifier {
    client: reqwest::Client,
    config: WebhookConfig,
    /// Handles of spawned deliveries, drained at shutdown
    deliveries: Mutex<Vec<JoinHandle<()>>>,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            config,
            deliveries: Mutex::new(Vec::new()),
        }
    }

    /// Whether a target URL is configured
    pub fn is_enabled(&self) -> bool {
        !self.config.url.is_empty()
    }

    /// Build the signed payload for an event
    pub fn build_payload(&self, event: &str, data: serde_json::Value) -> WebhookPayload {
        let mut payload = WebhookPayload {
            event: event.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            data,
            app: "moodlog".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            signature: None,
        };

        if let Some(secret) = &self.config.secret {
            // Signature covers the payload without the signature field
            if let Ok(canonical) = serde_json::to_string(&payload) {
                payload.signature = Some(sign(&canonical, secret));
            }
        }

        payload
    }

    /// Deliver an event asynchronously; never blocks the caller
    pub fn notify(&self, event: &str, data: serde_json::Value) {
        if !self.is_enabled() {
            return;
        }

        let payload = self.build_payload(event, data);
        let client = self.client.clone();
        let url = self.config.url.clone();
        let event = event.to_string();

        let handle = tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(event = %event, "Webhook delivered");
                }
                Ok(response) => {
                    tracing::warn!(
                        event = %event,
                        status = %response.status(),
                        "Webhook endpoint rejected payload"
                    );
                }
                Err(e) => {
                    tracing::warn!(event = %event, error = %e, "Webhook delivery failed");
                }
            }
        });

        if let Ok(mut pending) = self.deliveries.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }

    /// Wait for in-flight deliveries, up to [`DRAIN_TIMEOUT`] overall
    ///
    /// Must run before the runtime is dropped, or pending deliveries are
    /// cancelled mid-request.
    pub async fn drain(&self) {
        let pending: Vec<JoinHandle<()>> = match self.deliveries.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(_) => return,
        };

        let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
        for handle in pending {
            if tokio::time::timeout_at(deadline, handle).await.is_err() {
                tracing::warn!("Webhook delivery still in flight at shutdown");
            }
        }
    }
}

/// Hex HMAC-SHA256 of a message under a shared secret
pub fn sign(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
