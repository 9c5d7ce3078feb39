//! Email relay client.
//!
//! The contact form hands its payload to an [`EmailRelay`] and only cares
//! about success or failure. [`EmailJsRelay`] is the shipped implementation,
//! posting to the EmailJS REST endpoint:
//!
//! ```text
//! POST {endpoint}
//! {
//!   "service_id": "...", "template_id": "...", "user_id": "<public key>",
//!   "accessToken": "...",            // optional, private key
//!   "template_params": {
//!     "to_email": "...", "from_name": "...", "from_email": "...",
//!     "subject": "...", "message": "..."
//!   }
//! }
//! ```
//!
//! HTTP 200 is an acknowledgement; any other status is a rejection.

use crate::config::RelayConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Relay rejected the message (status {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Relay did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Relay is not configured: relay.{0} is empty")]
    NotConfigured(&'static str),
}

/// What the form sends: one message for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPayload {
    #[serde(rename = "to_email")]
    pub recipient: String,
    #[serde(rename = "from_name")]
    pub sender_name: String,
    #[serde(rename = "from_email")]
    pub sender_email: String,
    pub subject: String,
    pub message: String,
}

/// Relay acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayAck {
    pub status: u16,
    pub body: String,
}

/// Outbound email capability.
#[async_trait]
pub trait EmailRelay: Send + Sync {
    async fn send(&self, payload: &EmailPayload) -> Result<RelayAck, RelayError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a EmailPayload,
}

/// EmailJS REST client.
pub struct EmailJsRelay {
    http: reqwest::Client,
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl EmailJsRelay {
    /// Build a client from config. Fails when an id or key is missing.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        for (name, value) in [
            ("service_id", &config.service_id),
            ("template_id", &config.template_id),
            ("public_key", &config.public_key),
        ] {
            if value.trim().is_empty() {
                return Err(RelayError::NotConfigured(name));
            }
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
            access_token: config.access_token.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmailRelay for EmailJsRelay {
    async fn send(&self, payload: &EmailPayload) -> Result<RelayAck, RelayError> {
        let request = SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            access_token: self.access_token.as_deref(),
            template_params: payload,
        };
        log::debug!("Posting contact message to {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Unable to read response"));

        if !status.is_success() {
            log::warn!("Relay answered {}: {}", status, body);
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(RelayAck {
            status: status.as_u16(),
            body,
        })
    }
}

impl EmailJsRelay {
    fn classify(&self, err: reqwest::Error) -> RelayError {
        if err.is_timeout() {
            RelayError::Timeout(self.timeout)
        } else {
            RelayError::Http(err)
        }
    }
}
