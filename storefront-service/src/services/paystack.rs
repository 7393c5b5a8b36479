//! Paystack payment gateway client.
//!
//! Implements the Transactions API for payment initiation and
//! verification, plus webhook signature checking. Paystack signs
//! webhooks with HMAC-SHA512 over the raw request body using the
//! account's secret key, delivered in the `X-Paystack-Signature`
//! header as a lowercase hex digest.

use crate::config::PaystackConfig;
use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use subtle::ConstantTimeEq;

pub const SIGNATURE_HEADER: &str = "X-Paystack-Signature";

#[derive(Clone)]
pub struct PaystackClient {
    client: Client,
    config: PaystackConfig,
}

/// Request to initialize a transaction.
#[derive(Debug, Serialize)]
struct InitializeRequest<'a> {
    reference: &'a str,
    /// Amount in the smallest currency unit (kobo for NGN).
    amount: i64,
    email: &'a str,
    currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

/// Envelope every Paystack API response arrives in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

/// Data returned by `POST /transaction/initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializedTransaction {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// Data returned by `GET /transaction/verify/{reference}`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedTransaction {
    pub status: String,
    pub reference: String,
    pub amount: i64,
    pub currency: String,
    pub gateway_response: Option<String>,
}

/// Inbound webhook event.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub reference: Option<String>,
    pub status: Option<String>,
    pub amount: Option<i64>,
}

impl PaystackClient {
    pub fn new(config: PaystackConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Check if Paystack credentials are set.
    pub fn is_configured(&self) -> bool {
        !self.config.secret_key.expose_secret().is_empty()
    }

    pub fn public_key(&self) -> &str {
        &self.config.public_key
    }

    /// Initialize a transaction for redirect checkout.
    ///
    /// `amount_kobo` is the order total in the smallest currency unit.
    pub async fn initialize_transaction(
        &self,
        reference: &str,
        amount_kobo: i64,
        email: &str,
        currency: &str,
        callback_url: Option<&str>,
    ) -> Result<InitializedTransaction> {
        if !self.is_configured() {
            return Err(anyhow!("Paystack credentials not configured"));
        }

        let request = InitializeRequest {
            reference,
            amount: amount_kobo,
            email,
            currency,
            callback_url,
        };

        let url = format!("{}/transaction/initialize", self.config.api_base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Paystack initialize response");

        let parsed: ApiResponse<InitializedTransaction> = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Unexpected Paystack response: {}", e))?;

        if status.is_success() && parsed.status {
            let data = parsed
                .data
                .ok_or_else(|| anyhow!("Paystack response missing data"))?;
            tracing::info!(reference = %data.reference, "Paystack transaction initialized");
            Ok(data)
        } else {
            tracing::error!(message = %parsed.message, "Paystack initialize failed");
            Err(anyhow!("Paystack error: {}", parsed.message))
        }
    }

    /// Verify a transaction's outcome by reference.
    pub async fn verify_transaction(&self, reference: &str) -> Result<VerifiedTransaction> {
        if !self.is_configured() {
            return Err(anyhow!("Paystack credentials not configured"));
        }

        let url = format!(
            "{}/transaction/verify/{}",
            self.config.api_base_url, reference
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: ApiResponse<VerifiedTransaction> = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Unexpected Paystack response: {}", e))?;

        if status.is_success() && parsed.status {
            parsed
                .data
                .ok_or_else(|| anyhow!("Paystack response missing data"))
        } else {
            Err(anyhow!("Paystack error: {}", parsed.message))
        }
    }

    /// Verify a webhook signature against the raw request body.
    ///
    /// The comparison is constant-time so the check does not leak how
    /// much of a forged digest matched.
    pub fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> Result<bool> {
        let expected = self.compute_signature(body)?;
        let provided = signature.trim().to_ascii_lowercase();
        Ok(expected.as_bytes().ct_eq(provided.as_bytes()).into())
    }

    /// Parse a webhook event from the raw body.
    pub fn parse_webhook_event(&self, body: &[u8]) -> Result<WebhookEvent> {
        let event: WebhookEvent = serde_json::from_slice(body)?;
        Ok(event)
    }

    /// Compute the hex HMAC-SHA512 digest of a payload.
    fn compute_signature(&self, payload: &[u8]) -> Result<String> {
        type HmacSha512 = Hmac<Sha512>;
        let mut mac =
            HmacSha512::new_from_slice(self.config.secret_key.expose_secret().as_bytes())
                .map_err(|_| anyhow!("Invalid key length"))?;
        mac.update(payload);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_client(secret: &str) -> PaystackClient {
        PaystackClient::new(PaystackConfig {
            public_key: "pk_test_123".to_string(),
            secret_key: Secret::new(secret.to_string()),
            api_base_url: "https://api.paystack.co".to_string(),
            callback_base_url: "http://localhost:3000".to_string(),
        })
    }

    #[test]
    fn is_configured_requires_secret_key() {
        assert!(test_client("sk_test_abc").is_configured());
        assert!(!test_client("").is_configured());
    }

    #[test]
    fn webhook_signature_accepts_matching_digest() {
        let client = test_client("sk_test_abc");
        let body = br#"{"event":"charge.success","data":{"reference":"PAY_1"}}"#;
        let signature = client.compute_signature(body).unwrap();
        assert!(client.verify_webhook_signature(body, &signature).unwrap());
        // Header casing must not matter.
        assert!(client
            .verify_webhook_signature(body, &signature.to_ascii_uppercase())
            .unwrap());
    }

    #[test]
    fn webhook_signature_rejects_tampered_body() {
        let client = test_client("sk_test_abc");
        let signature = client
            .compute_signature(br#"{"event":"charge.success"}"#)
            .unwrap();
        assert!(!client
            .verify_webhook_signature(br#"{"event":"charge.failed"}"#, &signature)
            .unwrap());
        assert!(!client
            .verify_webhook_signature(br#"{"event":"charge.success"}"#, "deadbeef")
            .unwrap());
    }

    #[test]
    fn parses_webhook_event() {
        let client = test_client("sk_test_abc");
        let body = br#"{"event":"charge.success","data":{"reference":"PAY_9","status":"success","amount":550000}}"#;
        let event = client.parse_webhook_event(body).unwrap();
        assert_eq!(event.event, "charge.success");
        assert_eq!(event.data.reference.as_deref(), Some("PAY_9"));
        assert_eq!(event.data.amount, Some(550000));
    }
}
