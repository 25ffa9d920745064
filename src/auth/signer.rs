// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Signers
//!
//! Write requests carry an HMAC-SHA256 signature over
//!
//! ```text
//! endpoint + nonce + api_token + body
//! ```
//!
//! concatenated with no separators. The field order is fixed by the remote
//! service and must not change.
//!
//! [`Signer`] abstracts over where the secret lives:
//!
//! - [`SimpleSigner`] holds the secret in process
//! - [`RemoteSigner`] asks an isolated signing service over HTTPS
//! - [`SpendLimitSigner`] enforces a payment policy before delegating

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;

use crate::transport::endpoints;
use crate::transport::http::body_or_read_error;

type HmacSha256 = Hmac<Sha256>;

/// Errors a signer may return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    /// The signer looked at the request and declined it (policy)
    #[error("refused: {0}")]
    Refused(String),

    /// The signer could not produce a signature
    #[error("failed: {0}")]
    Failed(String),
}

/// Signs authenticated write requests.
///
/// Implementations may inspect the request and refuse to sign it; the
/// refusal is propagated to the caller as
/// [`crate::error::WalletError::SigningRefused`].
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign_request(
        &self,
        endpoint: &str,
        nonce: &str,
        api_token: &str,
        body: &str,
    ) -> Result<Vec<u8>, SignerError>;
}

/// [`Signer`] with a static secret and no validation.
#[derive(Clone)]
pub struct SimpleSigner {
    api_secret: String,
}

impl std::fmt::Debug for SimpleSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleSigner").finish_non_exhaustive()
    }
}

impl SimpleSigner {
    pub fn new(api_secret: impl Into<String>) -> Self {
        Self {
            api_secret: api_secret.into(),
        }
    }

    /// Compute the signature synchronously.
    pub fn sign(
        &self,
        endpoint: &str,
        nonce: &str,
        api_token: &str,
        body: &str,
    ) -> Result<Vec<u8>, SignerError> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| SignerError::Failed(e.to_string()))?;
        mac.update(endpoint.as_bytes());
        mac.update(nonce.as_bytes());
        mac.update(api_token.as_bytes());
        mac.update(body.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[async_trait]
impl Signer for SimpleSigner {
    async fn sign_request(
        &self,
        endpoint: &str,
        nonce: &str,
        api_token: &str,
        body: &str,
    ) -> Result<Vec<u8>, SignerError> {
        self.sign(endpoint, nonce, api_token, body)
    }
}

/// [`Signer`] that delegates to a signing service.
///
/// The service receives `{"endpoint", "nonce", "body"}` as JSON and answers
/// with the hex-encoded signature. The API token is not sent; the service is
/// expected to know it. HTTP 403 and 422 are read as a policy refusal.
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    url: String,
    http: reqwest::Client,
}

impl RemoteSigner {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SignerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SignerError::Failed(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Signer for RemoteSigner {
    async fn sign_request(
        &self,
        endpoint: &str,
        nonce: &str,
        _api_token: &str,
        body: &str,
    ) -> Result<Vec<u8>, SignerError> {
        let payload = json!({
            "endpoint": endpoint,
            "nonce": nonce,
            "body": body,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SignerError::Failed(format!("signing request failed: {e}")))?;

        let status = response.status().as_u16();
        let text = response.text().await;
        if !(200..300).contains(&status) {
            return Err(classify_remote_failure(status, &body_or_read_error(text)));
        }
        let text =
            text.map_err(|e| SignerError::Failed(format!("reading signature failed: {e}")))?;

        hex::decode(text.trim())
            .map_err(|e| SignerError::Failed(format!("signature is not hex: {e}")))
    }
}

fn payment_flag(payment: &Value, name: &str) -> Result<bool, SignerError> {
    match payment.get(name) {
        None => Ok(false),
        Some(value) => value.as_bool().ok_or_else(|| {
            SignerError::Refused(format!("payment field {name} is not a boolean: {value}"))
        }),
    }
}

fn classify_remote_failure(status: u16, body: &str) -> SignerError {
    let body = body.trim();
    match status {
        403 | 422 => SignerError::Refused(if body.is_empty() {
            format!("remote signer returned {status}")
        } else {
            body.to_string()
        }),
        _ => SignerError::Failed(format!("remote signer returned {status}: {body}")),
    }
}

/// Policy wrapper that caps what a [`Signer`] will authorise.
///
/// Payment requests above `max_amount_btc` are refused, as are
/// send-everything sweeps unless explicitly allowed. Requests to other
/// endpoints pass straight through.
#[derive(Debug, Clone)]
pub struct SpendLimitSigner<S> {
    inner: S,
    max_amount_btc: f64,
    allow_sweeps: bool,
}

impl<S: Signer> SpendLimitSigner<S> {
    pub fn new(inner: S, max_amount_btc: f64) -> Self {
        Self {
            inner,
            max_amount_btc,
            allow_sweeps: false,
        }
    }

    pub fn allow_sweeps(mut self, allow: bool) -> Self {
        self.allow_sweeps = allow;
        self
    }

    fn check_payment(&self, body: &str) -> Result<(), SignerError> {
        let payment: Value = serde_json::from_str(body)
            .map_err(|e| SignerError::Refused(format!("unreadable payment body: {e}")))?;

        let sweep =
            payment_flag(&payment, "sendMaxBtc")? || payment_flag(&payment, "sendMaxLightning")?;
        if !self.allow_sweeps && sweep {
            return Err(SignerError::Refused("sweeps are not allowed".to_string()));
        }

        // An absent amount is how a zero amount is serialized.
        let amount = match payment.get("amount") {
            None => 0.0,
            Some(value) => value.as_f64().ok_or_else(|| {
                SignerError::Refused(format!("payment amount is not a number: {value}"))
            })?,
        };
        if amount > self.max_amount_btc {
            return Err(SignerError::Refused(format!(
                "amount {amount:.8} BTC exceeds limit of {:.8} BTC",
                self.max_amount_btc
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: Signer> Signer for SpendLimitSigner<S> {
    async fn sign_request(
        &self,
        endpoint: &str,
        nonce: &str,
        api_token: &str,
        body: &str,
    ) -> Result<Vec<u8>, SignerError> {
        if endpoint == endpoints::PAYMENT {
            self.check_payment(body)?;
        }
        self.inner
            .sign_request(endpoint, nonce, api_token, body)
            .await
    }
}
