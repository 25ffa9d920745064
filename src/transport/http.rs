// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! reqwest-backed [`Transport`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Transport, TransportError};
use crate::auth::AuthenticatedRequest;
use crate::config::ClientConfig;
use crate::error::WalletError;

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
}

/// HTTPS transport for the wallet API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: ClientConfig,
    http: Client,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, WalletError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                WalletError::MissingConfig(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { config, http })
    }

    /// Wrap an existing client, e.g. one with a proxy configured.
    pub fn with_client(config: ClientConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn read_body(
        method: &'static str,
        endpoint: &str,
        response: Response,
    ) -> Result<Vec<u8>, WalletError> {
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = body_or_read_error(response.text().await);
            let err = TransportError::Status {
                method,
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: error_message(&body),
            };
            warn!(method, endpoint = %endpoint, status = status.as_u16(), "Wallet API returned error");
            return Err(err.into());
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| request_failed(method, endpoint, e))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str, api_token: &str) -> Result<Vec<u8>, WalletError> {
        debug!(endpoint = %endpoint, "GET");
        let response = self
            .http
            .get(self.config.url_for(endpoint))
            .header("User-Agent", "")
            .header("Api-Token", api_token)
            .send()
            .await
            .map_err(|e| request_failed("GET", endpoint, e))?;

        Self::read_body("GET", endpoint, response).await
    }

    async fn post(&self, request: &AuthenticatedRequest) -> Result<Vec<u8>, WalletError> {
        let endpoint = request.endpoint.as_str();
        debug!(endpoint = %endpoint, "POST");
        let response = self
            .http
            .post(self.config.url_for(endpoint))
            .header("User-Agent", "")
            .header("Content-Type", "application/json")
            .header("Api-Token", &request.api_token)
            .header("Nonce", &request.nonce)
            .header("Signature", request.signature_hex())
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| request_failed("POST", endpoint, e))?;

        Self::read_body("POST", endpoint, response).await
    }
}

fn request_failed(method: &'static str, endpoint: &str, err: reqwest::Error) -> WalletError {
    warn!(method, endpoint = %endpoint, error = %err, "Wallet API request failed");
    TransportError::Request {
        method,
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Body text of an error response, or why it could not be read.
pub(crate) fn body_or_read_error<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("(failed to read body: {e})"))
}

/// Prefer the service's `message` field, fall back to the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => body.to_string(),
    }
}
