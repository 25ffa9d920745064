// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines the protocol constants shared by the whole client and
//! the environment variables used to configure it. Nothing here is mutable at
//! runtime: configuration is read once and passed around by value.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WOS_BASE_URL` | Base URL of the wallet API | `https://www.livingroomofsatoshi.com` |
//! | `WOS_HTTP_TIMEOUT_SECS` | Per-request HTTP timeout | `30` |
//! | `WOS_API_TOKEN` | Read-only access token | Required by `wos-probe` |
//! | `WOS_API_SECRET` | Secret used to sign write requests | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::sync::Arc;
use std::time::Duration;

use crate::auth::SimpleSigner;
use crate::error::WalletError;
use crate::reader::Reader;
use crate::transport::Transport;
use crate::wallet::Wallet;

/// API URL of the Wallet of Satoshi service.
pub const DEFAULT_BASE_URL: &str = "https://www.livingroomofsatoshi.com";

/// Human-readable prefix shared by every BOLT11 invoice.
pub const LIGHTNING_PREFIX: &str = "ln";

/// Network identifier of bitcoin mainnet inside an invoice prefix.
pub const MAINNET_NETWORK: &str = "bc";

/// Smallest pico-BTC magnitude that maps onto a whole millisatoshi.
pub const MIN_PICO_BTC_MAGNITUDE: u64 = 10;

/// Default timeout applied to every outbound HTTP request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "WOS_BASE_URL";

/// Environment variable holding the HTTP timeout in whole seconds.
pub const HTTP_TIMEOUT_ENV: &str = "WOS_HTTP_TIMEOUT_SECS";

/// Environment variable holding the read-only API token.
pub const API_TOKEN_ENV: &str = "WOS_API_TOKEN";

/// Environment variable holding the API secret.
///
/// Only needed for write access. Read-only tooling should leave it unset.
pub const API_SECRET_ENV: &str = "WOS_API_SECRET";

/// Transport settings for talking to the wallet API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, WalletError> {
        let base_url = env_or_default(BASE_URL_ENV, DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match env_optional(HTTP_TIMEOUT_ENV) {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => DEFAULT_HTTP_TIMEOUT,
        };

        Ok(Self {
            base_url,
            request_timeout,
        })
    }

    /// Join an endpoint path onto the base URL.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// Access credentials for a wallet.
///
/// The token alone grants read access. Together with the secret it permits
/// spending, so the secret is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub api_secret: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Read credentials from `WOS_API_TOKEN` / `WOS_API_SECRET`.
    pub fn from_env() -> Result<Self, WalletError> {
        let api_token = env_optional(API_TOKEN_ENV)
            .ok_or_else(|| WalletError::MissingConfig(API_TOKEN_ENV.to_string()))?;
        Ok(Self {
            api_token,
            api_secret: env_optional(API_SECRET_ENV),
        })
    }

    /// Read-only access through `transport`. Needs only the token.
    pub fn reader(&self, transport: Arc<dyn Transport>) -> Reader {
        Reader::new(self.api_token.clone(), transport)
    }

    /// In-process signer holding the API secret.
    pub fn simple_signer(&self) -> Result<SimpleSigner, WalletError> {
        self.api_secret
            .as_deref()
            .map(SimpleSigner::new)
            .ok_or_else(|| WalletError::MissingConfig(API_SECRET_ENV.to_string()))
    }

    /// Open a wallet with write access, signing in process.
    pub async fn open_wallet(&self, transport: Arc<dyn Transport>) -> Result<Wallet, WalletError> {
        let signer = self.simple_signer()?;
        Wallet::open(self.reader(transport), Arc::new(signer)).await
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, WalletError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(WalletError::MissingConfig(format!(
            "{HTTP_TIMEOUT_ENV} must be a positive number of seconds, got `{raw}`"
        ))),
    }
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
