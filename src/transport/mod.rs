// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transport layer for the wallet API.
//!
//! This module provides:
//! - The [`Transport`] capability used by readers and wallets
//! - [`HttpTransport`], its reqwest implementation
//! - The endpoint paths the client talks to

pub mod http;

use async_trait::async_trait;

use crate::auth::AuthenticatedRequest;
use crate::error::WalletError;

pub use http::HttpTransport;

/// API paths, relative to the base URL.
pub mod endpoints {
    pub const ACCOUNT: &str = "/api/v1/wallet/account";
    pub const BALANCE: &str = "/api/v1/wallet/balance";
    pub const FEE_ESTIMATE: &str = "/api/v1/wallet/feeEstimate";
    pub const PAYMENT: &str = "/api/v1/wallet/payment";
    pub const CREATE_INVOICE: &str = "/api/v1/wallet/createInvoice";
}

/// Errors raised while moving bytes to and from the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("{method} {endpoint} request failed: {message}")]
    Request {
        method: &'static str,
        endpoint: String,
        message: String,
    },

    #[error("{method} {endpoint}: received status {status}: {message}")]
    Status {
        method: &'static str,
        endpoint: String,
        status: u16,
        message: String,
    },
}

impl TransportError {
    /// HTTP status of the failed call, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request { .. } => None,
        }
    }
}

/// Moves requests to the remote service and returns raw response bodies.
///
/// Implementations do not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET authenticated by the read-only token. `endpoint` may carry
    /// a query string.
    async fn get(&self, endpoint: &str, api_token: &str) -> Result<Vec<u8>, WalletError>;

    /// Issue a signed POST.
    async fn post(&self, request: &AuthenticatedRequest) -> Result<Vec<u8>, WalletError>;
}
