// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Crate-level error type.

use crate::auth::SignerError;
use crate::invoice::InvalidInvoice;
use crate::sweep::InsufficientFunds;
use crate::transport::TransportError;

/// Every failure the client can surface.
///
/// Callers branch on the variant (or [`WalletError::error_code`]); message
/// text is for humans only.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Malformed, wrong-network or badly denominated invoice
    #[error("invalid invoice: {0}")]
    InvalidInvoice(#[from] InvalidInvoice),

    /// The invoice leaves the amount to the payer
    #[error("no amount specified in invoice")]
    NoAmount,

    /// An explicit amount was supplied for an invoice that already fixes one
    #[error("invoice specifies a fixed amount")]
    FixedAmount,

    /// The signer declined, or was unable, to sign the request
    #[error("signer returned error: {0}")]
    SigningRefused(#[from] SignerError),

    /// Network or HTTP status failure from the transport
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The wallet cannot cover the fees of a sweep
    #[error(transparent)]
    InsufficientFunds(#[from] InsufficientFunds),

    /// The remote service answered with something we could not use
    #[error("invalid {operation} response: {message}")]
    InvalidResponse {
        operation: &'static str,
        message: String,
    },

    /// The request could not be built from the caller's input
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The system random source failed
    #[error("generating nonce: {0}")]
    Nonce(String),

    /// Required configuration is missing or unusable
    #[error("configuration missing: {0}")]
    MissingConfig(String),

    /// A background task died before reporting a result
    #[error("task failed: {0}")]
    TaskFailed(String),

    /// The caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,
}

impl WalletError {
    /// Stable identifier for this error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            WalletError::InvalidInvoice(InvalidInvoice::Decode(_)) => "decode_error",
            WalletError::InvalidInvoice(_) => "invalid_invoice",
            WalletError::NoAmount => "no_amount",
            WalletError::FixedAmount => "fixed_amount",
            WalletError::SigningRefused(SignerError::Failed(_)) => "signing_failed",
            WalletError::SigningRefused(SignerError::Refused(_)) => "signing_refused",
            WalletError::Transport(_) => "transport_error",
            WalletError::InsufficientFunds(_) => "insufficient_funds",
            WalletError::InvalidResponse { .. } => "invalid_response",
            WalletError::InvalidRequest(_) => "invalid_request",
            WalletError::Nonce(_) => "nonce_error",
            WalletError::MissingConfig(_) => "missing_config",
            WalletError::TaskFailed(_) => "task_failed",
            WalletError::Cancelled => "cancelled",
        }
    }

    pub(crate) fn invalid_response(operation: &'static str, err: impl std::fmt::Display) -> Self {
        WalletError::InvalidResponse {
            operation,
            message: err.to_string(),
        }
    }
}
