// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated write requests.

use std::sync::Arc;

use ring::rand::SystemRandom;
use tracing::{debug, warn};

use super::nonce::generate_nonce;
use super::signer::Signer;
use crate::error::WalletError;

/// A write request ready for the transport.
///
/// The signature covers `endpoint + nonce + api_token + body`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedRequest {
    pub endpoint: String,
    pub nonce: String,
    pub api_token: String,
    /// Serialized JSON body, exactly as signed
    pub body: String,
    pub signature: Vec<u8>,
}

impl AuthenticatedRequest {
    /// Signature as sent in the `Signature` header.
    pub fn signature_hex(&self) -> String {
        hex::encode(&self.signature)
    }
}

impl std::fmt::Debug for AuthenticatedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedRequest")
            .field("endpoint", &self.endpoint)
            .field("nonce", &self.nonce)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Attaches a fresh nonce and a signature to each write request.
#[derive(Clone)]
pub struct RequestAuthenticator {
    api_token: String,
    signer: Arc<dyn Signer>,
    rng: SystemRandom,
}

impl RequestAuthenticator {
    pub fn new(api_token: impl Into<String>, signer: Arc<dyn Signer>) -> Self {
        Self {
            api_token: api_token.into(),
            signer,
            rng: SystemRandom::new(),
        }
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Sign `body` for `endpoint`.
    ///
    /// A new nonce is drawn on every call, including retries of the same
    /// body.
    pub async fn authenticate(
        &self,
        endpoint: &str,
        body: String,
    ) -> Result<AuthenticatedRequest, WalletError> {
        let nonce = generate_nonce(&self.rng)?;

        let signature = self
            .signer
            .sign_request(endpoint, &nonce, &self.api_token, &body)
            .await
            .map_err(|e| {
                warn!(endpoint = %endpoint, error = %e, "Signer declined request");
                WalletError::SigningRefused(e)
            })?;

        debug!(endpoint = %endpoint, "Request signed");

        Ok(AuthenticatedRequest {
            endpoint: endpoint.to_string(),
            nonce,
            api_token: self.api_token.clone(),
            body,
            signature,
        })
    }
}
