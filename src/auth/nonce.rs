// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request nonces.

use base64ct::{Base64, Encoding};
use ring::rand::SecureRandom;

use crate::error::WalletError;

/// Random bytes per nonce, before encoding.
pub const NONCE_LEN: usize = 16;

/// Draw a fresh nonce from `rng` and encode it as padded standard base64.
///
/// Every call produces a new value; nonces are never cached.
pub fn generate_nonce<R: SecureRandom>(rng: &R) -> Result<String, WalletError> {
    let mut bytes = [0u8; NONCE_LEN];
    rng.fill(&mut bytes)
        .map_err(|_| WalletError::Nonce("system random source unavailable".to_string()))?;
    Ok(Base64::encode_string(&bytes))
}
