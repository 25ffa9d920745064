// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bech32 decoding adapter.
//!
//! BIP-173 caps bech32 strings at 90 characters, but BOLT11 invoices are
//! routinely longer. Callers pick the ceiling explicitly through
//! [`LengthLimit`]; invoice parsing always uses [`LengthLimit::Unbounded`].

use bech32::{u5, Variant};

/// Maximum length of a BIP-173 bech32 string.
pub const BIP173_MAX_LENGTH: usize = 90;

/// Length ceiling applied before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthLimit {
    /// Enforce the 90 character BIP-173 ceiling
    Standard,
    /// No ceiling, as required for lightning invoices
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("bech32 string is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("expected bech32 checksum, found bech32m")]
    UnexpectedVariant,

    #[error(transparent)]
    Malformed(#[from] bech32::Error),
}

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Human-readable part, lower-cased
    pub hrp: String,
    /// Data symbols, checksum stripped
    pub data: Vec<u5>,
}

/// Decode a bech32 string, verifying separator, alphabet, case and checksum.
pub fn decode(encoded: &str, limit: LengthLimit) -> Result<Decoded, DecodeError> {
    if limit == LengthLimit::Standard && encoded.len() > BIP173_MAX_LENGTH {
        return Err(DecodeError::TooLong {
            len: encoded.len(),
            max: BIP173_MAX_LENGTH,
        });
    }

    let (hrp, data, variant) = bech32::decode(encoded)?;
    if variant != Variant::Bech32 {
        return Err(DecodeError::UnexpectedVariant);
    }
    Ok(Decoded { hrp, data })
}

/// Decode without any length ceiling.
pub fn decode_no_limit(encoded: &str) -> Result<Decoded, DecodeError> {
    decode(encoded, LengthLimit::Unbounded)
}
