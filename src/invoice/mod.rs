// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lightning invoice handling.
//!
//! This module provides:
//! - A bech32 decoder adapter that can lift the BIP-173 length ceiling
//! - Exact millisatoshi decoding of the BOLT11 amount suffix

pub mod amount;
pub mod bech32;

pub use amount::{
    decode_amount, parse_invoice_amount, AmountError, DecodedAmount, InvalidInvoice,
    InvoiceHumanPart,
};
pub use bech32::{DecodeError, LengthLimit};

/// Whether a destination string looks like a lightning invoice rather than
/// an on-chain address.
pub fn is_lightning_invoice(destination: &str) -> bool {
    destination
        .get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(crate::config::LIGHTNING_PREFIX))
}
