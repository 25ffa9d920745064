// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Authentication
//!
//! Read endpoints only need the API token. Write endpoints additionally need:
//!
//! 1. A fresh nonce (16 random bytes, base64)
//! 2. An HMAC-SHA256 signature over `endpoint + nonce + api_token + body`
//! 3. Both sent as `Nonce` / `Signature` headers next to `Api-Token`
//!
//! The secret itself stays behind the [`Signer`] trait so that it can live in
//! another process or on another machine.

pub mod nonce;
pub mod request;
pub mod signer;

pub use nonce::{generate_nonce, NONCE_LEN};
pub use request::{AuthenticatedRequest, RequestAuthenticator};
pub use signer::{RemoteSigner, Signer, SignerError, SimpleSigner, SpendLimitSigner};
