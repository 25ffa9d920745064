// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! WoS Client - Wallet of Satoshi API Access Layer
//!
//! Client-side core for the custodial Lightning wallet API: request signing,
//! exact decoding of BOLT11 invoice amounts, concurrent balance and fee reads,
//! and sweep amount computation.
//!
//! ## Modules
//!
//! - `invoice` - Bech32 adapter and BOLT11 amount decoding
//! - `auth` - Nonces, signers and authenticated requests
//! - `transport` - HTTP transport (reqwest)
//! - `reader` - Read-only wallet access
//! - `aggregate` - Concurrent balance + fee fetch with cancellation
//! - `sweep` - Sweep amount maths
//! - `wallet` - Signed write operations

pub mod aggregate;
pub mod auth;
pub mod config;
pub mod error;
pub mod invoice;
pub mod logging;
pub mod models;
pub mod reader;
pub mod sweep;
pub mod transport;
pub mod wallet;

pub use error::WalletError;
pub use reader::Reader;
pub use wallet::Wallet;
