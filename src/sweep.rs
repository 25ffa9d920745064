// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sweep amount computation.
//!
//! A sweep sends the whole confirmed balance minus whatever the service will
//! charge for it. Both inputs must come from the same
//! [`crate::aggregate::balance_and_fee`] call for the destination being paid.

use tracing::info;

use crate::models::{BalanceSnapshot, FeeEstimate};

/// The balance cannot cover the cost of the sweep.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InsufficientFunds {
    #[error("confirmed balance ({confirmed:.8}) insufficient for fixed fee ({fixed_fee:.8})")]
    ForFee { confirmed: f64, fixed_fee: f64 },

    #[error("available balance ({available:.8}) insufficient for commission ({commission:.8})")]
    ForCommission { available: f64, commission: f64 },

    #[error("confirmed balance ({confirmed:.8}) insufficient for lightning fee ({max_fee:.8})")]
    ForLightningFee { confirmed: f64, max_fee: f64 },
}

/// Breakdown of an on-chain sweep, in BTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnChainSweep {
    /// Confirmed balance minus the fixed fee
    pub available: f64,
    /// Commission charged on the confirmed balance
    pub commission: f64,
    /// Amount to send
    pub amount: f64,
}

/// Amount to send when sweeping to an on-chain address.
///
/// The commission rate applies to the whole confirmed balance, not to what
/// is left after the fixed fee; that is how the service computes it.
pub fn sweep_on_chain(
    balance: &BalanceSnapshot,
    fees: &FeeEstimate,
) -> Result<OnChainSweep, InsufficientFunds> {
    let available = balance.confirmed - fees.btc_fixed_fee;
    if available < 0.0 {
        return Err(InsufficientFunds::ForFee {
            confirmed: balance.confirmed,
            fixed_fee: fees.btc_fixed_fee,
        });
    }

    let commission = fees.btc_send_commission_percent * balance.confirmed;
    let amount = available - commission;
    if amount <= 0.0 {
        return Err(InsufficientFunds::ForCommission {
            available,
            commission,
        });
    }

    info!(available, commission, amount, "Computed on-chain sweep");
    Ok(OnChainSweep {
        available,
        commission,
        amount,
    })
}

/// Amount to send when sweeping over lightning: the confirmed balance minus
/// the maximum routing fee.
pub fn sweep_lightning(
    balance: &BalanceSnapshot,
    fees: &FeeEstimate,
) -> Result<f64, InsufficientFunds> {
    let amount = balance.confirmed - fees.max_lightning_fee;
    if amount <= 0.0 {
        return Err(InsufficientFunds::ForLightningFee {
            confirmed: balance.confirmed,
            max_fee: fees.max_lightning_fee,
        });
    }

    info!(amount, max_fee = fees.max_lightning_fee, "Computed lightning sweep");
    Ok(amount)
}
