// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Concurrent Balance + Fee Fetch
//!
//! Sweeps need a balance and a fee quote taken together. The two reads are
//! independent, so they run as two tokio tasks:
//!
//! 1. Each branch sends exactly one message (its result or its error) on a
//!    shared channel, guarded by the cancellation token.
//! 2. The caller collects messages until both results are in, or until the
//!    first error arrives.
//! 3. On the first error the shared token is cancelled so the other branch
//!    stops; we do not wait for it to notice.
//!
//! Which branch finishes first is unspecified. A caller-supplied token
//! cancels both branches as well, and the branch token is also cancelled when
//! the call returns or is dropped, so no task outlives the call.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::WalletError;
use crate::models::{BalanceSnapshot, FeeEstimate};
use crate::reader::AccountReader;

/// Which of the two reads a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchBranch {
    Balance,
    FeeEstimate,
}

impl FetchBranch {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchBranch::Balance => "balance",
            FetchBranch::FeeEstimate => "fee estimate",
        }
    }
}

/// A balance and fee quote from the same concurrent fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceAndFee {
    pub balance: BalanceSnapshot,
    pub fees: FeeEstimate,
}

/// First failure of [`balance_and_fee`], plus whatever already succeeded.
#[derive(Debug, thiserror::Error)]
#[error(
    "{} fetch failed: {}",
    .failed.map_or("balance and fee", FetchBranch::as_str),
    .source
)]
pub struct PartialFetch {
    /// Branch that failed; `None` when the caller cancelled
    pub failed: Option<FetchBranch>,
    pub balance: Option<BalanceSnapshot>,
    pub fees: Option<FeeEstimate>,
    pub source: WalletError,
}

impl From<PartialFetch> for WalletError {
    fn from(partial: PartialFetch) -> Self {
        partial.source
    }
}

enum Completion {
    Balance(BalanceSnapshot),
    Fees(FeeEstimate),
}

type BranchMessage = Result<Completion, (FetchBranch, WalletError)>;

/// Fetch the balance and a fee quote for `destination` concurrently.
///
/// Returns as soon as either branch fails, cancelling the other. Cancelling
/// `cancel` aborts both and yields [`WalletError::Cancelled`].
pub async fn balance_and_fee<R>(
    reader: Arc<R>,
    destination: &str,
    cancel: &CancellationToken,
) -> Result<BalanceAndFee, PartialFetch>
where
    R: AccountReader + ?Sized + 'static,
{
    let token = cancel.child_token();
    let _stop_branches = token.clone().drop_guard();
    let (tx, mut rx) = mpsc::channel::<BranchMessage>(2);

    {
        let reader = Arc::clone(&reader);
        spawn_branch(FetchBranch::Balance, token.clone(), tx.clone(), async move {
            reader
                .balance()
                .await
                .map(Completion::Balance)
                .map_err(|e| (FetchBranch::Balance, e))
        });
    }
    {
        let reader = Arc::clone(&reader);
        let destination = destination.to_string();
        spawn_branch(FetchBranch::FeeEstimate, token.clone(), tx, async move {
            reader
                .fee_estimate(&destination)
                .await
                .map(Completion::Fees)
                .map_err(|e| (FetchBranch::FeeEstimate, e))
        });
    }

    let mut balance = None;
    let mut fees = None;

    loop {
        if let (Some(balance), Some(fees)) = (balance, fees) {
            return Ok(BalanceAndFee { balance, fees });
        }

        let message = tokio::select! {
            _ = token.cancelled() => None,
            message = rx.recv() => message,
        };

        match message {
            Some(Ok(Completion::Balance(b))) => balance = Some(b),
            Some(Ok(Completion::Fees(f))) => fees = Some(f),
            Some(Err((branch, err))) => {
                debug!(branch = branch.as_str(), error = %err, "Concurrent fetch failed, cancelling sibling");
                token.cancel();
                return Err(PartialFetch {
                    failed: Some(branch),
                    balance,
                    fees,
                    source: err,
                });
            }
            // Branches only exit without a message once the token is cancelled.
            None => {
                debug!("Concurrent fetch cancelled");
                return Err(PartialFetch {
                    failed: None,
                    balance,
                    fees,
                    source: WalletError::Cancelled,
                });
            }
        }
    }
}

/// Runs `work` on its own task so a panic surfaces as a join error instead
/// of a silently closed channel.
fn spawn_branch<F>(
    branch: FetchBranch,
    token: CancellationToken,
    tx: mpsc::Sender<BranchMessage>,
    work: F,
) where
    F: Future<Output = BranchMessage> + Send + 'static,
{
    tokio::spawn(async move {
        let handle = tokio::spawn(work);
        let abort = handle.abort_handle();
        let message = tokio::select! {
            _ = token.cancelled() => {
                abort.abort();
                return;
            }
            joined = handle => joined.unwrap_or_else(|e| {
                Err((branch, WalletError::TaskFailed(format!("{} task: {e}", branch.as_str()))))
            }),
        };
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tx.send(message) => {}
        }
    });
}
