// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `wos-probe`: read-only check of what a sweep to a destination would send.
//!
//! ```text
//! WOS_API_TOKEN=... wos-probe <address-or-invoice>
//! ```
//!
//! Only the API token is used, so the probe can never move funds.

use std::process::ExitCode;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use wos_client::aggregate::{balance_and_fee, BalanceAndFee};
use wos_client::config::{ClientConfig, Credentials};
use wos_client::invoice::is_lightning_invoice;
use wos_client::logging::init_tracing;
use wos_client::sweep;
use wos_client::transport::HttpTransport;
use wos_client::WalletError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let Some(destination) = std::env::args().nth(1) else {
        eprintln!("usage: wos-probe <address-or-invoice>");
        return ExitCode::from(2);
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling");
                cancel.cancel();
            }
        });
    }

    match run(&destination, &cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), error = %e, "Probe failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(destination: &str, cancel: &CancellationToken) -> Result<(), WalletError> {
    let config = ClientConfig::from_env()?;
    let credentials = Credentials::from_env()?;
    info!(base_url = %config.base_url, "Starting probe");

    let transport = Arc::new(HttpTransport::new(config)?);
    let reader = Arc::new(credentials.reader(transport));

    let BalanceAndFee { balance, fees } = balance_and_fee(reader, destination, cancel).await?;
    info!(
        confirmed = balance.confirmed,
        unconfirmed = balance.unconfirmed,
        "Balance"
    );

    let amount = if is_lightning_invoice(destination) {
        sweep::sweep_lightning(&balance, &fees)?
    } else {
        sweep::sweep_on_chain(&balance, &fees)?.amount
    };

    println!("{amount:.8}");
    Ok(())
}
