// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Write Operations
//!
//! A [`Wallet`] pairs a [`Reader`] with a [`Signer`] so it can issue signed
//! write requests: invoices, payments and sweeps. Every write goes through
//! [`Wallet::post_request`], which draws a fresh nonce and asks the signer
//! for a signature before the transport sees the request.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::aggregate::balance_and_fee;
use crate::auth::{RequestAuthenticator, Signer};
use crate::error::WalletError;
use crate::invoice::parse_invoice_amount;
use crate::models::{
    Addresses, BalanceSnapshot, CreateInvoiceRequest, FeeEstimate, Invoice, InvoiceOptions,
    Payment, SendPaymentRequest,
};
use crate::reader::{AccountReader, Reader};
use crate::sweep;
use crate::transport::{endpoints, Transport};

/// A wallet with write access.
#[derive(Clone)]
pub struct Wallet {
    reader: Arc<Reader>,
    authenticator: RequestAuthenticator,
    transport: Arc<dyn Transport>,
    addresses: Addresses,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("addresses", &self.addresses)
            .finish_non_exhaustive()
    }
}

impl Wallet {
    /// Open a wallet, fetching its deposit addresses once.
    pub async fn open(reader: Reader, signer: Arc<dyn Signer>) -> Result<Self, WalletError> {
        let addresses = reader.addresses().await?;
        let authenticator = RequestAuthenticator::new(reader.api_token(), signer);
        let transport = reader.transport();

        info!(lightning_address = %addresses.lightning, "Wallet opened");

        Ok(Self {
            reader: Arc::new(reader),
            authenticator,
            transport,
            addresses,
        })
    }

    pub fn lightning_address(&self) -> &str {
        &self.addresses.lightning
    }

    /// On-chain deposit address as of [`Wallet::open`]. The service may
    /// rotate it; [`Wallet::addresses`] fetches the current one.
    pub fn on_chain_address(&self) -> &str {
        &self.addresses.on_chain
    }

    pub fn reader(&self) -> &Reader {
        &self.reader
    }

    pub async fn addresses(&self) -> Result<Addresses, WalletError> {
        self.reader.addresses().await
    }

    pub async fn balance(&self) -> Result<BalanceSnapshot, WalletError> {
        self.reader.balance().await
    }

    pub async fn fee_estimate(&self, destination: &str) -> Result<FeeEstimate, WalletError> {
        self.reader.fee_estimate(destination).await
    }

    /// Serialize `body`, sign it and POST it to `endpoint`, returning the raw
    /// response body.
    pub async fn post_request<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Vec<u8>, WalletError> {
        let body = serde_json::to_string(body)
            .map_err(|e| WalletError::InvalidRequest(format!("serializing body: {e}")))?;
        let request = self.authenticator.authenticate(endpoint, body).await?;

        debug!(endpoint = %endpoint, "Posting signed request");
        self.transport.post(&request).await
    }

    async fn post_json<B, T>(
        &self,
        operation: &'static str,
        endpoint: &str,
        body: &B,
    ) -> Result<T, WalletError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.post_request(endpoint, body).await?;
        serde_json::from_slice(&response).map_err(|e| WalletError::invalid_response(operation, e))
    }

    /// Issue a new BOLT11 invoice.
    pub async fn new_invoice(&self, opts: &InvoiceOptions) -> Result<Invoice, WalletError> {
        if opts.amount < 0.0 || !opts.amount.is_finite() {
            return Err(WalletError::InvalidRequest(format!(
                "invalid invoice amount: {}",
                opts.amount
            )));
        }

        self.post_json(
            "NewInvoice",
            endpoints::CREATE_INVOICE,
            &CreateInvoiceRequest::from(opts),
        )
        .await
    }

    async fn send_payment(
        &self,
        operation: &'static str,
        request: SendPaymentRequest,
    ) -> Result<Payment, WalletError> {
        let payment: Payment = self.post_json(operation, endpoints::PAYMENT, &request).await?;
        info!(
            operation,
            payment_id = %payment.id,
            amount = payment.amount,
            status = ?payment.status,
            "Payment submitted"
        );
        Ok(payment)
    }

    /// Pay an invoice that carries its own amount.
    ///
    /// Variable-amount invoices fail with [`WalletError::NoAmount`]; use
    /// [`Wallet::pay_variable_invoice`] for those.
    pub async fn pay_invoice(&self, invoice: &str, description: &str) -> Result<Payment, WalletError> {
        let amount = parse_invoice_amount(invoice)?;
        self.send_payment(
            "PayInvoice",
            SendPaymentRequest::lightning(invoice, amount.to_btc(), description),
        )
        .await
    }

    /// Pay `amount` BTC to an invoice that leaves the amount to the payer.
    pub async fn pay_variable_invoice(
        &self,
        invoice: &str,
        description: &str,
        amount: f64,
    ) -> Result<Payment, WalletError> {
        require_variable_amount(invoice)?;
        self.send_payment(
            "PayVariableInvoice",
            SendPaymentRequest::lightning(invoice, amount, description),
        )
        .await
    }

    pub async fn pay_on_chain(
        &self,
        address: &str,
        amount: f64,
        description: &str,
    ) -> Result<Payment, WalletError> {
        self.send_payment(
            "PayOnChain",
            SendPaymentRequest::on_chain(address, amount, description),
        )
        .await
    }

    /// Send the whole confirmed balance, less the maximum routing fee, to a
    /// variable-amount invoice.
    pub async fn sweep_lightning(
        &self,
        invoice: &str,
        description: &str,
        cancel: &CancellationToken,
    ) -> Result<Payment, WalletError> {
        require_variable_amount(invoice)?;

        let snapshot = balance_and_fee(Arc::clone(&self.reader), invoice, cancel).await?;
        let amount = sweep::sweep_lightning(&snapshot.balance, &snapshot.fees)?;

        let mut request = SendPaymentRequest::lightning(invoice, amount, description);
        request.max_lightning = true;
        self.send_payment("SweepLightning", request).await
    }

    /// Send the whole confirmed balance, less fixed fee and commission, to an
    /// on-chain address.
    pub async fn sweep_on_chain(
        &self,
        address: &str,
        description: &str,
        cancel: &CancellationToken,
    ) -> Result<Payment, WalletError> {
        let snapshot = balance_and_fee(Arc::clone(&self.reader), address, cancel).await?;
        let sweep = sweep::sweep_on_chain(&snapshot.balance, &snapshot.fees)?;

        let mut request = SendPaymentRequest::on_chain(address, sweep.amount, description);
        request.max_bitcoin = true;
        self.send_payment("SweepOnChain", request).await
    }
}

/// Succeeds only for a well-formed invoice with no embedded amount.
fn require_variable_amount(invoice: &str) -> Result<(), WalletError> {
    match parse_invoice_amount(invoice) {
        Err(WalletError::NoAmount) => Ok(()),
        Ok(_) => Err(WalletError::FixedAmount),
        Err(e) => Err(e),
    }
}
