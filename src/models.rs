// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures exchanged with the wallet API. Amounts
//! are bitcoin-denominated `f64` values because that is what the service
//! speaks on the wire; exact millisatoshi arithmetic lives in
//! [`crate::invoice::DecodedAmount`].
//!
//! ## Model Categories
//!
//! - **Account state**: [`BalanceSnapshot`], [`FeeEstimate`], [`Addresses`]
//! - **Payments**: [`Payment`] and the outgoing [`SendPaymentRequest`]
//! - **Invoices**: [`Invoice`] and [`InvoiceOptions`]

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Account State
// =============================================================================

/// On-chain and lightning deposit addresses of a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Addresses {
    #[serde(rename = "btcDepositAddress", default)]
    pub on_chain: String,
    #[serde(rename = "lightningAddress", default)]
    pub lightning: String,
}

/// Wallet balance at a point in time.
///
/// The service also reports a `lightning` figure, which is unreliable (it can
/// go negative) and deliberately not modelled. `btc` is the real confirmed
/// balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BalanceSnapshot {
    #[serde(rename = "btc")]
    pub confirmed: f64,
    #[serde(rename = "btcUnconfirmed", default)]
    pub unconfirmed: f64,
}

impl BalanceSnapshot {
    /// Sum of the confirmed and unconfirmed balances.
    pub fn total(&self) -> f64 {
        self.confirmed + self.unconfirmed
    }
}

/// Fee quote for paying one specific destination.
///
/// Only valid for the destination/amount pair it was requested for; do not
/// reuse it for another destination.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    /// Flat on-chain fee in BTC
    pub btc_fixed_fee: f64,
    /// Miner fee rate in BTC per kB
    #[serde(rename = "btcMinerFeePerKb")]
    pub btc_miner_fee_per_kb: f64,
    /// Commission rate charged on on-chain sends, as a fraction
    pub btc_send_commission_percent: f64,
    #[serde(default)]
    pub btc_send_fee_warning_percent: f64,
    #[serde(default)]
    pub lightning_fee: f64,
    /// Upper bound on the routing fee of a lightning sweep
    #[serde(rename = "sendMaxLightningFee")]
    pub max_lightning_fee: f64,
    /// Whether the destination invoice belongs to another WoS wallet
    #[serde(rename = "wosInvoice", default)]
    pub is_wos_invoice: bool,
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Completed and confirmed
    Paid,
    /// An on-chain payment that is still confirming
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Credit,
    Debit,
    #[serde(other)]
    Unknown,
}

/// Settlement layer of a payment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentCurrency {
    #[serde(rename = "BTC")]
    Bitcoin,
    #[serde(rename = "LIGHTNING")]
    Lightning,
}

/// A received or sent payment as recorded by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    /// On-chain address, invoice or lightning address paid to
    pub address: String,
    pub amount: f64,
    pub currency: PaymentCurrency,
    #[serde(default)]
    pub description: String,
    /// Invoice expiry; absent for debits
    #[serde(default, deserialize_with = "empty_time_as_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(rename = "isLikelySpam", default)]
    pub is_likely_spam: bool,
    #[serde(rename = "isWosPos", default)]
    pub is_point_of_sale: bool,
    pub time: DateTime<Utc>,
    /// Transaction id, or payment hash for lightning
    #[serde(rename = "transactionId", default)]
    pub txid: String,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
}

/// Body of `POST /api/v1/wallet/payment`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendPaymentRequest {
    pub address: String,
    pub currency: PaymentCurrency,
    #[serde(skip_serializing_if = "is_zero")]
    pub amount: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "sendMaxLightning", skip_serializing_if = "std::ops::Not::not")]
    pub max_lightning: bool,
    #[serde(rename = "sendMaxBtc", skip_serializing_if = "std::ops::Not::not")]
    pub max_bitcoin: bool,
}

impl SendPaymentRequest {
    pub fn lightning(invoice: &str, amount: f64, description: &str) -> Self {
        Self {
            address: invoice.to_string(),
            currency: PaymentCurrency::Lightning,
            amount,
            description: description.to_string(),
            max_lightning: false,
            max_bitcoin: false,
        }
    }

    pub fn on_chain(address: &str, amount: f64, description: &str) -> Self {
        Self {
            address: address.to_string(),
            currency: PaymentCurrency::Bitcoin,
            amount,
            description: description.to_string(),
            max_lightning: false,
            max_bitcoin: false,
        }
    }
}

// =============================================================================
// Invoices
// =============================================================================

/// Options for [`crate::wallet::Wallet::new_invoice`].
///
/// The default is a variable-amount invoice with no description and the
/// service's default expiry of 24 hours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceOptions {
    /// Amount in BTC; zero leaves it to the payer
    pub amount: f64,
    pub description: String,
    pub expiry: Option<Duration>,
}

/// Body of `POST /api/v1/wallet/createInvoice`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub(crate) struct CreateInvoiceRequest {
    pub amount: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
}

impl From<&InvoiceOptions> for CreateInvoiceRequest {
    fn from(opts: &InvoiceOptions) -> Self {
        Self {
            amount: opts.amount,
            description: opts.description.clone(),
            expiry: opts.expiry.map(|e| e.as_secs()).filter(|secs| *secs > 0),
        }
    }
}

/// A BOLT11 invoice issued by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    /// Serialized BOLT11 string, for display or QR codes
    #[serde(rename = "invoice")]
    pub bolt11: String,
    #[serde(rename = "btcAmount", default)]
    pub amount: f64,
    pub expires: DateTime<Utc>,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

fn empty_time_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn balance_reads_wire_names() {
        let balance: BalanceSnapshot =
            serde_json::from_value(json!({ "btc": 0.5, "btcUnconfirmed": 0.25, "lightning": -1.0 }))
                .unwrap();
        assert_eq!(balance.confirmed, 0.5);
        assert_eq!(balance.unconfirmed, 0.25);
        assert_eq!(balance.total(), 0.75);
    }

    #[test]
    fn fee_estimate_reads_wire_names() {
        let fees: FeeEstimate = serde_json::from_value(json!({
            "btcFixedFee": 0.0001,
            "btcMinerFeePerKb": 0.00002,
            "btcSendCommissionPercent": 0.01,
            "btcSendFeeWarningPercent": 5.0,
            "lightningFee": 0.0,
            "sendMaxLightningFee": 0.00001,
            "wosInvoice": true
        }))
        .unwrap();
        assert_eq!(fees.btc_fixed_fee, 0.0001);
        assert_eq!(fees.btc_send_commission_percent, 0.01);
        assert_eq!(fees.max_lightning_fee, 0.00001);
        assert!(fees.is_wos_invoice);
    }

    #[test]
    fn payment_accepts_empty_expiry_and_unknown_status() {
        let payment: Payment = serde_json::from_value(json!({
            "id": "5b8f0c3e-0d7a-4c55-9d59-8f5a3f0f9e10",
            "address": "bc1qexample",
            "amount": 0.001,
            "currency": "BTC",
            "description": "",
            "expires": "",
            "time": "2024-03-01T12:00:00Z",
            "transactionId": "abcd",
            "status": "REFUNDED",
            "type": "DEBIT"
        }))
        .unwrap();
        assert_eq!(payment.expires, None);
        assert_eq!(payment.status, PaymentStatus::Unknown);
        assert_eq!(payment.payment_type, PaymentType::Debit);
        assert_eq!(payment.currency, PaymentCurrency::Bitcoin);
    }

    #[test]
    fn send_payment_request_omits_unset_fields() {
        let body = serde_json::to_value(SendPaymentRequest::lightning("lnbc1", 0.0, "")).unwrap();
        assert_eq!(body, json!({ "address": "lnbc1", "currency": "LIGHTNING" }));

        let mut sweep = SendPaymentRequest::on_chain("bc1q", 0.5, "sweep");
        sweep.max_bitcoin = true;
        let body = serde_json::to_value(sweep).unwrap();
        assert_eq!(body["sendMaxBtc"], json!(true));
        assert_eq!(body["amount"], json!(0.5));
        assert!(body.get("sendMaxLightning").is_none());
    }

    #[test]
    fn create_invoice_request_drops_zero_expiry() {
        let opts = InvoiceOptions {
            amount: 0.0001,
            description: "coffee".to_string(),
            expiry: Some(Duration::from_secs(0)),
        };
        let body = serde_json::to_value(CreateInvoiceRequest::from(&opts)).unwrap();
        assert_eq!(body, json!({ "amount": 0.0001, "description": "coffee" }));
    }
}
