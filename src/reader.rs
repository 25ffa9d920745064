// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only wallet access.
//!
//! A [`Reader`] only holds the API token, so it can fetch balances, fee
//! quotes and history but never move funds.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::WalletError;
use crate::invoice::parse_invoice_amount;
use crate::models::{Addresses, BalanceSnapshot, FeeEstimate, Payment};
use crate::transport::{endpoints, Transport};

/// Balance and fee-quote capability consumed by
/// [`crate::aggregate::balance_and_fee`].
#[async_trait]
pub trait AccountReader: Send + Sync {
    async fn balance(&self) -> Result<BalanceSnapshot, WalletError>;

    /// Fee quote for paying `destination` (on-chain address or invoice).
    async fn fee_estimate(&self, destination: &str) -> Result<FeeEstimate, WalletError>;
}

/// Read-only view of a wallet.
#[derive(Clone)]
pub struct Reader {
    api_token: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Reader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader").finish_non_exhaustive()
    }
}

impl Reader {
    pub fn new(api_token: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_token: api_token.into(),
            transport,
        }
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// GET `endpoint` and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        endpoint: &str,
    ) -> Result<T, WalletError> {
        let body = self.transport.get(endpoint, &self.api_token).await?;
        serde_json::from_slice(&body).map_err(|e| WalletError::invalid_response(operation, e))
    }

    /// Re-fetch the deposit addresses, e.g. for a fresh on-chain address.
    pub async fn addresses(&self) -> Result<Addresses, WalletError> {
        let addresses: Addresses = self.get_json("Addresses", endpoints::ACCOUNT).await?;
        if addresses.on_chain.is_empty() {
            return Err(WalletError::invalid_response("Addresses", "unsupported region"));
        }
        Ok(addresses)
    }

    /// List payments, oldest first.
    pub async fn list_payments(&self) -> Result<Vec<Payment>, WalletError> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("skip", "0")
            .append_pair("reverse", "false")
            .finish();
        self.get_json("ListPayments", &format!("{}?{query}", endpoints::PAYMENT))
            .await
    }
}

#[async_trait]
impl AccountReader for Reader {
    async fn balance(&self) -> Result<BalanceSnapshot, WalletError> {
        self.get_json("Balance", endpoints::BALANCE).await
    }

    async fn fee_estimate(&self, destination: &str) -> Result<FeeEstimate, WalletError> {
        let endpoint = format!("{}?{}", endpoints::FEE_ESTIMATE, fee_estimate_query(destination));
        debug!(invoice = crate::invoice::is_lightning_invoice(destination), "Requesting fee estimate");
        self.get_json("FeeEstimate", &endpoint).await
    }
}

/// Query string for a fee estimate. Invoices with an embedded amount also
/// send that amount, with 11 decimals of BTC.
fn fee_estimate_query(destination: &str) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if !destination.is_empty() {
        query.append_pair("address", destination);
    }
    if let Ok(amount) = parse_invoice_amount(destination) {
        query.append_pair("amount", &format!("{:.11}", amount.to_btc()));
    }
    query.finish()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::AuthenticatedRequest;
    use crate::transport::TransportError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned responses keyed by endpoint path (query excluded).
    #[derive(Default)]
    pub(crate) struct StubTransport {
        pub responses: HashMap<&'static str, String>,
        pub gets: Mutex<Vec<(String, String)>>,
        pub posts: Mutex<Vec<AuthenticatedRequest>>,
    }

    impl StubTransport {
        pub fn with(mut self, endpoint: &'static str, body: &str) -> Self {
            self.responses.insert(endpoint, body.to_string());
            self
        }

        fn respond(&self, method: &'static str, endpoint: &str) -> Result<Vec<u8>, WalletError> {
            let path = endpoint.split('?').next().unwrap_or(endpoint);
            self.responses
                .get(path)
                .map(|body| body.as_bytes().to_vec())
                .ok_or_else(|| {
                    TransportError::Status {
                        method,
                        endpoint: endpoint.to_string(),
                        status: 404,
                        message: "not found".to_string(),
                    }
                    .into()
                })
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, endpoint: &str, api_token: &str) -> Result<Vec<u8>, WalletError> {
            self.gets
                .lock()
                .unwrap()
                .push((endpoint.to_string(), api_token.to_string()));
            self.respond("GET", endpoint)
        }

        async fn post(&self, request: &AuthenticatedRequest) -> Result<Vec<u8>, WalletError> {
            self.posts.lock().unwrap().push(request.clone());
            self.respond("POST", &request.endpoint)
        }
    }

    const TOKEN: &str = "93b9c574-30a2-4bf5-81ba-f9feadb313a7";

    #[tokio::test]
    async fn balance_uses_token_and_decodes() {
        let transport = Arc::new(
            StubTransport::default().with(endpoints::BALANCE, r#"{"btc":0.01,"btcUnconfirmed":0.002}"#),
        );
        let reader = Reader::new(TOKEN, transport.clone());

        let balance = reader.balance().await.unwrap();
        assert_eq!(balance.confirmed, 0.01);
        assert_eq!(balance.unconfirmed, 0.002);

        let gets = transport.gets.lock().unwrap();
        assert_eq!(gets[0], (endpoints::BALANCE.to_string(), TOKEN.to_string()));
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let transport = Arc::new(StubTransport::default().with(endpoints::BALANCE, "<html>"));
        let reader = Reader::new(TOKEN, transport);
        assert!(matches!(
            reader.balance().await,
            Err(WalletError::InvalidResponse { operation: "Balance", .. })
        ));
    }

    #[tokio::test]
    async fn addresses_require_on_chain_support() {
        let transport = Arc::new(StubTransport::default().with(
            endpoints::ACCOUNT,
            r#"{"btcDepositAddress":"","lightningAddress":"dorsalpuma54@walletofsatoshi.com"}"#,
        ));
        let reader = Reader::new(TOKEN, transport);
        let err = reader.addresses().await.unwrap_err();
        assert!(err.to_string().contains("unsupported region"));
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let reader = Reader::new(TOKEN, Arc::new(StubTransport::default()));
        let err = reader.fee_estimate("bc1q").await.unwrap_err();
        assert_eq!(err.error_code(), "transport_error");
    }

    #[tokio::test]
    async fn list_payments_reads_oldest_first() {
        let transport = Arc::new(StubTransport::default().with(
            endpoints::PAYMENT,
            r#"[
                {"id":"p1","address":"dorsalpuma54@walletofsatoshi.com","amount":0.0001,"currency":"LIGHTNING","expires":"2024-03-02T12:00:00Z","time":"2024-03-01T12:00:00Z","transactionId":"9f1c","status":"PAID","type":"CREDIT"},
                {"id":"p2","address":"bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq","amount":0.00005,"currency":"BTC","expires":"","time":"2024-03-03T08:30:00Z","status":"PENDING","type":"DEBIT"}
            ]"#,
        ));
        let reader = Reader::new(TOKEN, transport.clone());

        let payments = reader.list_payments().await.unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].id, "p1");
        assert_eq!(payments[0].currency, crate::models::PaymentCurrency::Lightning);
        assert!(payments[0].expires.is_some());
        assert_eq!(payments[1].status, crate::models::PaymentStatus::Pending);
        assert_eq!(payments[1].expires, None);
        assert!(payments[0].time < payments[1].time);

        let gets = transport.gets.lock().unwrap();
        assert_eq!(
            gets[0],
            (
                "/api/v1/wallet/payment?skip=0&reverse=false".to_string(),
                TOKEN.to_string()
            )
        );
    }

    #[test]
    fn fee_query_for_address_has_no_amount() {
        assert_eq!(
            fee_estimate_query("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"),
            "address=bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"
        );
        assert_eq!(fee_estimate_query(""), "");
    }

    #[test]
    fn fee_query_for_fixed_invoice_carries_amount() {
        let query = fee_estimate_query("lnbc2500u1qpzry9x8gf2tvdw0s3jntstgx9");
        assert_eq!(
            query,
            "address=lnbc2500u1qpzry9x8gf2tvdw0s3jntstgx9&amount=0.00250000000"
        );
    }

    #[test]
    fn fee_query_for_variable_invoice_has_no_amount() {
        let query = fee_estimate_query("lnbc1qpzry9x8gf2tvdw0s3jnw370ln");
        assert_eq!(query, "address=lnbc1qpzry9x8gf2tvdw0s3jnw370ln");
    }
}
