//! Passenger wallet operations: balance, top-ups, fare payments, history.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::decode;

/// Current wallet balance (GET /wallet/balance).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    pub amount_cents: i64,
    pub currency: String,
}

/// A ledger entry (GET /wallet/transactions).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// "topup", "fare", or "withdrawal"
    pub kind: String,
    pub amount_cents: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Wrapper for the transactions API response.
/// The API returns {"transactions": [...]} not a bare array.
#[derive(Debug, Clone, Deserialize)]
struct TransactionsResponse {
    transactions: Vec<Transaction>,
}

/// Receipt for a completed top-up (POST /wallet/topups).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopUpReceipt {
    pub id: String,
    pub status: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub gateway_reference: Option<String>,
}

/// The payload encoded in a vehicle operator's QR code.
///
/// Scanning and decoding the QR image is the app's job; by the time it
/// reaches this service it is already structured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FareQr {
    pub operator_id: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub route: Option<String>,
}

/// Receipt for a paid fare (POST /payments/fares).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FareReceipt {
    pub id: String,
    pub status: String,
    pub amount_cents: i64,
    pub operator_id: String,
}

/// Passenger wallet service.
pub struct WalletService {
    client: Arc<ApiClient>,
}

impl WalletService {
    /// Create a wallet service bound to a client.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch the current wallet balance.
    ///
    /// GET /wallet/balance
    pub async fn balance(&self) -> Result<Balance, ApiError> {
        let response = self.client.get("/wallet/balance").await?;
        decode(&response)
    }

    /// Top up the wallet through the payment gateway.
    ///
    /// POST /wallet/topups
    pub async fn top_up(
        &self,
        amount_cents: i64,
        payment_method: &str,
    ) -> Result<TopUpReceipt, ApiError> {
        let body = serde_json::json!({
            "amount_cents": amount_cents,
            "payment_method": payment_method,
        });
        let response = self.client.post_json("/wallet/topups", &body).await?;
        decode(&response)
    }

    /// Pay a transit fare to the operator identified by a scanned QR code.
    ///
    /// POST /payments/fares
    pub async fn pay_fare(&self, qr: &FareQr, amount_cents: i64) -> Result<FareReceipt, ApiError> {
        let body = serde_json::json!({
            "operator_id": qr.operator_id,
            "vehicle_id": qr.vehicle_id,
            "route": qr.route,
            "amount_cents": amount_cents,
        });
        let response = self.client.post_json("/payments/fares", &body).await?;
        let receipt: FareReceipt = decode(&response)?;
        tracing::debug!(receipt = %receipt.id, operator = %receipt.operator_id, "fare paid");
        Ok(receipt)
    }

    /// Fetch the most recent ledger entries.
    ///
    /// GET /wallet/transactions?limit=N
    pub async fn transactions(&self, limit: u32) -> Result<Vec<Transaction>, ApiError> {
        let response = self
            .client
            .get(&format!("/wallet/transactions?limit={}", limit))
            .await?;
        let wrapper: TransactionsResponse = decode(&response)?;
        Ok(wrapper.transactions)
    }
}
