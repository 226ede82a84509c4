//! Driver-side operations: fare collections and withdrawal requests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::decode;

/// Today's collected fares (GET /driver/collections).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionsSummary {
    pub total_cents: i64,
    pub fare_count: u32,
    pub currency: String,
}

/// Receipt for a withdrawal request (POST /driver/withdrawals).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalReceipt {
    pub id: String,
    /// "pending", "approved", or "rejected"
    pub status: String,
    pub amount_cents: i64,
}

/// Driver service.
pub struct DriverService {
    client: Arc<ApiClient>,
}

impl DriverService {
    /// Create a driver service bound to a client.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch the fares collected so far today.
    ///
    /// GET /driver/collections
    pub async fn collections_today(&self) -> Result<CollectionsSummary, ApiError> {
        let response = self.client.get("/driver/collections").await?;
        decode(&response)
    }

    /// Request a withdrawal of collected fares.
    ///
    /// POST /driver/withdrawals
    pub async fn request_withdrawal(
        &self,
        amount_cents: i64,
    ) -> Result<WithdrawalReceipt, ApiError> {
        let body = serde_json::json!({ "amount_cents": amount_cents });
        let response = self.client.post_json("/driver/withdrawals", &body).await?;
        let receipt: WithdrawalReceipt = decode(&response)?;
        tracing::debug!(withdrawal = %receipt.id, status = %receipt.status, "withdrawal requested");
        Ok(receipt)
    }
}
