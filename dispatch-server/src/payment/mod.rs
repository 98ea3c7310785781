//! Payment Collaborator Boundary
//!
//! The payment provider is an opaque capability: a charge either
//! succeeds with a transaction reference or fails. Integration goes
//! over its REST API directly (no SDK dependency).

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("payment provider unreachable: {0}")]
    Unreachable(String),
}

/// Port for the payment provider; substitutable with test doubles.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Charge `amount` against the user's payment method. Returns the
    /// provider's transaction reference on success.
    async fn charge(
        &self,
        user_id: &str,
        amount: f64,
        payment_method_id: &str,
    ) -> Result<String, PaymentError>;
}

/// REST payment client
pub struct HttpPaymentClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpPaymentClient {
    pub fn new(base_url: String, secret_key: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url,
            secret_key,
        }
    }
}

#[derive(Deserialize)]
struct ChargeResponse {
    transaction_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    async fn charge(
        &self,
        user_id: &str,
        amount: f64,
        payment_method_id: &str,
    ) -> Result<String, PaymentError> {
        let amount = format!("{amount:.2}");
        let resp = self
            .http
            .post(format!("{}/v1/charges", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[
                ("user_id", user_id),
                ("amount", amount.as_str()),
                ("payment_method_id", payment_method_id),
            ])
            .send()
            .await
            .map_err(|e| PaymentError::Unreachable(e.to_string()))?;

        let body: ChargeResponse = resp
            .json()
            .await
            .map_err(|e| PaymentError::Unreachable(format!("invalid response body: {e}")))?;

        match body.transaction_id {
            Some(txn) => Ok(txn),
            None => Err(PaymentError::Declined(
                body.error.unwrap_or_else(|| "unknown reason".into()),
            )),
        }
    }
}
