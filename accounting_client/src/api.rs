use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::Value;

use crate::{config::AccountingConfig, AccountingApiError, TransactionRecord};

/// Anything that can deliver a transaction record to the accounting backend.
///
/// There is exactly one production implementation ([`AccountingApi`]); the seam exists so the
/// webhook handler can be exercised against a mock backend in tests.
#[allow(async_fn_in_trait)]
pub trait TransactionForwarder {
    /// Deliver the record downstream. Exactly one attempt is made. On success, the response body
    /// of the accounting API is returned.
    async fn forward(&self, record: &TransactionRecord) -> Result<Value, AccountingApiError>;
}

#[derive(Clone)]
pub struct AccountingApi {
    config: AccountingConfig,
    client: Arc<Client>,
}

impl AccountingApi {
    pub fn new(config: AccountingConfig) -> Result<Self, AccountingApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let mut val = HeaderValue::from_str(&format!("Bearer {}", key.reveal()))
                .map_err(|e| AccountingApiError::Initialization(e.to_string()))?;
            val.set_sensitive(true);
            headers.insert("Authorization", val);
        }
        if config.accept_invalid_certs {
            warn!(
                "🚨️🚨️🚨️ TLS certificate verification is DISABLED for the accounting API connection. Never run a \
                 production instance like this. 🚨️🚨️🚨️"
            );
        }
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| AccountingApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// POST `record` as JSON to the configured endpoint. One attempt, bounded by the configured
    /// timeout. No retry, no backoff.
    pub async fn post_transaction(&self, record: &TransactionRecord) -> Result<Value, AccountingApiError> {
        trace!("🧾️ Forwarding transaction {} to {}", record.id, self.config.endpoint);
        let response = self.client.post(&self.config.endpoint).json(record).send().await.map_err(|e| {
            if e.is_timeout() {
                AccountingApiError::Timeout
            } else {
                AccountingApiError::RequestError(e.to_string())
            }
        })?;
        let status = response.status();
        if status.is_success() {
            trace!("🧾️ Accounting API accepted transaction {}. {status}", record.id);
            let body = response.text().await.map_err(|e| AccountingApiError::RequestError(e.to_string()))?;
            // Some accounting backends acknowledge with a bare string rather than a JSON document
            let body = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            Ok(body)
        } else {
            let message = response.text().await.map_err(|e| AccountingApiError::RequestError(e.to_string()))?;
            Err(AccountingApiError::RemoteError { status: status.as_u16(), message })
        }
    }
}

impl TransactionForwarder for AccountingApi {
    async fn forward(&self, record: &TransactionRecord) -> Result<Value, AccountingApiError> {
        self.post_transaction(record).await
    }
}
