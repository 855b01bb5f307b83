use std::{env, time::Duration};

use log::*;
use relay_common::Secret;

const DEFAULT_FORWARD_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone)]
pub struct AccountingConfig {
    /// Fully qualified URL of the accounting endpoint that receives transaction records.
    pub endpoint: String,
    /// Optional bearer token for the accounting API. Sent as `Authorization: Bearer …` when set.
    pub api_key: Option<Secret<String>>,
    /// Hard cap on the duration of each forwarding attempt.
    pub timeout: Duration,
    /// Disables TLS certificate verification on the outbound connection. **DANGER**
    pub accept_invalid_certs: bool,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self { endpoint: String::default(), api_key: None, timeout: DEFAULT_FORWARD_TIMEOUT, accept_invalid_certs: false }
    }
}

impl AccountingConfig {
    pub fn new_from_env_or_default() -> Self {
        let endpoint = env::var("ORS_ACCOUNTING_URL").unwrap_or_else(|_| {
            error!(
                "🪛️ ORS_ACCOUNTING_URL is not set. Please set it to the URL of the accounting API. Every forwarding \
                 attempt will fail until it is configured."
            );
            String::default()
        });
        let api_key = env::var("ORS_ACCOUNTING_API_KEY").ok().map(Secret::new);
        if api_key.is_none() {
            info!("🪛️ ORS_ACCOUNTING_API_KEY is not set. Requests to the accounting API will not carry a bearer token.");
        }
        let timeout = env::var("ORS_FORWARD_TIMEOUT_MS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid value for ORS_FORWARD_TIMEOUT_MS ({s}). {e}"))
                    .ok()
            })
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_FORWARD_TIMEOUT);
        Self { endpoint, api_key, timeout, accept_invalid_certs: false }
    }
}
