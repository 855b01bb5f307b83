use std::env;

use accounting_client::AccountingConfig;
use log::*;
use relay_common::parse_boolean_flag;

const DEFAULT_ORS_HOST: &str = "127.0.0.1";
const DEFAULT_ORS_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// When true, TLS verification on the outbound accounting connection is disabled and error
    /// responses carry the downstream failure detail. **DANGER** Never enable in production.
    pub development_mode: bool,
    /// Connection settings for the downstream accounting API.
    pub accounting_config: AccountingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ORS_HOST.to_string(),
            port: DEFAULT_ORS_PORT,
            development_mode: false,
            accounting_config: AccountingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("ORS_HOST").ok().unwrap_or_else(|| DEFAULT_ORS_HOST.into());
        let port = env::var("ORS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for ORS_PORT. {e} Using the default, {DEFAULT_ORS_PORT}, instead."
                    );
                    DEFAULT_ORS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_ORS_PORT);
        let development_mode = parse_boolean_flag(env::var("ORS_DEVELOPMENT_MODE").ok(), false);
        let mut accounting_config = AccountingConfig::new_from_env_or_default();
        if development_mode {
            warn!(
                "🚨️🚨️🚨️ ORS_DEVELOPMENT_MODE is set. TLS verification for the accounting API is disabled and error \
                 responses expose downstream detail. Never run a production instance like this. 🚨️🚨️🚨️"
            );
            accounting_config.accept_invalid_certs = true;
        }
        Self { host, port, development_mode, accounting_config }
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// The subset of the server configuration that request handlers need. Generally we try to keep this
/// as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    pub development_mode: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { development_mode: config.development_mode }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_is_production_safe() {
        let config = ServerConfig::default();
        assert!(!config.development_mode);
        assert!(!config.accounting_config.accept_invalid_certs);
        assert_eq!(config.port, 8360);
    }
}
