use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountingApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the accounting API: {0}")]
    RequestError(String),
    #[error("The accounting API did not respond within the configured timeout")]
    Timeout,
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("The accounting API rejected the transaction. Error {status}. {message}")]
    RemoteError { status: u16, message: String },
}
