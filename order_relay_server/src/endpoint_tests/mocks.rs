use accounting_client::{AccountingApiError, TransactionForwarder, TransactionRecord};
use mockall::mock;
use serde_json::Value;

mock! {
    pub Forwarder {}
    impl TransactionForwarder for Forwarder {
        async fn forward(&self, record: &TransactionRecord) -> Result<Value, AccountingApiError>;
    }
}
