use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Fast(#[from] fast_engine::FastError),

    #[error("store error: {0}")]
    Store(#[from] fast_store::StoreError),

    #[error("bank error: {0}")]
    Bank(#[from] fast_types::BankError),

    #[error("config error: {0}")]
    Config(String),

    #[error("genesis error: {0}")]
    Genesis(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
