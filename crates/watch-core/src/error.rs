use thiserror::Error;

/// Failures of the sample history collaborator. Always propagated to the
/// caller — the core never retries the store itself.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Rejected alert-condition parameters. Raised synchronously at
/// construction; a valid condition is never re-validated later.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors from notification channels.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("webhook error: {0}")]
    Webhook(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures of the upstream price feed.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("price feed unavailable: {0}")]
    Unavailable(String),

    #[error("no price for symbol {0}")]
    UnknownSymbol(String),
}
