use shared::error::StoreException;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with an explicit error payload.
    #[error("store rejected request (status {status}): {exception}")]
    Rejected {
        status: u16,
        exception: StoreException,
    },
    #[error("store transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("row store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            exception: StoreException {
                code: None,
                message: message.into(),
            },
        }
    }

    /// True when the store itself reported the failure, as opposed to the
    /// request never completing.
    pub fn is_store_reported(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
