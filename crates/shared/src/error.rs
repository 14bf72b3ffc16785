use serde::Deserialize;
use thiserror::Error;

/// Error payload returned by the row store on a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreErrorBody {
    pub code: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl StoreErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Store-reported failure, keyed by the store's error code when it sent one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .code.as_deref().unwrap_or("store_error"), .message)]
pub struct StoreException {
    pub code: Option<String>,
    pub message: String,
}

impl From<StoreErrorBody> for StoreException {
    fn from(value: StoreErrorBody) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}
