// =================================================================
// exchange/errors.rs - Exchange Error Types
// =================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Network error: {0}")]
    Http(String),

    #[error("BingX API error {code}: {msg}")]
    Api { code: i64, msg: String },

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Signing error: {0}")]
    Signing(String),
}
