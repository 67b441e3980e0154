// exchange/mod.rs
pub mod errors;

#[cfg(feature = "bingx_exec")]
pub mod bingx;

pub use errors::ExchangeError;

#[cfg(feature = "bingx_exec")]
pub use bingx::BingxClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::order::{OrderParams, PositionMode};

/// Order-management capabilities the service needs from an exchange client.
///
/// Responses are handed back raw: the service decides what counts as success
/// and echoes the raw payload to the caller when it does not.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit a new order
    async fn place_order(&self, params: &OrderParams) -> Result<Value, ExchangeError>;

    /// Cancel an open order by exchange order id
    async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<Value, ExchangeError>;

    /// Current position mode of the (sub-)account
    async fn position_mode(&self, sub_account_id: Option<&str>) -> Result<PositionMode, ExchangeError>;
}

