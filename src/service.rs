//! Order submission / cancellation adapters.
//!
//! Every fallible step ends in exactly one envelope; nothing propagates past
//! `place_order` / `cancel_order`.

use log::{error, info, warn};
use serde_json::Value;

use crate::exchange::OrderGateway;
use crate::order::{CancelResult, OrderParams, OrderRequest, OrderResult, PositionMode};

pub const PLACE_FAILED: &str = "Order placement failed";
pub const CANCEL_FAILED: &str = "Cancel failed";
const DEFAULT_STATUS: &str = "NEW";

/// Owns the exchange client and maps requests/responses for it
pub struct OrderService<G: OrderGateway> {
    gateway: G,
}

impl<G: OrderGateway> OrderService<G> {
    pub fn new(gateway: G) -> Self {
        info!("✅ Order service initialized");
        Self { gateway }
    }

    #[cfg(test)]
    pub(crate) fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Decode a JSON order request and place it
    pub async fn place_order_json(&self, payload: &str, sub_account_id: Option<&str>) -> OrderResult {
        match OrderRequest::from_json(payload) {
            Ok(order) => self.place_order(&order, sub_account_id).await,
            Err(e) => {
                error!("❌ Error placing order: {}", e);
                OrderResult::failed(e)
            }
        }
    }

    pub async fn place_order(&self, order: &OrderRequest, sub_account_id: Option<&str>) -> OrderResult {
        let mut params = OrderParams::from_request(order);

        // Hedge mode rejects reduceOnly outright, so it is only sent in one-way mode.
        if let Some(reduce_only) = order.reduce_only {
            if self.position_mode(sub_account_id).await != PositionMode::Hedge {
                params.set_reduce_only(reduce_only);
            }
        }

        info!("📤 Placing order: {}", params);

        let response = match self.gateway.place_order(&params).await {
            Ok(response) => response,
            Err(e) => {
                error!("❌ Error placing order: {}", e);
                return OrderResult::failed(e);
            }
        };

        match order_id(&response) {
            Some(order_id) => {
                info!("✅ Order placed successfully: {}", order_id);
                OrderResult::Placed {
                    order_id,
                    client_order_id: text_field(&response, "clientOrderId")
                        .or_else(|| text_field(&response, "clientOrderID")),
                    status: text_field(&response, "status").unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                    symbol: text_field(&response, "symbol"),
                    side: text_field(&response, "side"),
                    position_side: text_field(&response, "positionSide"),
                }
            }
            None => {
                error!("❌ Order placement failed: {}", response);
                OrderResult::Failed {
                    error: PLACE_FAILED.to_string(),
                    details: Some(response),
                }
            }
        }
    }

    /// Ask the exchange for the account's position mode; one-way when it cannot tell
    pub async fn position_mode(&self, sub_account_id: Option<&str>) -> PositionMode {
        match self.gateway.position_mode(sub_account_id).await {
            Ok(mode) => mode,
            Err(e) => {
                warn!("⚠️ Could not determine position mode: {}", e);
                PositionMode::OneWay
            }
        }
    }

    pub async fn cancel_order(&self, order_id: &str, symbol: &str, sub_account_id: Option<&str>) -> CancelResult {
        if let Some(sub_account_id) = sub_account_id {
            info!("Cancelling {} on behalf of sub-account {}", order_id, sub_account_id);
        }

        let response = match self.gateway.cancel_order(symbol, order_id).await {
            Ok(response) => response,
            Err(e) => {
                error!("❌ Error cancelling order: {}", e);
                return CancelResult::failed(e);
            }
        };

        match self::order_id(&response) {
            Some(cancelled_id) => {
                info!("🗑️ Order cancelled: {}", order_id);
                CancelResult::Cancelled {
                    order_id: cancelled_id,
                    status: text_field(&response, "status"),
                }
            }
            None => {
                error!("❌ Cancel failed: {}", response);
                CancelResult::Failed {
                    error: CANCEL_FAILED.to_string(),
                    details: Some(response),
                }
            }
        }
    }
}

/// Exchange order id as text; BingX sends it as a 64-bit number
fn order_id(response: &Value) -> Option<String> {
    match response.get("orderId")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Echoed response fields are typed as text; scalars of other types keep their JSON spelling
fn text_field(response: &Value, key: &str) -> Option<String> {
    match response.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
