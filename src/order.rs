//! Order request/response types shared by the service and the exchange transport.

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Side {
    #[serde(rename = "BUY", alias = "buy", alias = "Buy")]
    Buy,
    #[serde(rename = "SELL", alias = "sell", alias = "Sell")]
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account-level position mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionMode {
    /// Long and short on the same symbol net out
    #[default]
    OneWay,
    /// Long and short legs coexist
    Hedge,
}

impl fmt::Display for PositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionMode::OneWay => f.write_str("one-way"),
            PositionMode::Hedge => f.write_str("hedge"),
        }
    }
}

/// Generic order request as received on the command line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    /// MARKET, LIMIT, STOP_MARKET, TAKE_PROFIT_MARKET, ...
    #[serde(rename = "type")]
    pub order_type: String,
    /// Accepts JSON numbers and numeric strings
    pub quantity: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub position_side: Option<String>,
    #[serde(default)]
    pub working_type: Option<String>,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub reduce_only: Option<bool>,
}

impl OrderRequest {
    pub fn new(symbol: impl Into<String>, side: Side, order_type: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: order_type.into(),
            quantity,
            price: None,
            stop_price: None,
            position_side: None,
            working_type: None,
            client_order_id: None,
            reduce_only: None,
        }
    }

    pub fn from_json(payload: &str) -> Result<Self, OrderError> {
        serde_json::from_str(payload).map_err(OrderError::InvalidRequest)
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    pub fn with_position_side(mut self, position_side: impl Into<String>) -> Self {
        self.position_side = Some(position_side.into());
        self
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }

    pub fn with_reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = Some(reduce_only);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid order request: {0}")]
    InvalidRequest(#[source] serde_json::Error),
}

/// Parameter set sent to the exchange. Decimals travel as strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderParams {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: String,
    pub price: Option<String>,
    pub stop_price: Option<String>,
    pub position_side: Option<String>,
    pub working_type: Option<String>,
    pub client_order_id: Option<String>,
    /// "true" / "false"
    pub reduce_only: Option<String>,
}

impl OrderParams {
    /// Builds the parameter set without the reduce-only flag; the caller decides
    /// on that one after resolving the position mode.
    pub fn from_request(order: &OrderRequest) -> Self {
        Self {
            symbol: order.symbol.clone(),
            side: order.side.as_str().to_string(),
            order_type: order.order_type.clone(),
            quantity: order.quantity.to_string(),
            price: non_zero(order.price),
            stop_price: non_zero(order.stop_price),
            position_side: non_empty(&order.position_side),
            working_type: non_empty(&order.working_type),
            client_order_id: non_empty(&order.client_order_id),
            reduce_only: None,
        }
    }

    pub fn set_reduce_only(&mut self, reduce_only: bool) {
        self.reduce_only = Some(reduce_only.to_string());
    }
}

impl fmt::Display for OrderParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} qty={}",
            self.symbol, self.side, self.order_type, self.quantity
        )?;
        let optional = [
            ("price", &self.price),
            ("stopPrice", &self.stop_price),
            ("positionSide", &self.position_side),
            ("workingType", &self.working_type),
            ("clientOrderId", &self.client_order_id),
            ("reduceOnly", &self.reduce_only),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                write!(f, " {}={}", name, value)?;
            }
        }
        Ok(())
    }
}

fn non_zero(value: Option<Decimal>) -> Option<String> {
    value.filter(|v| !v.is_zero()).map(|v| v.to_string())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Outcome of an order placement
#[derive(Debug, Clone, PartialEq)]
pub enum OrderResult {
    Placed {
        order_id: String,
        client_order_id: Option<String>,
        status: String,
        symbol: Option<String>,
        side: Option<String>,
        position_side: Option<String>,
    },
    Failed {
        error: String,
        details: Option<Value>,
    },
}

impl OrderResult {
    pub fn failed(error: impl fmt::Display) -> Self {
        OrderResult::Failed {
            error: error.to_string(),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OrderResult::Placed { .. })
    }
}

impl Serialize for OrderResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OrderResult::Placed {
                order_id,
                client_order_id,
                status,
                symbol,
                side,
                position_side,
            } => {
                let mut map = serializer.serialize_map(Some(7))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("orderId", order_id)?;
                map.serialize_entry("clientOrderId", client_order_id)?;
                map.serialize_entry("status", status)?;
                map.serialize_entry("symbol", symbol)?;
                map.serialize_entry("side", side)?;
                map.serialize_entry("positionSide", position_side)?;
                map.end()
            }
            OrderResult::Failed { error, details } => serialize_failure(serializer, error, details),
        }
    }
}

/// Outcome of an order cancellation
#[derive(Debug, Clone, PartialEq)]
pub enum CancelResult {
    Cancelled {
        order_id: String,
        status: Option<String>,
    },
    Failed {
        error: String,
        details: Option<Value>,
    },
}

impl CancelResult {
    pub fn failed(error: impl fmt::Display) -> Self {
        CancelResult::Failed {
            error: error.to_string(),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CancelResult::Cancelled { .. })
    }
}

impl Serialize for CancelResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CancelResult::Cancelled { order_id, status } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("orderId", order_id)?;
                map.serialize_entry("status", status)?;
                map.end()
            }
            CancelResult::Failed { error, details } => serialize_failure(serializer, error, details),
        }
    }
}

fn serialize_failure<S: Serializer>(
    serializer: S,
    error: &str,
    details: &Option<Value>,
) -> Result<S::Ok, S::Error> {
    let len = if details.is_some() { 3 } else { 2 };
    let mut map = serializer.serialize_map(Some(len))?;
    map.serialize_entry("success", &false)?;
    map.serialize_entry("error", error)?;
    if let Some(details) = details {
        map.serialize_entry("details", details)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_request_accepts_numeric_and_string_decimals() {
        let order = OrderRequest::from_json(
            r#"{"symbol":"BTC-USDT","side":"BUY","type":"LIMIT","quantity":0.01,"price":"65000.5"}"#,
        )
        .unwrap();

        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.quantity, dec!(0.01));
        assert_eq!(order.price, Some(dec!(65000.5)));
        assert_eq!(order.reduce_only, None);
    }

    #[test]
    fn test_request_missing_symbol_is_rejected() {
        let err = OrderRequest::from_json(r#"{"side":"SELL","type":"MARKET","quantity":1}"#).unwrap_err();
        assert!(err.to_string().contains("symbol"));
    }

    #[test]
    fn test_request_lowercase_side() {
        let order =
            OrderRequest::from_json(r#"{"symbol":"ETH-USDT","side":"sell","type":"MARKET","quantity":"2"}"#).unwrap();
        assert_eq!(order.side, Side::Sell);
    }

    #[test]
    fn test_params_keep_decimal_text() {
        let order = OrderRequest::new("BTC-USDT", Side::Sell, "STOP_MARKET", dec!(0.010))
            .with_stop_price(dec!(61000.25))
            .with_position_side("SHORT");
        let params = OrderParams::from_request(&order);

        assert_eq!(params.quantity, "0.010");
        assert_eq!(params.stop_price.as_deref(), Some("61000.25"));
        assert_eq!(params.position_side.as_deref(), Some("SHORT"));
        assert_eq!(params.price, None);
        assert_eq!(params.reduce_only, None);
    }

    #[test]
    fn test_params_drop_zero_price_and_empty_strings() {
        let mut order = OrderRequest::new("BTC-USDT", Side::Buy, "MARKET", dec!(1)).with_price(Decimal::ZERO);
        order.working_type = Some(String::new());
        let params = OrderParams::from_request(&order);

        assert_eq!(params.price, None);
        assert_eq!(params.working_type, None);
    }

    #[test]
    fn test_placed_envelope_keeps_null_fields() {
        let result = OrderResult::Placed {
            order_id: "123".to_string(),
            client_order_id: None,
            status: "FILLED".to_string(),
            symbol: None,
            side: None,
            position_side: None,
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": true,
                "orderId": "123",
                "clientOrderId": null,
                "status": "FILLED",
                "symbol": null,
                "side": null,
                "positionSide": null
            })
        );
    }

    #[test]
    fn test_failure_envelope_omits_absent_details() {
        let value = serde_json::to_value(CancelResult::failed("timeout")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "timeout"}));

        let value = serde_json::to_value(CancelResult::Failed {
            error: "Cancel failed".to_string(),
            details: Some(json!({})),
        })
        .unwrap();
        assert_eq!(value, json!({"success": false, "error": "Cancel failed", "details": {}}));
    }
}
