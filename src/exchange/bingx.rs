// =================================================================
// exchange/bingx.rs - BingX Perpetual Swap REST Client
// =================================================================

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use log::{debug, info};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use url::form_urlencoded;

use super::{errors::ExchangeError, OrderGateway};
use crate::order::{OrderParams, PositionMode};

// Constants
pub const BINGX_API_URL: &str = "https://open-api.bingx.com";
const ORDER_PATH: &str = "/openApi/swap/v2/trade/order";
const POSITION_SIDE_PATH: &str = "/openApi/swap/v1/positionSide/dual";
const API_KEY_HEADER: &str = "X-BX-APIKEY";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

type HmacSha256 = Hmac<Sha256>;

/// API key pair of a BingX (sub-)account
#[derive(Clone)]
pub struct BingxCredentials {
    pub api_key: String,
    pub secret_key: String,
}

impl BingxCredentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl std::fmt::Debug for BingxCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BingxCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Signed REST client for the BingX perpetual swap API
pub struct BingxClient {
    api_url: String,
    credentials: BingxCredentials,
    recv_window_ms: Option<u64>,
    timeout: Duration,
    client: reqwest::Client,
}

impl BingxClient {
    pub fn new(credentials: BingxCredentials) -> Self {
        Self {
            api_url: BINGX_API_URL.to_string(),
            credentials,
            recv_window_ms: None,
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_recv_window(mut self, recv_window_ms: Option<u64>) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Signs `params` and performs the request, returning the `data` payload
    async fn send_signed(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ExchangeError> {
        let query = build_query(params, chrono::Utc::now().timestamp_millis(), self.recv_window_ms);
        let signature = sign_query(&query, &self.credentials.secret_key)?;
        let url = format!("{}{}?{}&signature={}", self.api_url, path, query, signature);

        debug!("{} {}{}?{}", method, self.api_url, path, query);

        let response = self
            .client
            .request(method, &url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ExchangeError::Api {
                code: i64::from(status.as_u16()),
                msg: format!("HTTP {}: {}", status, body),
            });
        }

        unwrap_envelope(&body)
    }
}

#[async_trait]
impl OrderGateway for BingxClient {
    async fn place_order(&self, params: &OrderParams) -> Result<Value, ExchangeError> {
        let data = self
            .send_signed(Method::POST, ORDER_PATH, &order_query_pairs(params))
            .await?;
        Ok(order_payload(data))
    }

    async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<Value, ExchangeError> {
        let params = [("symbol", symbol.to_string()), ("orderId", order_id.to_string())];
        let data = self.send_signed(Method::DELETE, ORDER_PATH, &params).await?;
        Ok(order_payload(data))
    }

    async fn position_mode(&self, sub_account_id: Option<&str>) -> Result<PositionMode, ExchangeError> {
        if let Some(sub_account_id) = sub_account_id {
            // The endpoint reports for whichever account owns the API key.
            debug!("Position mode lookup for sub-account {} uses the configured key", sub_account_id);
        }

        let data = self.send_signed(Method::GET, POSITION_SIDE_PATH, &[]).await?;
        let mode = parse_position_mode(&data)?;
        info!("📐 Position mode: {}", mode);
        Ok(mode)
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Http(err.to_string())
    }
}

/// Wire names of the order parameters, in the order they are signed
fn order_query_pairs(params: &OrderParams) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("symbol", params.symbol.clone()),
        ("side", params.side.clone()),
        ("type", params.order_type.clone()),
        ("quantity", params.quantity.clone()),
    ];

    let optional = [
        ("price", &params.price),
        ("stopPrice", &params.stop_price),
        ("positionSide", &params.position_side),
        ("workingType", &params.working_type),
        ("clientOrderID", &params.client_order_id),
        ("reduceOnly", &params.reduce_only),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            pairs.push((name, value.clone()));
        }
    }

    pairs
}

/// Query string that gets signed: params in insertion order, then timestamp and recvWindow.
/// Keys and values are form-encoded, so the signed text is exactly what goes on the wire.
pub fn build_query(params: &[(&str, String)], timestamp_ms: i64, recv_window_ms: Option<u64>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }

    query.append_pair("timestamp", &timestamp_ms.to_string());
    if let Some(recv_window) = recv_window_ms {
        query.append_pair("recvWindow", &recv_window.to_string());
    }

    query.finish()
}

/// Hex-encoded HMAC-SHA256 of the query string
pub fn sign_query(query: &str, secret_key: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| ExchangeError::Signing(e.to_string()))?;
    mac.update(query.as_bytes());

    Ok(mac
        .finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect())
}

/// BingX response envelope: `{"code": 0, "msg": "", "data": {...}}`
#[derive(Debug, Deserialize)]
struct BingxEnvelope {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

fn unwrap_envelope(body: &str) -> Result<Value, ExchangeError> {
    let envelope: BingxEnvelope = serde_json::from_str(body)?;

    if envelope.code != 0 {
        return Err(ExchangeError::Api {
            code: envelope.code,
            msg: envelope.msg,
        });
    }

    Ok(envelope.data)
}

/// Order endpoints wrap the order object as `data.order`
fn order_payload(mut data: Value) -> Value {
    if let Some(order) = data.as_object_mut().and_then(|map| map.remove("order")) {
        return order;
    }
    data
}

/// `data` of the dual-side position endpoint; the flag arrives as "true"/"false"
#[derive(Debug, Deserialize)]
struct DualSidePosition {
    #[serde(rename = "dualSidePosition")]
    dual_side_position: Value,
}

fn parse_position_mode(data: &Value) -> Result<PositionMode, ExchangeError> {
    let parsed = DualSidePosition::deserialize(data)?;
    let dual = match &parsed.dual_side_position {
        Value::Bool(flag) => *flag,
        Value::String(flag) => flag.eq_ignore_ascii_case("true"),
        _ => false,
    };

    Ok(if dual { PositionMode::Hedge } else { PositionMode::OneWay })
}
