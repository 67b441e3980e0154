//! Command-line surface: `place_order <json>` and `cancel_order <id> <symbol>`.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::exchange::OrderGateway;
use crate::service::OrderService;

/// Exit status for usage errors
pub const USAGE_EXIT: i32 = 1;

#[derive(Debug, Parser)]
#[command(name = "bingx_order_service")]
#[command(about = "Place and cancel BingX perpetual swap orders, printing a JSON result")]
pub struct Cli {
    /// YAML config file; BINGX_* environment variables override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Place an order described by a JSON object
    #[command(name = "place_order")]
    PlaceOrder {
        /// e.g. '{"symbol":"BTC-USDT","side":"BUY","type":"MARKET","quantity":0.01}'
        order_json: String,

        #[arg(long)]
        sub_account_id: Option<String>,
    },
    /// Cancel an order by exchange order id
    #[command(name = "cancel_order")]
    CancelOrder {
        order_id: String,
        symbol: String,

        #[arg(long)]
        sub_account_id: Option<String>,
    },
}

pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// `--help` / `--version` are not failures
pub fn exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { USAGE_EXIT } else { 0 }
}

/// Run one command and render its envelope as a single JSON line
pub async fn dispatch<G: OrderGateway>(service: &OrderService<G>, command: &Command) -> serde_json::Result<String> {
    match command {
        Command::PlaceOrder {
            order_json,
            sub_account_id,
        } => {
            let result = service
                .place_order_json(order_json, sub_account_id.as_deref())
                .await;
            serde_json::to_string(&result)
        }
        Command::CancelOrder {
            order_id,
            symbol,
            sub_account_id,
        } => {
            let result = service
                .cancel_order(order_id, symbol, sub_account_id.as_deref())
                .await;
            serde_json::to_string(&result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeError;
    use crate::order::{OrderParams, PositionMode};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoGateway;

    #[async_trait]
    impl OrderGateway for EchoGateway {
        async fn place_order(&self, params: &OrderParams) -> Result<Value, ExchangeError> {
            Ok(json!({"orderId": "1", "symbol": params.symbol, "side": params.side}))
        }

        async fn cancel_order(&self, _symbol: &str, _order_id: &str) -> Result<Value, ExchangeError> {
            Ok(json!({}))
        }

        async fn position_mode(&self, _sub_account_id: Option<&str>) -> Result<PositionMode, ExchangeError> {
            Ok(PositionMode::OneWay)
        }
    }

    #[test]
    fn test_parse_place_order() {
        let cli = parse_args(["prog", "place_order", r#"{"symbol":"BTC-USDT"}"#]).unwrap();
        assert_eq!(
            cli.command,
            Command::PlaceOrder {
                order_json: r#"{"symbol":"BTC-USDT"}"#.to_string(),
                sub_account_id: None,
            }
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_cancel_order_with_options() {
        let cli = parse_args([
            "prog",
            "cancel_order",
            "123",
            "BTC-USDT",
            "--sub-account-id",
            "sub-7",
            "--config",
            "service.yaml",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::CancelOrder {
                order_id: "123".to_string(),
                symbol: "BTC-USDT".to_string(),
                sub_account_id: Some("sub-7".to_string()),
            }
        );
        assert_eq!(cli.config, Some(PathBuf::from("service.yaml")));
    }

    #[test]
    fn test_usage_errors_exit_with_one() {
        for args in [
            vec!["prog"],
            vec!["prog", "place_order"],
            vec!["prog", "cancel_order", "123"],
            vec!["prog", "amend_order", "123"],
        ] {
            let err = parse_args(args.clone()).unwrap_err();
            assert_eq!(exit_code(&err), USAGE_EXIT, "args: {:?}", args);
        }
    }

    #[test]
    fn test_help_exits_cleanly() {
        let err = parse_args(["prog", "--help"]).unwrap_err();
        assert_eq!(exit_code(&err), 0);
    }

    #[tokio::test]
    async fn test_dispatch_renders_single_line_json() {
        let service = OrderService::new(EchoGateway);

        let placed = dispatch(
            &service,
            &Command::PlaceOrder {
                order_json: r#"{"symbol":"BTC-USDT","side":"BUY","type":"MARKET","quantity":"0.5"}"#.to_string(),
                sub_account_id: None,
            },
        )
        .await
        .unwrap();
        assert!(!placed.contains('\n'));
        assert_eq!(
            serde_json::from_str::<Value>(&placed).unwrap(),
            json!({
                "success": true,
                "orderId": "1",
                "clientOrderId": null,
                "status": "NEW",
                "symbol": "BTC-USDT",
                "side": "BUY",
                "positionSide": null
            })
        );

        let cancelled = dispatch(
            &service,
            &Command::CancelOrder {
                order_id: "123".to_string(),
                symbol: "BTC-USDT".to_string(),
                sub_account_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(cancelled, r#"{"success":false,"error":"Cancel failed","details":{}}"#);
    }
}
