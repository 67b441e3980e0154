use log::error;

use bingx_order_service::cli::{dispatch, exit_code, parse_args};
use bingx_order_service::config::load_config;
use bingx_order_service::logging::init_logging;
use bingx_order_service::OrderService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(exit_code(&e));
        }
    };

    init_logging();

    let config = load_config(cli.config.as_deref()).inspect_err(|e| {
        error!("❌ Failed to load configuration: {:#}", e);
    })?;
    let service = OrderService::new(config.build_client());

    let output = dispatch(&service, &cli.command).await?;
    println!("{}", output);

    Ok(())
}
