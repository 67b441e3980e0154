pub mod exchange;
pub mod order;
pub mod service;

#[cfg(feature = "bingx_exec")]
pub mod cli;

#[cfg(feature = "bingx_exec")]
pub mod config;

#[cfg(feature = "bingx_exec")]
pub mod logging;

pub use order::{CancelResult, OrderRequest, OrderResult, PositionMode, Side};
pub use service::OrderService;
