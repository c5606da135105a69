pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::{ConfigError, GatewayConfig};
pub use error::{ApiError, ApiResult};
pub use service::{AppState, build_router, create_app};
