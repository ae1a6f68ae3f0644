//! Application, bridge, and passthrough configuration models.

mod app;
mod bridge;
mod passthrough;

pub use app::AppConfig;
pub use bridge::{BridgeConfig, TokenWeights};
pub use passthrough::PassthroughConfig;
