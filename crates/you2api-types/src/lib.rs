//! # you2api Types
//!
//! Core types, configuration models, and error definitions for you2api.
//!
//! - **`error`** - Typed configuration errors
//! - **`models`** - Configuration models (app, bridge, passthrough)
//! - **`protocol`** - OpenAI ChatCompletions wire types
//!
//! ## Architecture Role
//!
//! `you2api-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        you2api-types (this crate)
//!                │
//!                ▼
//!          you2api-core
//!                │
//!                ▼
//!         you2api-server
//! ```

pub mod error;
pub mod models;
pub mod protocol;

pub use error::{ConfigError, Result};
pub use models::{AppConfig, BridgeConfig, PassthroughConfig, TokenWeights};
