//! # you2api Core
//!
//! OpenAI-compatible chat-completion bridge onto a conversational search API.
//!
//! ## Architecture
//!
//! ```text
//! you2api-core/src/
//! ├── error.rs          # BridgeError + HTTP status mapping
//! ├── modules/          # config loading, logger init
//! └── proxy/
//!     ├── mappers/      # history folding, externalization, request build, SSE translation
//!     ├── upstream/     # YouChatApi trait + reqwest client
//!     ├── handlers/     # axum handlers (chat, models, liveness, health, metrics)
//!     ├── middleware/   # bearer extraction, CORS, request metrics
//!     ├── passthrough.rs
//!     ├── prometheus.rs
//!     └── server.rs     # AppState, router, AxumServer
//! ```

#![allow(
    clippy::significant_drop_tightening,
    reason = "Guards in async code require careful lifetime management"
)]
#![allow(clippy::map_err_ignore, reason = "Error context is provided in the replacement message")]
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::indexing_slicing
    )
)]

pub mod error;
pub mod modules;
pub mod proxy;

pub use error::{BridgeError, BridgeResult};
pub use you2api_types::models::AppConfig;
