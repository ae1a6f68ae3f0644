// Handlers - API endpoint handlers

pub mod common;
pub mod openai;

pub use common::{handle_health, handle_liveness, handle_metrics};
