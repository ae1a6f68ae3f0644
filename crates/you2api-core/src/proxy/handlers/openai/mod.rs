// OpenAI-compatible API handlers

mod chat;
mod models;

pub use chat::handle_chat_completions;
pub use models::handle_list_models;

use axum::{extract::State, response::IntoResponse, Json};
use tracing::{debug, info};

use crate::proxy::server::AppState;
