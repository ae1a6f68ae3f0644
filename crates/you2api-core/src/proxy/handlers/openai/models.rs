// OpenAI models listing
use super::*;

use chrono::Utc;
use you2api_types::protocol::ModelList;

pub async fn handle_list_models(State(state): State<AppState>) -> impl IntoResponse {
    let ids = state.models.public_model_ids();
    debug!("[OpenAI-Models] Listing {} models", ids.len());
    Json(ModelList::new(ids, Utc::now().timestamp()))
}
