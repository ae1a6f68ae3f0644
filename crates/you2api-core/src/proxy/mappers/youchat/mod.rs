//! Translation between OpenAI chat completions and the YouChat search API.
//!
//! Request path: [`history::normalize_system_messages`] →
//! [`history::fold_history`] → [`externalize::ContentExternalizer`] →
//! [`request::UpstreamRequestParams`]. Response path: [`streaming`].

pub mod estimation;
pub mod externalize;
pub mod history;
pub mod models;
pub mod request;
pub mod streaming;

pub use estimation::{estimate_text_tokens, estimate_tokens};
pub use externalize::{ContentExternalizer, ExternalizedConversation};
pub use history::{fold_history, normalize_system_messages, FoldedConversation};
pub use models::{ExternalizedSource, HistoryEntry, UploadedFile};
pub use request::UpstreamRequestParams;
pub use streaming::{collect_completion, create_openai_sse_stream, ResponseContext};
