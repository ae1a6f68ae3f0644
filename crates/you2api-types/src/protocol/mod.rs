//! Protocol definitions for the OpenAI-compatible surface.
//!
//! Only the ChatCompletions and Models shapes are modeled; the upstream
//! wire format lives next to its mapper in `you2api-core`.

pub mod openai;

pub use openai::{
    ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, ChatMessage, ChatRole, ChunkChoice,
    CompletionChoice, Delta, ModelCard, ModelList,
};
