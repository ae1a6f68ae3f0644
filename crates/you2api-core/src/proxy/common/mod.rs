//! Common utilities module
//!
//! Shared helpers for handlers, mappers, and the upstream client.

pub mod client_builder;
pub mod model_mapping;
pub mod random_id;
pub mod sse_parser;

pub use model_mapping::{ModelMapper, ModelSelection};
