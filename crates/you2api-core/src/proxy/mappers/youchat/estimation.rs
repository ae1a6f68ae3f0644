//! Token estimation used for the inline-vs-upload budget.

use you2api_types::models::TokenWeights;
use you2api_types::protocol::ChatMessage;

use crate::error::{BridgeError, BridgeResult};

/// Estimate one message's cost: `trunc(ascii * w_a + non_ascii * w_n) + overhead`.
///
/// ASCII means code point <= 127.
pub fn estimate_text_tokens(text: &str, weights: &TokenWeights) -> BridgeResult<u32> {
    let mut ascii_chars = 0u64;
    let mut non_ascii_chars = 0u64;

    for c in text.chars() {
        if c.is_ascii() {
            ascii_chars += 1;
        } else {
            non_ascii_chars += 1;
        }
    }

    let weighted = ascii_chars as f64 * weights.ascii + non_ascii_chars as f64 * weights.non_ascii;
    if !weighted.is_finite() || weighted < 0.0 || weighted.trunc() > f64::from(u32::MAX) {
        return Err(BridgeError::TokenCount(weighted));
    }

    (weighted.trunc() as u32)
        .checked_add(weights.per_message_overhead)
        .ok_or(BridgeError::TokenCount(weighted))
}

/// Sum of [`estimate_text_tokens`] over every message.
pub fn estimate_tokens(messages: &[ChatMessage], weights: &TokenWeights) -> BridgeResult<u32> {
    messages.iter().try_fold(0u32, |total, message| {
        let tokens = estimate_text_tokens(&message.content, weights)?;
        total.checked_add(tokens).ok_or(BridgeError::TokenCount(f64::from(total) + f64::from(tokens)))
    })
}
