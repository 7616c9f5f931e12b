// ABOUTME: Per-vendor protocol adapters
// ABOUTME: One module per provider kind; each speaks that vendor's native API

pub mod anthropic;
pub mod gemini;
pub mod openai;

/// Treat empty strings as "no text": vendors occasionally return an empty
/// content block, and an empty instruction is useless to the caller.
pub(crate) fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}
