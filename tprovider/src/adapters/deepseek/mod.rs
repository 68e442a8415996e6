//! DeepSeek chat client over the OpenAI-compatible `/chat/completions` API.

mod client;
mod serde_api;

pub use client::DeepSeekClient;
