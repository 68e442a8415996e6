#[cfg(any(feature = "provider-ollama", feature = "provider-deepseek"))]
mod http;

#[cfg(feature = "provider-ollama")]
pub mod ollama;

#[cfg(feature = "provider-deepseek")]
pub mod deepseek;
