//! reqwest plumbing shared by the HTTP adapters.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ProviderError;

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}

/// Decodes a success body, or turns a non-success status into a
/// `BackendStatus` error that keeps the raw body.
pub(crate) async fn read_json<T>(response: Response) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let mut error = ProviderError::backend_status(status.as_u16(), body.clone());
        if let Some(detail) = extract_error_message(&body) {
            error.message = format!("{}: {detail}", error.message);
        }
        return Err(error);
    }

    response
        .json::<T>()
        .await
        .map_err(|err| ProviderError::transport(format!("failed to decode response: {err}")))
}

/// Understands both `{"error": "..."}` and `{"error": {"message": "..."}}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<Value>(body).ok()?;
    match parsed.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(object) => object
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_duplicate_slashes() {
        assert_eq!(
            endpoint("http://localhost:11434/", "/api/chat"),
            "http://localhost:11434/api/chat"
        );
        assert_eq!(
            endpoint("https://api.deepseek.com", "chat/completions"),
            "https://api.deepseek.com/chat/completions"
        );
    }

    #[test]
    fn error_message_is_extracted_from_both_shapes() {
        assert_eq!(
            extract_error_message(r#"{"error":"model 'x' not found"}"#).as_deref(),
            Some("model 'x' not found")
        );
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"Authentication Fails","type":"auth"}}"#)
                .as_deref(),
            Some("Authentication Fails")
        );
        assert_eq!(extract_error_message("<html>bad gateway</html>"), None);
    }
}
