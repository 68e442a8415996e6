use reqwest::Client;

use crate::adapters::http::{endpoint, map_send_error, read_json};
use crate::config::{DEEPSEEK_DEFAULT_ENDPOINT, DEEPSEEK_DEFAULT_MODEL};
use crate::{
    ChatRequest, ProviderClient, ProviderError, ProviderFuture, ProviderId, ProviderReply,
    SecretString,
};

use super::serde_api::{DeepSeekApiRequest, DeepSeekApiResponse};

#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
    default_model: String,
}

impl DeepSeekClient {
    /// Fails with a `Config` error when the key is blank.
    pub fn new(client: Client, api_key: SecretString) -> Result<Self, ProviderError> {
        if api_key.is_empty() {
            return Err(ProviderError::config("deepseek API key must not be empty"));
        }

        Ok(Self {
            client,
            api_key,
            base_url: DEEPSEEK_DEFAULT_ENDPOINT.to_string(),
            default_model: DEEPSEEK_DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ProviderClient for DeepSeekClient {
    fn id(&self) -> ProviderId {
        ProviderId::DeepSeek
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn chat<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
        Box::pin(async move {
            let body = DeepSeekApiRequest::from(request);
            let response = self
                .client
                .post(endpoint(&self.base_url, "chat/completions"))
                .bearer_auth(self.api_key.expose())
                .json(&body)
                .send()
                .await
                .map_err(map_send_error)?;

            let parsed = read_json::<DeepSeekApiResponse>(response).await?;
            Ok(parsed.into())
        })
    }
}
