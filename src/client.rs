//! Wiki Client
//!
//! Caller-facing entry point: turns a keyword into a streaming request and
//! hands the response to a [`StreamConsumer`].

use secrecy::ExposeSecret;

use crate::cancel::CancelHandle;
use crate::config::WikiConfig;
use crate::error::{Result, WikiError};
use crate::prompt::{PromptMode, build_user_prompt};
use crate::request::{ChatRequest, StreamRequest};
use crate::streaming::{
    FragmentStream, FragmentStreamHandle, Outcome, StreamCallbacks, StreamConsumer, StreamEvent,
};

/// Streams encyclopedia entries from a chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct WikiClient {
    config: WikiConfig,
    consumer: StreamConsumer,
}

impl WikiClient {
    /// Validate `config` and build an HTTP client with its connect timeout.
    pub fn new(config: WikiConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| {
                WikiError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
            })?;
        Self::with_http_client(config, http)
    }

    /// Use a caller-provided HTTP client.
    pub fn with_http_client(config: WikiConfig, http: reqwest::Client) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            consumer: StreamConsumer::new(http),
        })
    }

    /// Build a client from `LLM_API_URL` / `LLM_API_KEY` / `LLM_MODEL`.
    pub fn from_env() -> Result<Self> {
        Self::new(WikiConfig::from_env()?)
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    /// The request descriptor for `keyword`: the configured system
    /// instruction followed by one user message.
    pub fn build_request(&self, keyword: &str, mode: PromptMode) -> Result<StreamRequest> {
        let body = ChatRequest::streaming(
            self.config.model.clone(),
            self.config.system_prompt.clone(),
            build_user_prompt(keyword, mode),
        );
        StreamRequest::new(
            self.config.endpoint.clone(),
            self.config.api_key.expose_secret(),
            body,
        )
    }

    /// Stream an entry for `keyword` into `callbacks`.
    ///
    /// Triggering `cancel` closes the connection and ends the call silently:
    /// neither `on_complete` nor `on_error` fires afterwards.
    pub async fn fetch_stream_wiki<C>(
        &self,
        keyword: &str,
        mode: PromptMode,
        callbacks: &mut C,
        cancel: Option<&CancelHandle>,
    ) -> Outcome
    where
        C: StreamCallbacks + ?Sized,
    {
        match self.build_request(keyword, mode) {
            Ok(request) => self.consumer.consume(request, callbacks, cancel).await,
            Err(err) => {
                callbacks.on_error(&err);
                Outcome::Failed(err)
            }
        }
    }

    /// Stream an entry for `keyword` as a [`FragmentStream`].
    pub fn stream_wiki(
        &self,
        keyword: &str,
        mode: PromptMode,
        cancel: CancelHandle,
    ) -> FragmentStream {
        match self.build_request(keyword, mode) {
            Ok(request) => self.consumer.stream(request, cancel),
            Err(err) => Box::pin(futures::stream::once(async move {
                Err::<StreamEvent, _>(err)
            })),
        }
    }

    /// Like [`stream_wiki`](Self::stream_wiki), creating a fresh cancel handle.
    pub fn stream_wiki_with_cancel(
        &self,
        keyword: &str,
        mode: PromptMode,
    ) -> FragmentStreamHandle {
        let cancel = CancelHandle::new();
        FragmentStreamHandle {
            stream: self.stream_wiki(keyword, mode, cancel.clone()),
            cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Role;

    fn client() -> WikiClient {
        WikiClient::new(WikiConfig::new("http://localhost:9/v1/chat/completions", "k")).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = WikiClient::new(WikiConfig::new("localhost", "k")).unwrap_err();
        assert!(matches!(err, WikiError::ConfigurationError(_)));
    }

    #[test]
    fn request_has_system_then_user_message() {
        let req = client()
            .build_request("Chow Chow", PromptMode::ModelLabel)
            .unwrap();
        let body = req.body();
        assert_eq!(body.model, WikiConfig::DEFAULT_MODEL);
        assert!(body.stream);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, Role::System);
        assert_eq!(body.messages[0].content, WikiConfig::DEFAULT_SYSTEM_PROMPT);
        assert_eq!(body.messages[1].role, Role::User);
        assert!(body.messages[1].content.contains("Chow Chow"));
    }

    #[test]
    fn modes_produce_different_user_messages() {
        let c = client();
        let label = c.build_request("Koala", PromptMode::ModelLabel).unwrap();
        let topic = c.build_request("Koala", PromptMode::Topic).unwrap();
        assert_ne!(label.body().messages[1], topic.body().messages[1]);
        assert_eq!(label.body().messages[0], topic.body().messages[0]);
    }
}
