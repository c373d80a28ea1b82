//! Request descriptor
//!
//! The body and headers of one streaming chat-completions call.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WikiError};

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role/content pair of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// JSON body of a chat-completions request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatRequest {
    /// A streaming request with a system instruction followed by one user
    /// message.
    pub fn streaming(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            stream: true,
        }
    }
}

/// Immutable description of one outbound streaming request.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    endpoint: String,
    headers: HeaderMap,
    body: ChatRequest,
}

impl StreamRequest {
    /// Build the descriptor, deriving the JSON, SSE and bearer headers.
    pub fn new(endpoint: impl Into<String>, api_key: &str, body: ChatRequest) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            WikiError::ConfigurationError("API key is not a valid header value".to_string())
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(Self {
            endpoint: endpoint.into(),
            headers,
            body,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &ChatRequest {
        &self.body
    }

    /// Turn the descriptor into a POST on `client`, serializing the body.
    pub fn into_request_builder(
        self,
        client: &reqwest::Client,
    ) -> Result<reqwest::RequestBuilder> {
        let body = serde_json::to_vec(&self.body)?;
        Ok(client
            .post(self.endpoint)
            .headers(self.headers)
            .body(body))
    }
}
