//! OpenAI-compatible HTTP transport.
//!
//! One provider type covers the Hugging Face router and any other endpoint
//! that accepts the chat-completions body; only headers and URL differ.

use crate::{General, LLM, Message, Request, Response};
use anyhow::{Context, Result};
use reqwest::{
    Client,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};

/// Hugging Face inference router, OpenAI-compatible surface.
pub const ROUTER_ENDPOINT: &str = "https://router.huggingface.co/v1/chat/completions";

/// Provider name that lets the router pick a backend itself.
pub const DEFAULT_PROVIDER: &str = "auto";

/// A chat-completions client bound to one endpoint.
#[derive(Clone)]
pub struct HttpProvider {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
}

impl HttpProvider {
    /// Endpoint authenticated with `Authorization: Bearer <key>`.
    pub fn bearer(client: Client, key: &str, endpoint: impl Into<String>) -> Result<Self> {
        let mut headers = json_headers();
        headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint without authentication, e.g. a local server.
    pub fn no_auth(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            headers: json_headers(),
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint authenticated with an arbitrary header.
    pub fn custom_header(
        client: Client,
        name: &str,
        value: &str,
        endpoint: impl Into<String>,
    ) -> Result<Self> {
        let mut headers = json_headers();
        headers.insert(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.into(),
        })
    }

    /// The Hugging Face router, authenticated with an HF token.
    pub fn router(client: Client, token: &str) -> Result<Self> {
        Self::bearer(client, token, ROUTER_ENDPOINT)
    }

    /// Request headers sent with every call.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Target URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LLM for HttpProvider {
    async fn send(&self, config: &General, messages: &[Message]) -> Result<Response> {
        let body = Request::from(config.clone()).messages(messages);
        tracing::debug!("request: {}", serde_json::to_string(&body)?);
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.endpoint))?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("response ({status}): {text}");
        if !status.is_success() {
            anyhow::bail!("inference request failed with {status}: {text}");
        }
        serde_json::from_str(&text).context("malformed chat completion response")
    }
}

/// Compose the router model identifier.
///
/// The router selects a backend from a `model:provider` suffix; `auto`
/// or an empty provider leaves the choice to the router.
pub fn model_id(model: &str, provider: &str) -> String {
    if provider.is_empty() || provider == DEFAULT_PROVIDER {
        model.to_owned()
    } else {
        format!("{model}:{provider}")
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}
