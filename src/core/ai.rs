// openai-style chat completions - one request, one reply

use crate::core::message::ChatMessage;
use crate::{Config, Error};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Anything that can turn an ordered message list into a reply.
#[async_trait]
pub trait Completion {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, Error>;
}

pub struct OpenAi {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

// what we send
#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

// what comes back
#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAi {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let api_key = config.api_key.clone().ok_or(Error::MissingApiKey)?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl Completion for OpenAi {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, Error> {
        let request = Request { model, messages };
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(%url, model, messages = messages.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::warn!(%status, "completion request failed");
            return Err(Error::Api(format!("{status}: {}", body.trim())));
        }

        // decode ourselves so a malformed body surfaces as a json error
        let body = response.text().await?;
        let response: Response = serde_json::from_str(&body)?;
        let reply = response
            .choices
            .into_iter()
            .next()
            .ok_or(Error::NoChoices)?;

        Ok(reply.message.content.unwrap_or_default())
    }
}
