use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use serde::{Deserialize, Serialize};

use secrecy::Secret;

use url::Url;

use crate::error::{Error, Result};

const POST_MESSAGE_METHOD: &str = "chat.postMessage";

/// Slack Web API client, bound to a single channel
#[derive(Debug)]
pub struct SlackClient {
    client: Client,
    channel: String,

    api_post_message_url: Url,
    bot_token: SlackBotToken,
}

impl SlackClient {
    pub fn new(
        channel: String,
        api_timeout: Duration,
        api_base_url: Url,
        bot_token: SlackBotToken,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let api_post_message_url = api_base_url
            .join(POST_MESSAGE_METHOD)
            .context("Failed to create post message endpoint URL")?;

        Ok(Self {
            client,
            channel,
            api_post_message_url,
            bot_token,
        })
    }

    /// Post a message to the configured channel
    #[tracing::instrument(name = "Post Slack message", skip(self, message), fields(channel = %self.channel))]
    pub async fn post_message(&self, message: &SlackMessage) -> Result<()> {
        use secrecy::ExposeSecret;

        let body = PostMessageRequest {
            channel: &self.channel,
            text: &message.text,
            blocks: &message.blocks,
        };

        let response: PostMessageResponse = self
            .client
            .post(self.api_post_message_url.clone())
            .bearer_auth(self.bot_token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Slack reports most failures with a 200 and `ok: false`
        if !response.ok {
            let reason = response.error.unwrap_or_else(|| "unknown_error".into());
            return Err(Error::SlackApiError(reason));
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct SlackBotToken(Secret<String>);

impl FromStr for SlackBotToken {
    type Err = Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Infallible> {
        Ok(Self(Secret::new(value.to_string())))
    }
}

impl From<Secret<String>> for SlackBotToken {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl secrecy::ExposeSecret<String> for SlackBotToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

/// A message with Block Kit layout and a plain-text fallback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackMessage {
    pub text: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: TextObject,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
    },
    Context {
        elements: Vec<TextObject>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    Mrkdwn { text: String },
    PlainText { text: String, emoji: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: TextObject,
        value: String,
        url: String,
    },
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    blocks: &'a [Block],
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}
