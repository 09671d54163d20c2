use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use url::Url;

use crate::client::SlackBotToken;

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub log: LogSettings,
    pub slack: SlackSettings,
    pub webhook: WebhookSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        let path = env::current_dir()?.join("settings");
        // `APP_ENV` picks the runtime overlay, defaulting to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }

    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(File::from(base_path.join("base")).required(true))
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // NOTE: Secrets belong here, as `APP_<settings category>__<setting name>`
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    filter: String,
}

impl LogSettings {
    /// Default tracing filter directive, used when `RUST_LOG` is unset
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

#[derive(Debug, Deserialize)]
pub struct SlackSettings {
    api_base_url: String,
    bot_token: Secret<String>,
    channel_id: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
}

impl SlackSettings {
    /// The channel notifications are posted to
    pub fn channel_id(&self) -> String {
        self.channel_id.clone()
    }
    /// The Slack REST API timeout duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    /// The base URL for the Slack Web API
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        parse_base_url(&self.api_base_url).context("Failed to parse Slack base URL")
    }
    /// The bot token to authorize Slack requests with
    pub fn bot_token(&self) -> SlackBotToken {
        self.bot_token.clone().into()
    }
}

#[derive(Debug, Deserialize)]
pub struct WebhookSettings {
    signing_secret: Option<Secret<String>>,
    customer_portal_url: String,
}

impl WebhookSettings {
    /// Secret used to verify webhook signatures; verification is skipped without one
    pub fn signing_secret(&self) -> Option<&Secret<String>> {
        self.signing_secret.as_ref()
    }
    /// Base URL of the billing portal page for a subscription
    pub fn customer_portal_url(&self) -> anyhow::Result<Url> {
        parse_base_url(&self.customer_portal_url).context("Failed to parse customer portal URL")
    }
}

/// Parse a URL that relative paths will be joined onto
fn parse_base_url(value: &str) -> Result<Url, url::ParseError> {
    if value.ends_with('/') {
        Url::parse(value)
    } else {
        Url::parse(&format!("{}/", value))
    }
}
