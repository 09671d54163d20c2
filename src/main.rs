use std::net::TcpListener;

use anyhow::Context;

use churn_relay::app;
use churn_relay::client::SlackClient;
use churn_relay::controller::webhooks::CustomerPortal;
use churn_relay::crypto::WebhookSigningKey;
use churn_relay::settings::Settings;
use churn_relay::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    let subscriber = telemetry::create_subscriber(settings.log.filter(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let slack_client = SlackClient::new(
        settings.slack.channel_id(),
        settings.slack.api_timeout(),
        settings.slack.api_base_url()?,
        settings.slack.bot_token(),
    )?;

    let signing_key = settings
        .webhook
        .signing_secret()
        .map(WebhookSigningKey::new)
        .transpose()
        .context("Failed to create webhook signing key")?;
    if signing_key.is_none() {
        tracing::warn!("No webhook signing secret configured, signatures will not be verified");
    }

    let customer_portal = CustomerPortal(settings.webhook.customer_portal_url()?);

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening for webhooks on {}", listener.local_addr()?);

    app::run(listener, slack_client, signing_key, customer_portal)?
        .await
        .context("Failed to run app")
}
