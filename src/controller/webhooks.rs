use actix_web::dev::HttpServiceFactory;
use actix_web::http::header::HeaderMap;
use actix_web::{post, web, HttpRequest, HttpResponse};

use chrono::Utc;

use serde::{Deserialize, Serialize};

use url::Url;

use crate::client::SlackClient;
use crate::crypto::{WebhookSigningKey, SIGNATURE_HEADER};
use crate::domain::{compose_notification, message_body, Cancellation, WebhookBody};
use crate::error::{Error, RestResult, Result};

/// Base URL of the billing portal page for a subscription
#[derive(Debug, Clone)]
pub struct CustomerPortal(pub Url);

/// What became of an accepted webhook delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Notification posted to Slack
    Relayed,
    /// Session did not end in a cancellation
    Ignored,
    /// Cancellation carried no free-text answers
    NoFeedback,
    /// Body could not be read as a cancellation
    Malformed,
    /// Slack refused or could not be reached
    DeliveryFailed,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub outcome: Outcome,
}

// NOTE: Every delivery past the signature check is acknowledged with a 200,
// so the provider never retries a payload we cannot use.
#[tracing::instrument(
    name = "Relay cancellation webhook",
    skip(req, body, slack_client, signing_key, customer_portal),
    fields(outcome)
)]
#[post("")]
async fn relay(
    req: HttpRequest,
    body: web::Bytes,
    slack_client: web::Data<SlackClient>,
    signing_key: web::Data<Option<WebhookSigningKey>>,
    customer_portal: web::Data<CustomerPortal>,
) -> RestResult<HttpResponse> {
    if let Some(key) = signing_key.get_ref() {
        verify_signature(key, req.headers(), &body).map_err(|error| {
            tracing::warn!(error.cause_chain = ?error, "Rejecting unsigned webhook");
            error
        })?;
    }

    let outcome = relay_cancellation(&body, &slack_client, &customer_portal.0).await;
    tracing::Span::current().record("outcome", tracing::field::debug(&outcome));

    Ok(HttpResponse::Ok().json(WebhookResponse { outcome }))
}

fn verify_signature(key: &WebhookSigningKey, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .ok_or_else(|| Error::InvalidSignature("Missing signature header".into()))?
        .to_str()
        .map_err(|_| Error::InvalidSignature("Signature header is not ASCII".into()))?;

    key.verify(body, signature)
}

async fn relay_cancellation(body: &[u8], slack_client: &SlackClient, portal: &Url) -> Outcome {
    let body: WebhookBody = match serde_json::from_slice(body) {
        Ok(body) => body,
        Err(error) => {
            tracing::warn!(error.cause_chain = ?error, "Malformed webhook body");
            return Outcome::Malformed;
        }
    };

    if !body.data.is_cancellation() {
        tracing::info!("Ignoring session with result {:?}", body.data.session.result);
        return Outcome::Ignored;
    }

    let cancellation: Cancellation = match body.data.try_into() {
        Ok(cancellation) => cancellation,
        Err(error) => {
            tracing::warn!(error.cause_chain = ?error, "Malformed cancellation");
            return Outcome::Malformed;
        }
    };

    tracing::debug!(
        "Survey answers for subscription {}:\n{}",
        cancellation.subscription_id,
        message_body(
            &cancellation.survey_response,
            cancellation.feedback.as_deref(),
            cancellation.followup_response.as_deref(),
        )
    );

    if !cancellation.has_feedback() {
        return Outcome::NoFeedback;
    }

    let message = match compose_notification(&cancellation, portal, Utc::now()) {
        Ok(message) => message,
        Err(error) => {
            tracing::warn!(error.cause_chain = ?error, "Failed to compose notification");
            return Outcome::Malformed;
        }
    };

    match slack_client.post_message(&message).await {
        Ok(()) => Outcome::Relayed,
        Err(error) => {
            tracing::error!(
                error.cause_chain = ?error,
                "Failed to relay cancellation of subscription {}",
                cancellation.subscription_id
            );
            Outcome::DeliveryFailed
        }
    }
}

/// Webhook API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/webhook").service(relay)
}
