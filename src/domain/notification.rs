use chrono::{DateTime, Utc};

use url::Url;

use crate::client::{Block, Element, SlackMessage, TextObject};
use crate::error::{Error, Result};

use super::billing::billing_info;
use super::cancellation::Cancellation;
use super::message::message_body;
use super::relative_time::relative_time;

const PORTAL_BUTTON_TEXT: &str = "Open in Paddle";
const PORTAL_BUTTON_VALUE: &str = "paddle_customer";

/// Build the Slack notice for a cancellation.
///
/// `customer_portal_url` is the base the subscription id is appended to, and
/// `now` anchors the "Subscribed ..." phrase.
pub fn compose_notification(
    cancellation: &Cancellation,
    customer_portal_url: &Url,
    now: DateTime<Utc>,
) -> Result<SlackMessage> {
    let customer_url = customer_url(customer_portal_url, &cancellation.subscription_id)?;

    let headline = format!(
        "<{}|{}> canceled their subscription",
        customer_url, cancellation.user_email
    );
    let body = message_body(
        &cancellation.survey_response,
        cancellation.feedback.as_deref(),
        cancellation.followup_response.as_deref(),
    );
    let context = format!(
        "Subscribed {} • {}",
        relative_time(cancellation.signed_up_at, now),
        billing_info(&cancellation.billing, &cancellation.state)
    );

    let blocks = vec![
        Block::Section {
            text: TextObject::Mrkdwn {
                text: format!("{}\n\n{}", headline, body),
            },
            accessory: Some(Element::Button {
                text: TextObject::PlainText {
                    text: PORTAL_BUTTON_TEXT.into(),
                    emoji: true,
                },
                value: PORTAL_BUTTON_VALUE.into(),
                url: customer_url.to_string(),
            }),
        },
        Block::Context {
            elements: vec![TextObject::Mrkdwn { text: context }],
        },
    ];

    Ok(SlackMessage {
        text: headline,
        blocks,
    })
}

/// Append the subscription id to the portal base as a single, encoded path segment
fn customer_url(customer_portal_url: &Url, subscription_id: &str) -> Result<Url> {
    // Dot segments would be dropped instead of encoded
    if matches!(subscription_id, "." | "..") {
        return Err(Error::ParsingError(format!(
            "Invalid subscription id: {:?}",
            subscription_id
        )));
    }

    let mut url = customer_portal_url.clone();
    url.path_segments_mut()
        .map_err(|_| Error::ParsingError("Customer portal URL cannot be a base".into()))?
        .pop_if_empty()
        .push(subscription_id);

    Ok(url)
}
