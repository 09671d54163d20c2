use chrono::{DateTime, Utc};

use serde::Deserialize;
use serde_aux::prelude::*;

use crate::error::{Error, Result};

use super::billing::{Billing, Payment, Plan, SubscriptionState};
use super::relative_time::parse_utc_timestamp;

const CANCEL_RESULT: &str = "cancel";

/// Webhook body as delivered by the retention provider
#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub session: SessionRecord,
    /// Only validated once the session is known to be a cancellation
    pub customer: Option<serde_json::Value>,
}

impl WebhookData {
    pub fn is_cancellation(&self) -> bool {
        self.session.result == CANCEL_RESULT
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub result: String,
    pub survey_response: Option<String>,
    pub feedback: Option<String>,
    pub followup_response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomerRecord {
    #[serde(deserialize_with = "deserialize_string_from_number")]
    subscription_id: String,
    user_email: String,
    last_payment: Option<PaymentRecord>,
    state: String,
    signup_date: String,
    subscriptions: SubscriptionList,
}

#[derive(Debug, Deserialize)]
struct PaymentRecord {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    amount: f64,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionList {
    data: Vec<SubscriptionRecord>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionRecord {
    plan: PlanRecord,
}

#[derive(Debug, Deserialize)]
struct PlanRecord {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    unit_amount: u64,
    currency: String,
    recurring: RecurringRecord,
}

#[derive(Debug, Deserialize)]
struct RecurringRecord {
    interval: String,
}

/// A validated cancellation, ready to be turned into a notification
#[derive(Debug, Clone)]
pub struct Cancellation {
    pub subscription_id: String,
    pub user_email: String,
    pub survey_response: String,
    pub feedback: Option<String>,
    pub followup_response: Option<String>,
    pub signed_up_at: DateTime<Utc>,
    pub billing: Billing,
    pub state: SubscriptionState,
}

impl Cancellation {
    /// Whether the customer left anything beyond the fixed survey answer
    pub fn has_feedback(&self) -> bool {
        self.feedback.is_some() || self.followup_response.is_some()
    }
}

impl TryFrom<WebhookData> for Cancellation {
    type Error = Error;

    fn try_from(data: WebhookData) -> Result<Self> {
        let session = data.session;

        let survey_response = session
            .survey_response
            .ok_or_else(|| Error::ParsingError("Missing session.surveyResponse".into()))?;

        let customer = data
            .customer
            .ok_or_else(|| Error::ParsingError("Missing customer".into()))?;
        let customer: CustomerRecord = serde_json::from_value(customer)
            .map_err(|e| Error::ParsingError(format!("Malformed customer: {}", e)))?;

        if customer.subscription_id.trim().is_empty() {
            return Err(Error::ParsingError("Subscription id cannot be empty".into()));
        }
        if customer.user_email.trim().is_empty() {
            return Err(Error::ParsingError("User email cannot be empty".into()));
        }

        let signed_up_at = parse_utc_timestamp(&customer.signup_date)?;

        let plan = customer
            .subscriptions
            .data
            .into_iter()
            .next()
            .map(|subscription| subscription.plan)
            .ok_or_else(|| Error::ParsingError("Customer has no subscriptions".into()))?;

        let last_payment = customer.last_payment.and_then(|payment| {
            payment.currency.map(|currency| Payment {
                amount: payment.amount,
                currency,
            })
        });

        Ok(Self {
            subscription_id: customer.subscription_id,
            user_email: customer.user_email,
            survey_response,
            feedback: present(session.feedback),
            followup_response: present(session.followup_response),
            signed_up_at,
            billing: Billing {
                last_payment,
                plan: Plan {
                    unit_amount: plan.unit_amount,
                    currency: plan.currency,
                    interval: plan.recurring.interval,
                },
            },
            state: customer.state.into(),
        })
    }
}

/// Empty free-text answers count as absent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
