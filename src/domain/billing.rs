use super::currency::currency_symbol;

const TRIALING: &str = "trialing";

/// The most recent payment taken for a subscription, in major units
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub amount: f64,
    pub currency: String,
}

/// The recurring plan a customer is subscribed to
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Price per interval, in minor units (e.g. cents)
    pub unit_amount: u64,
    pub currency: String,
    pub interval: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Billing {
    pub last_payment: Option<Payment>,
    pub plan: Plan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionState {
    Trialing,
    Other(String),
}

impl From<String> for SubscriptionState {
    fn from(value: String) -> Self {
        if value == TRIALING {
            Self::Trialing
        } else {
            Self::Other(value)
        }
    }
}

impl SubscriptionState {
    pub fn is_trial(&self) -> bool {
        matches!(self, Self::Trialing)
    }
}

/// Summarize what a customer pays, e.g. `"$29.00/month (trial)"`.
///
/// Prefers the last payment when it charged a positive amount, otherwise
/// falls back to the plan price.
pub fn billing_info(billing: &Billing, state: &SubscriptionState) -> String {
    let money = match &billing.last_payment {
        Some(payment) if payment.amount > 0.0 => {
            // Halves round away from zero
            let minor = (payment.amount * 100.0).round() as u64;
            format_money(&payment.currency, minor)
        }
        _ => format_money(&billing.plan.currency, billing.plan.unit_amount),
    };
    let charge = if state.is_trial() { "trial" } else { "charged" };

    format!("{}/{} ({})", money, billing.plan.interval, charge)
}

fn format_money(currency: &str, minor: u64) -> String {
    format!("{}{}.{:02}", currency_symbol(currency), minor / 100, minor % 100)
}
