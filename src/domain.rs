mod billing;
mod cancellation;
mod currency;
mod message;
mod notification;
mod relative_time;

pub use billing::{billing_info, Billing, Payment, Plan, SubscriptionState};
pub use cancellation::{Cancellation, SessionRecord, WebhookBody, WebhookData};
pub use currency::currency_symbol;
pub use message::message_body;
pub use notification::compose_notification;
pub use relative_time::{parse_utc_timestamp, relative_time, relative_time_to_now};
