/// Basic application code
pub mod app;
/// REST clients for outside services
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Webhook signature verification
pub mod crypto;
/// Cancellation records and notification formatting
pub mod domain;
/// Error enums
pub mod error;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
