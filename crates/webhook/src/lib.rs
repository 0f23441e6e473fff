//! Webhook delivery for craftwatch notifications.
//!
//! Posts a [`NotificationMessage`](craftwatch_protocol::NotificationMessage)
//! as a single-embed JSON payload and keeps retrying while the endpoint
//! answers `429 Too Many Requests`.

pub mod client;

pub use client::{Client, ClientConfig, Delivery, Error, retry_after};
