//! Dispatch error types.

/// Errors from delivering a single notification.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("webhook error: {0}")]
    Webhook(#[from] craftwatch_webhook::Error),

    #[error("delivery failed: {0}")]
    Delivery(String),
}
