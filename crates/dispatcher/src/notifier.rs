//! Delivery seam.

use std::future::Future;
use std::pin::Pin;

use craftwatch_protocol::NotificationMessage;

use crate::error::DispatchError;

/// Delivers one notification.
///
/// The binary uses the webhook client; tests substitute a recorder.
pub trait Notifier: Send + Sync {
    fn notify<'a>(
        &'a self,
        message: &'a NotificationMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>>;
}

impl Notifier for craftwatch_webhook::Client {
    fn notify<'a>(
        &'a self,
        message: &'a NotificationMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>> {
        Box::pin(async move {
            self.send(message).await?;
            Ok(())
        })
    }
}
