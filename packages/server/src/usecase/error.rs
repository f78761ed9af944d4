//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::NotificationError;

/// Errors returned by `SendPaymentNotificationUseCase`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendNotificationError {
    /// Request payload is incomplete or the amount is not a number
    #[error(transparent)]
    InvalidRequest(#[from] NotificationError),

    /// Messaging session is not ready; nothing was sent
    #[error("messaging session is not ready")]
    NotReady,

    /// The messaging client failed to deliver the message
    #[error("delivery failed: {0}")]
    Delivery(String),
}
