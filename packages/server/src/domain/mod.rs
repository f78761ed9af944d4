//! Domain layer: value objects, the notification template, the connection state
//! machine and the messaging client port.

pub mod connection;
pub mod messaging;
pub mod notification;
pub mod value_object;

pub use connection::ConnectionState;
pub use messaging::{ClientEvent, EventSender, IncomingMessage, MessagingClient, MessagingError};
pub use notification::{
    AmountInput, FormattedNotification, NotificationDraft, NotificationError, PaymentNotification,
};
pub use value_object::{AmountError, ChatId, PaymentAmount, PhoneNumber};

#[cfg(test)]
pub use messaging::MockMessagingClient;
