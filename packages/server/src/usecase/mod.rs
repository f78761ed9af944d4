//! UseCase 層
//!
//! ドメインモデルとポート（`MessagingClient`）を組み合わせてアプリケーションの操作を実装します。

pub mod error;
pub mod get_connection_status;
pub mod send_payment_notification;
pub mod session_manager;

pub use error::SendNotificationError;
pub use get_connection_status::{ConnectionStatus, GetConnectionStatusUseCase};
pub use send_payment_notification::SendPaymentNotificationUseCase;
pub use session_manager::{ReconnectPolicy, SessionHandle, SessionManager};
