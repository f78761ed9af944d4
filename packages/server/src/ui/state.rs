//! Server state shared by the handlers.

use std::{sync::Arc, time::Instant};

use crate::usecase::{GetConnectionStatusUseCase, SendPaymentNotificationUseCase};

/// Shared application state
pub struct AppState {
    /// SendPaymentNotificationUseCase（支払い確認メッセージ送信のユースケース）
    pub send_payment_notification_usecase: Arc<SendPaymentNotificationUseCase>,
    /// GetConnectionStatusUseCase（接続状態取得のユースケース）
    pub get_connection_status_usecase: Arc<GetConnectionStatusUseCase>,
    /// Process start, for the uptime reported by `/health`
    pub started_at: Instant,
}
