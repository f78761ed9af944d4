//! Server execution logic.

use std::{future::Future, sync::Arc, time::Instant};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::usecase::{GetConnectionStatusUseCase, SendPaymentNotificationUseCase};

use super::{
    handler::{
        http::{get_status, health_check, service_info},
        notification::{send_message, test_message},
        qr::qr_page,
    },
    state::AppState,
};

/// HTTP gateway
///
/// # Example
///
/// ```ignore
/// let server = Server::new(send_payment_notification_usecase, get_connection_status_usecase);
/// server.run("0.0.0.0".to_string(), 3000, shutdown_signal()).await?;
/// ```
pub struct Server {
    /// SendPaymentNotificationUseCase（支払い確認メッセージ送信のユースケース）
    send_payment_notification_usecase: Arc<SendPaymentNotificationUseCase>,
    /// GetConnectionStatusUseCase（接続状態取得のユースケース）
    get_connection_status_usecase: Arc<GetConnectionStatusUseCase>,
}

impl Server {
    pub fn new(
        send_payment_notification_usecase: Arc<SendPaymentNotificationUseCase>,
        get_connection_status_usecase: Arc<GetConnectionStatusUseCase>,
    ) -> Self {
        Self {
            send_payment_notification_usecase,
            get_connection_status_usecase,
        }
    }

    /// Build the router with all gateway endpoints
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            send_payment_notification_usecase: self.send_payment_notification_usecase,
            get_connection_status_usecase: self.get_connection_status_usecase,
            started_at: Instant::now(),
        });

        Router::new()
            .route("/", get(service_info))
            .route("/health", get(health_check))
            .route("/status", get(get_status))
            .route("/qr", get(qr_page))
            .route("/send-message", post(send_message))
            .route("/test-message", post(test_message))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the gateway until `shutdown` resolves
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The port number to bind to (e.g., 3000)
    /// * `shutdown` - Future that triggers graceful shutdown when it completes
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(
        self,
        host: String,
        port: u16,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Payment notifier listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server shutdown complete");

        Ok(())
    }
}
