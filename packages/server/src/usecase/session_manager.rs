//! UseCase: メッセージングセッションの管理
//!
//! ## 責務
//!
//! - クライアントのライフサイクルイベントを受け取り、接続状態（[`ConnectionState`]）を更新する
//! - 接続状態を `watch` チャンネルで公開する（読み取り専用の [`SessionHandle`]）
//! - 切断時の再接続を試行回数付きで監督する
//! - シャットダウン時にクライアントのリソースを解放する
//!
//! 接続状態を書き換えるのはこのモジュールだけです。

use std::{pin::Pin, sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, oneshot, watch},
    time::Sleep,
};

use crate::domain::{ClientEvent, ConnectionState, MessagingClient, MessagingError};

/// Fixed-delay reconnect policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Wait before each reconnect attempt
    pub delay: Duration,
    /// Consecutive failed attempts after which the manager gives up
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            max_attempts: 5,
        }
    }
}

/// Read-only view of the connection state
#[derive(Debug, Clone)]
pub struct SessionHandle {
    receiver: watch::Receiver<ConnectionState>,
}

impl SessionHandle {
    /// Wrap a state receiver. The matching sender is the only writer.
    pub fn new(receiver: watch::Receiver<ConnectionState>) -> Self {
        Self { receiver }
    }

    pub fn current(&self) -> ConnectionState {
        self.receiver.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.receiver.borrow().is_ready()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.receiver.clone()
    }
}

/// Owns the connection state and supervises the messaging client
pub struct SessionManager {
    client: Arc<dyn MessagingClient>,
    events: mpsc::UnboundedReceiver<ClientEvent>,
    state: watch::Sender<ConnectionState>,
    policy: ReconnectPolicy,
    /// Consecutive reconnect attempts since the last `ready`
    attempts: u32,
    /// Pending reconnect timer
    reconnect_timer: Option<Pin<Box<Sleep>>>,
}

impl SessionManager {
    /// 新しい SessionManager と、その状態を読むための SessionHandle を作成
    ///
    /// # Arguments
    ///
    /// * `client` - 管理対象のメッセージングクライアント
    /// * `events` - クライアントが生成時に受け取った `EventSender` の受信側
    /// * `policy` - 再接続ポリシー
    pub fn new(
        client: Arc<dyn MessagingClient>,
        events: mpsc::UnboundedReceiver<ClientEvent>,
        policy: ReconnectPolicy,
    ) -> (Self, SessionHandle) {
        let (state, receiver) = watch::channel(ConnectionState::default());
        let manager = Self {
            client,
            events,
            state,
            policy,
            attempts: 0,
            reconnect_timer: None,
        };
        (manager, SessionHandle { receiver })
    }

    /// Initialize the client, then process events until `shutdown` resolves
    /// (or its sender is dropped). The client is destroyed before returning.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        tracing::info!("Initializing messaging client");
        match initialize_or_shutdown(self.client.as_ref(), &mut shutdown).await {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                tracing::error!("Failed to initialize messaging client: {}", e);
                self.apply(ClientEvent::Disconnected(e.to_string()));
                self.schedule_reconnect();
            }
            None => return self.shutdown().await,
        }

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                event = self.events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        tracing::warn!("Messaging client event channel closed");
                        let _ = (&mut shutdown).await;
                        break;
                    }
                },
                _ = tick(&mut self.reconnect_timer) => {
                    self.reconnect_timer = None;
                    if !self.reconnect(&mut shutdown).await {
                        break;
                    }
                }
            }
        }

        self.shutdown().await;
    }

    async fn shutdown(self) {
        tracing::info!("Shutting down messaging client");
        if let Err(e) = self.client.destroy().await {
            tracing::warn!("Failed to destroy messaging client: {}", e);
        }
    }

    fn handle_event(&mut self, event: ClientEvent) {
        match &event {
            ClientEvent::Qr(_) => {
                tracing::info!("Pairing code received, scan it with WhatsApp (see /qr)");
            }
            ClientEvent::Ready => {
                tracing::info!("WhatsApp connected and ready");
                self.attempts = 0;
                self.reconnect_timer = None;
            }
            ClientEvent::Authenticated => tracing::info!("WhatsApp session authenticated"),
            ClientEvent::AuthFailure(message) => {
                tracing::error!("WhatsApp authentication failed: {}", message);
            }
            ClientEvent::Disconnected(reason) => {
                tracing::warn!("WhatsApp disconnected: {}", reason);
            }
            ClientEvent::Message(message) => {
                tracing::debug!("Incoming message from '{}': {}", message.from, message.body);
            }
        }

        let disconnected = matches!(event, ClientEvent::Disconnected(_));
        self.apply(event);
        if disconnected && self.reconnect_timer.is_none() {
            self.schedule_reconnect();
        }
    }

    fn apply(&mut self, event: ClientEvent) {
        self.state.send_if_modified(|state| {
            let next = state.apply(&event);
            if *state == next {
                return false;
            }
            tracing::debug!("Connection state: {} -> {}", state.label(), next.label());
            *state = next;
            true
        });
    }

    fn schedule_reconnect(&mut self) {
        if self.attempts >= self.policy.max_attempts {
            tracing::error!(
                "Failed to reconnect after {} attempts. Giving up.",
                self.policy.max_attempts
            );
            return;
        }
        self.attempts += 1;
        tracing::info!(
            "Reconnecting in {:?}... (attempt {}/{})",
            self.policy.delay,
            self.attempts,
            self.policy.max_attempts
        );
        self.reconnect_timer = Some(Box::pin(tokio::time::sleep(self.policy.delay)));
    }

    /// Returns `false` when shutdown was requested during the attempt
    async fn reconnect(&mut self, shutdown: &mut oneshot::Receiver<()>) -> bool {
        if self.state.borrow().is_ready() {
            return true;
        }
        match initialize_or_shutdown(self.client.as_ref(), shutdown).await {
            Some(Ok(())) => tracing::info!("Reconnect attempt {} started", self.attempts),
            Some(Err(e)) => {
                tracing::warn!("Reconnect attempt {} failed: {}", self.attempts, e);
                self.schedule_reconnect();
            }
            None => return false,
        }
        true
    }
}

/// Initialize the client unless shutdown is requested first (`None`).
async fn initialize_or_shutdown(
    client: &dyn MessagingClient,
    shutdown: &mut oneshot::Receiver<()>,
) -> Option<Result<(), MessagingError>> {
    tokio::select! {
        _ = &mut *shutdown => {
            tracing::info!("Shutdown requested while initializing messaging client");
            None
        }
        result = client.initialize() => Some(result),
    }
}

/// Resolve when the pending reconnect timer fires; never resolve without one.
async fn tick(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
