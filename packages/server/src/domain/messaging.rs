//! Messaging client port
//!
//! ドメイン層が必要とするメッセージ送信クライアントのインターフェースを定義します。
//! WhatsApp セッションの認証・ブラウザ操作などの詳細は Infrastructure 層の実装が担います。
//!
//! ## ライフサイクルイベント
//!
//! クライアントは生成時に受け取った [`EventSender`] へ [`ClientEvent`] を送信します。
//! イベントを消費して接続状態を管理するのは `usecase::SessionManager` です。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ChatId;

/// Incoming chat message reported by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub from: String,
    pub body: String,
}

/// Lifecycle events emitted by a messaging client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A pairing code must be scanned to link the session
    Qr(String),
    /// Session is authenticated and can send messages
    Ready,
    /// Pairing succeeded; the client is loading the session
    Authenticated,
    AuthFailure(String),
    Disconnected(String),
    Message(IncomingMessage),
}

/// Channel on which a client publishes its lifecycle events
pub type EventSender = mpsc::UnboundedSender<ClientEvent>;

/// Errors reported by a messaging client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    #[error("messaging client is not initialized")]
    NotInitialized,

    /// The remote side refused the operation (unknown number, session closed, ...)
    #[error("{0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Messaging client trait
///
/// UseCase 層はこの trait に依存し、具体的な実装（bridge / dry-run）には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Start (or restart) the session. Progress is reported through events.
    async fn initialize(&self) -> Result<(), MessagingError>;

    /// Deliver a text message to a chat
    async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<(), MessagingError>;

    /// Release the session and any resources held by the client
    async fn destroy(&self) -> Result<(), MessagingError>;
}
