//! WhatsApp Web bridge を使った MessagingClient 実装
//!
//! ## 責務
//!
//! - ブリッジ（ブラウザセッションを保持するサイドカー）へのセッション開始・終了要求
//! - メッセージ送信要求
//! - セッション状態のポーリングと、状態変化のライフサイクルイベントへの変換
//!
//! ## プロトコル
//!
//! ```text
//! POST   {base}/sessions/{client_id}/start
//! GET    {base}/sessions/{client_id}            -> {"state": "...", "qr": "...", "reason": "...", "incoming": [...]}
//! POST   {base}/sessions/{client_id}/messages   <- {"chatId": "...", "text": "..."}
//! DELETE {base}/sessions/{client_id}
//! ```
//!
//! ポーリングはセッションが `disconnected` になるか、ブリッジに到達できなくなった時点で終了します。
//! 再接続（`initialize` の再呼び出し）は `SessionManager` の責務です。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::domain::{
    ChatId, ClientEvent, EventSender, IncomingMessage, MessagingClient, MessagingError,
};

/// Connection settings for the bridge sidecar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Base URL, e.g. `http://127.0.0.1:8085`
    pub base_url: String,
    /// Session name on the bridge; also the name of its persisted auth data
    pub client_id: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

/// Session state as reported by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeSessionState {
    Starting,
    Qr,
    Authenticated,
    Ready,
    AuthFailure,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BridgeIncomingMessage {
    pub from: String,
    pub body: String,
}

/// `GET /sessions/{client_id}` response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BridgeSession {
    pub state: BridgeSessionState,
    #[serde(default)]
    pub qr: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Messages received since the previous poll
    #[serde(default)]
    pub incoming: Vec<BridgeIncomingMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Translate a session snapshot into lifecycle events.
///
/// State events are emitted only when the state or the pairing code changed
/// since `previous`. Incoming messages are always forwarded.
pub fn session_events(previous: Option<&BridgeSession>, current: &BridgeSession) -> Vec<ClientEvent> {
    let mut events = Vec::new();

    let changed = previous
        .map(|p| p.state != current.state || p.qr != current.qr)
        .unwrap_or(true);
    if changed {
        let event = match current.state {
            BridgeSessionState::Starting => None,
            BridgeSessionState::Qr => current.qr.clone().map(ClientEvent::Qr),
            BridgeSessionState::Authenticated => Some(ClientEvent::Authenticated),
            BridgeSessionState::Ready => Some(ClientEvent::Ready),
            BridgeSessionState::AuthFailure => Some(ClientEvent::AuthFailure(
                current
                    .reason
                    .clone()
                    .unwrap_or_else(|| "authentication failure".to_string()),
            )),
            BridgeSessionState::Disconnected => Some(ClientEvent::Disconnected(
                current
                    .reason
                    .clone()
                    .unwrap_or_else(|| "disconnected".to_string()),
            )),
        };
        events.extend(event);
    }

    events.extend(current.incoming.iter().map(|m| {
        ClientEvent::Message(IncomingMessage {
            from: m.from.clone(),
            body: m.body.clone(),
        })
    }));

    events
}

pub struct BridgeClient {
    http: reqwest::Client,
    config: BridgeConfig,
    events: EventSender,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl BridgeClient {
    pub fn new(config: BridgeConfig, events: EventSender) -> Result<Self, MessagingError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| MessagingError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            config,
            events,
            poller: Mutex::new(None),
        })
    }

    fn session_url(&self) -> String {
        format!(
            "{}/sessions/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.client_id
        )
    }

    async fn stop_polling(&self) {
        if let Some(poller) = self.poller.lock().await.take() {
            poller.abort();
        }
    }
}

impl Drop for BridgeClient {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.get_mut().take() {
            poller.abort();
        }
    }
}

/// Convert a non-success bridge response into an error
async fn rejection(response: reqwest::Response) -> MessagingError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => MessagingError::Rejected(body.error),
        Err(_) => MessagingError::Rejected(format!("bridge responded with {}", status)),
    }
}

fn transport(e: reqwest::Error) -> MessagingError {
    MessagingError::Transport(e.to_string())
}

async fn fetch_session(http: &reqwest::Client, url: &str) -> Result<BridgeSession, MessagingError> {
    let response = http.get(url).send().await.map_err(transport)?;
    if !response.status().is_success() {
        return Err(rejection(response).await);
    }
    response.json::<BridgeSession>().await.map_err(transport)
}

async fn poll_session(
    http: reqwest::Client,
    url: String,
    interval: Duration,
    events: EventSender,
) {
    let mut previous: Option<BridgeSession> = None;
    loop {
        match fetch_session(&http, &url).await {
            Ok(session) => {
                for event in session_events(previous.as_ref(), &session) {
                    if events.send(event).is_err() {
                        return;
                    }
                }
                if session.state == BridgeSessionState::Disconnected {
                    tracing::debug!("Bridge session disconnected, polling stopped");
                    return;
                }
                previous = Some(session);
            }
            Err(e) => {
                tracing::warn!("Failed to poll bridge session: {}", e);
                let _ = events.send(ClientEvent::Disconnected(format!("bridge unreachable: {}", e)));
                return;
            }
        }
        tokio::time::sleep(interval).await;
    }
}

#[async_trait]
impl MessagingClient for BridgeClient {
    async fn initialize(&self) -> Result<(), MessagingError> {
        let url = format!("{}/start", self.session_url());
        let response = self.http.post(&url).send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        tracing::info!("Bridge session '{}' started", self.config.client_id);

        let mut poller = self.poller.lock().await;
        if let Some(previous) = poller.take() {
            previous.abort();
        }
        *poller = Some(tokio::spawn(poll_session(
            self.http.clone(),
            self.session_url(),
            self.config.poll_interval,
            self.events.clone(),
        )));
        Ok(())
    }

    async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<(), MessagingError> {
        let url = format!("{}/messages", self.session_url());
        let response = self
            .http
            .post(&url)
            .json(&SendMessageBody {
                chat_id: chat_id.as_str(),
                text,
            })
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        tracing::debug!("Bridge accepted message for '{}'", chat_id);
        Ok(())
    }

    async fn destroy(&self) -> Result<(), MessagingError> {
        self.stop_polling().await;
        let response = self
            .http
            .delete(self.session_url())
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        tracing::info!("Bridge session '{}' closed", self.config.client_id);
        Ok(())
    }
}
