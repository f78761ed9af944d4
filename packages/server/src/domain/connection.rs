//! Connection state machine for the messaging session.
//!
//! Transitions are pure: [`ConnectionState::apply`] takes the current state and a
//! client event and returns the next state.

use super::messaging::ClientEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// No usable session yet. `last_error` holds the last authentication failure.
    Unauthenticated { last_error: Option<String> },
    /// Waiting for the pairing code to be scanned
    PairingPending { code: String },
    Ready,
    Disconnected { reason: String },
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::Unauthenticated { last_error: None }
    }
}

impl ConnectionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Pairing code waiting to be scanned, if any
    pub fn pairing_code(&self) -> Option<&str> {
        match self {
            Self::PairingPending { code } => Some(code),
            _ => None,
        }
    }

    /// Stable machine-readable name of the state
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::PairingPending { .. } => "pairing_pending",
            Self::Ready => "ready",
            Self::Disconnected { .. } => "disconnected",
        }
    }

    /// Compute the state that follows `event`.
    pub fn apply(&self, event: &ClientEvent) -> ConnectionState {
        match event {
            ClientEvent::Qr(code) => Self::PairingPending { code: code.clone() },
            ClientEvent::Ready => Self::Ready,
            ClientEvent::Authenticated => match self {
                Self::Ready => Self::Ready,
                _ => Self::Unauthenticated { last_error: None },
            },
            ClientEvent::AuthFailure(message) => Self::Unauthenticated {
                last_error: Some(message.clone()),
            },
            ClientEvent::Disconnected(reason) => Self::Disconnected {
                reason: reason.clone(),
            },
            ClientEvent::Message(_) => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messaging::IncomingMessage;

    #[test]
    fn test_initial_state_is_unauthenticated() {
        // テスト項目: 初期状態は未認証で送信不可
        // given (前提条件):

        // when (操作):
        let state = ConnectionState::default();

        // then (期待する結果):
        assert_eq!(state, ConnectionState::Unauthenticated { last_error: None });
        assert!(!state.is_ready());
        assert_eq!(state.pairing_code(), None);
    }

    #[test]
    fn test_qr_event_moves_to_pairing_pending() {
        // テスト項目: qr イベントでペアリング待ち状態になり、コードを保持する
        // given (前提条件):
        let state = ConnectionState::default();

        // when (操作):
        let next = state.apply(&ClientEvent::Qr("2@abc,def".to_string()));

        // then (期待する結果):
        assert_eq!(next.label(), "pairing_pending");
        assert_eq!(next.pairing_code(), Some("2@abc,def"));
    }

    #[test]
    fn test_full_pairing_flow_reaches_ready() {
        // テスト項目: qr → authenticated → ready の順で送信可能になる
        // given (前提条件):
        let state = ConnectionState::default();

        // when (操作):
        let state = state.apply(&ClientEvent::Qr("code".to_string()));
        let state = state.apply(&ClientEvent::Authenticated);
        let after_auth = state.clone();
        let state = state.apply(&ClientEvent::Ready);

        // then (期待する結果):
        assert_eq!(after_auth, ConnectionState::Unauthenticated { last_error: None });
        assert!(state.is_ready());
    }

    #[test]
    fn test_authenticated_while_ready_keeps_ready() {
        // テスト項目: ready 中の authenticated イベントで状態は変わらない
        // given (前提条件):
        let state = ConnectionState::Ready;

        // when (操作):
        let next = state.apply(&ClientEvent::Authenticated);

        // then (期待する結果):
        assert!(next.is_ready());
    }

    #[test]
    fn test_disconnect_from_ready() {
        // テスト項目: ready から disconnected で送信不可になり理由を保持する
        // given (前提条件):
        let state = ConnectionState::Ready;

        // when (操作):
        let next = state.apply(&ClientEvent::Disconnected("NAVIGATION".to_string()));

        // then (期待する結果):
        assert!(!next.is_ready());
        assert_eq!(
            next,
            ConnectionState::Disconnected {
                reason: "NAVIGATION".to_string()
            }
        );
    }

    #[test]
    fn test_auth_failure_records_error() {
        // テスト項目: auth_failure で未認証に戻り、エラー内容を保持する
        // given (前提条件):
        let state = ConnectionState::PairingPending {
            code: "code".to_string(),
        };

        // when (操作):
        let next = state.apply(&ClientEvent::AuthFailure("session expired".to_string()));

        // then (期待する結果):
        assert_eq!(
            next,
            ConnectionState::Unauthenticated {
                last_error: Some("session expired".to_string())
            }
        );
        assert_eq!(next.pairing_code(), None);
    }

    #[test]
    fn test_incoming_message_does_not_change_state() {
        // テスト項目: 受信メッセージイベントでは状態が変わらない
        // given (前提条件):
        let state = ConnectionState::Ready;
        let event = ClientEvent::Message(IncomingMessage {
            from: "5577988556030@c.us".to_string(),
            body: "obrigado".to_string(),
        });

        // when (操作):
        let next = state.apply(&event);

        // then (期待する結果):
        assert_eq!(next, ConnectionState::Ready);
    }
}
