//! UseCase: 接続状態の取得

use crate::domain::ConnectionState;

use super::session_manager::SessionHandle;

/// Snapshot of the messaging session, as reported by the status endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub ready: bool,
    /// A pairing code is waiting to be scanned
    pub qr_needed: bool,
}

/// 接続状態取得のユースケース
pub struct GetConnectionStatusUseCase {
    session: SessionHandle,
}

impl GetConnectionStatusUseCase {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    pub fn execute(&self) -> ConnectionStatus {
        let state = self.session.current();
        ConnectionStatus {
            ready: state.is_ready(),
            qr_needed: state.pairing_code().is_some(),
            state,
        }
    }
}
