//! UseCase: 支払い確認メッセージの送信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendPaymentNotificationUseCase::execute() メソッド
//! - 入力検証 → 接続状態の確認 → メッセージ生成 → 送信 の順序
//!
//! ### なぜこのテストが必要か
//! - 不完全なリクエストや未接続時にクライアントへ送信しないことを保証する
//! - 送信失敗がエラーとして呼び出し元に返ることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続済みで全項目が揃っている
//! - 異常系：項目欠損、未接続、送信失敗

use std::sync::Arc;

use notifier_shared::time::Clock;

use crate::domain::{ChatId, MessagingClient, NotificationDraft};

use super::{error::SendNotificationError, session_manager::SessionHandle};

/// 支払い確認メッセージ送信のユースケース
pub struct SendPaymentNotificationUseCase {
    /// MessagingClient（メッセージ送信の抽象化）
    client: Arc<dyn MessagingClient>,
    /// 接続状態（読み取り専用）
    session: SessionHandle,
    /// メッセージに埋め込む日付の取得元
    clock: Arc<dyn Clock>,
}

impl SendPaymentNotificationUseCase {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        session: SessionHandle,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            session,
            clock,
        }
    }

    /// 支払い確認メッセージの送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ChatId)` - 送信先のチャット ID
    /// * `Err(SendNotificationError)` - 検証エラー、未接続、または送信失敗
    pub async fn execute(&self, draft: NotificationDraft) -> Result<ChatId, SendNotificationError> {
        // 1. 入力検証（送信を試みる前に拒否する）
        let notification = draft.validate()?;

        // 2. 接続状態の確認
        if !self.session.is_ready() {
            return Err(SendNotificationError::NotReady);
        }

        if !notification.phone.looks_international() {
            tracing::warn!(
                "Phone number '{}' is not a 13-digit Brazilian number, delivery may fail",
                notification.phone.digits()
            );
        }

        // 3. メッセージ生成
        let formatted = notification.format(&self.clock.now_local());

        // 4. 送信
        self.client
            .send_message(&formatted.chat_id, &formatted.text)
            .await
            .map_err(|e| SendNotificationError::Delivery(e.to_string()))?;

        tracing::info!(
            "Payment confirmation sent to '{}' ({})",
            notification.athlete_name,
            formatted.chat_id
        );

        Ok(formatted.chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AmountInput, ConnectionState, MessagingError, MockMessagingClient, NotificationError,
    };
    use chrono::TimeZone;
    use mockall::predicate::eq;
    use notifier_shared::time::{FixedClock, brasilia_offset};
    use tokio::sync::watch;

    fn session_in(state: ConnectionState) -> (watch::Sender<ConnectionState>, SessionHandle) {
        let (tx, rx) = watch::channel(state);
        (tx, SessionHandle::new(rx))
    }

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(
            brasilia_offset()
                .with_ymd_and_hms(2024, 1, 31, 10, 0, 0)
                .unwrap(),
        ))
    }

    fn draft() -> NotificationDraft {
        NotificationDraft {
            phone: Some("5577988556030".to_string()),
            athlete_name: Some("João Silva".to_string()),
            month: Some("Janeiro/2024".to_string()),
            value: Some(AmountInput::Text("150.00".to_string())),
        }
    }

    #[tokio::test]
    async fn test_send_when_ready() {
        // テスト項目: 接続済みの場合、正しい宛先と本文で送信される
        // given (前提条件):
        let mut client = MockMessagingClient::new();
        client
            .expect_send_message()
            .with(
                eq(ChatId::new("5577988556030@c.us")),
                mockall::predicate::function(|text: &str| {
                    text.contains("João Silva")
                        && text.contains("Janeiro/2024")
                        && text.contains("150.00")
                        && text.contains("31/01/2024")
                }),
            )
            .times(1)
            .returning(|_, _| Ok(()));
        let (_tx, session) = session_in(ConnectionState::Ready);
        let usecase = SendPaymentNotificationUseCase::new(Arc::new(client), session, fixed_clock());

        // when (操作):
        let result = usecase.execute(draft()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(ChatId::new("5577988556030@c.us")));
    }

    #[tokio::test]
    async fn test_not_ready_does_not_send() {
        // テスト項目: 未接続の場合、送信せずに NotReady を返す
        // given (前提条件):
        let mut client = MockMessagingClient::new();
        client.expect_send_message().never();
        let (_tx, session) = session_in(ConnectionState::Disconnected {
            reason: "LOGOUT".to_string(),
        });
        let usecase = SendPaymentNotificationUseCase::new(Arc::new(client), session, fixed_clock());

        // when (操作):
        let result = usecase.execute(draft()).await;

        // then (期待する結果):
        assert_eq!(result, Err(SendNotificationError::NotReady));
    }

    #[tokio::test]
    async fn test_missing_field_does_not_send() {
        // テスト項目: 必須項目が欠けている場合、送信せずに検証エラーを返す
        // given (前提条件):
        let mut client = MockMessagingClient::new();
        client.expect_send_message().never();
        let (_tx, session) = session_in(ConnectionState::Ready);
        let usecase = SendPaymentNotificationUseCase::new(Arc::new(client), session, fixed_clock());
        let incomplete = NotificationDraft {
            month: None,
            ..draft()
        };

        // when (操作):
        let result = usecase.execute(incomplete).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendNotificationError::InvalidRequest(
                NotificationError::MissingFields(vec!["month"])
            ))
        );
    }

    #[tokio::test]
    async fn test_validation_runs_before_readiness_check() {
        // テスト項目: 未接続でも項目欠損は検証エラーとして返される
        // given (前提条件):
        let mut client = MockMessagingClient::new();
        client.expect_send_message().never();
        let (_tx, session) = session_in(ConnectionState::default());
        let usecase = SendPaymentNotificationUseCase::new(Arc::new(client), session, fixed_clock());

        // when (操作):
        let result = usecase.execute(NotificationDraft::default()).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(SendNotificationError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported() {
        // テスト項目: クライアントの送信失敗が Delivery エラーとして返される
        // given (前提条件):
        let mut client = MockMessagingClient::new();
        client
            .expect_send_message()
            .times(1)
            .returning(|_, _| Err(MessagingError::Rejected("number not on WhatsApp".to_string())));
        let (_tx, session) = session_in(ConnectionState::Ready);
        let usecase = SendPaymentNotificationUseCase::new(Arc::new(client), session, fixed_clock());

        // when (操作):
        let result = usecase.execute(draft()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendNotificationError::Delivery(
                "number not on WhatsApp".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_readiness_is_read_per_request() {
        // テスト項目: 接続状態の変化が次のリクエストに反映される
        // given (前提条件):
        let mut client = MockMessagingClient::new();
        client.expect_send_message().times(1).returning(|_, _| Ok(()));
        let (tx, session) = session_in(ConnectionState::default());
        let usecase = SendPaymentNotificationUseCase::new(Arc::new(client), session, fixed_clock());
        let before = usecase.execute(draft()).await;

        // when (操作):
        tx.send(ConnectionState::Ready).unwrap();
        let after = usecase.execute(draft()).await;

        // then (期待する結果):
        assert_eq!(before, Err(SendNotificationError::NotReady));
        assert!(after.is_ok());
    }
}
