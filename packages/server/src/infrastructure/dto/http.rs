//! HTTP API request and response bodies.

use serde::{Deserialize, Serialize};

use crate::domain::{AmountInput, NotificationDraft};

/// JSON string or number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// `POST /send-message` body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub phone: Option<TextOrNumber>,
    pub athlete_name: Option<String>,
    pub month: Option<String>,
    pub value: Option<TextOrNumber>,
}

impl From<SendMessageRequest> for NotificationDraft {
    fn from(dto: SendMessageRequest) -> Self {
        Self {
            phone: dto.phone.map(TextOrNumber::into_text),
            athlete_name: dto.athlete_name,
            month: dto.month,
            value: dto.value.map(|value| match value {
                TextOrNumber::Text(text) => AmountInput::Text(text),
                TextOrNumber::Number(number) => match number.as_f64() {
                    Some(n) => AmountInput::Number(n),
                    None => AmountInput::Text(number.to_string()),
                },
            }),
        }
    }
}

/// Response of the send endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SendMessageResponse {
    pub fn sent(chat_id: &str) -> Self {
        Self {
            success: true,
            message: Some("Mensagem enviada".to_string()),
            chat_id: Some(chat_id.to_string()),
            error: None,
            details: None,
        }
    }

    pub fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            message: None,
            chat_id: None,
            error: Some(error.into()),
            details,
        }
    }
}

/// `GET /` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfoDto {
    pub status: String,
    pub service: String,
    pub version: String,
    /// `connected` or `disconnected`
    pub whatsapp: String,
    pub state: String,
    pub endpoints: Vec<String>,
    pub timestamp: String,
}

/// `GET /health` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    /// Process uptime in seconds
    pub uptime: u64,
    pub timestamp: String,
}

/// `GET /status` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDto {
    pub ready: bool,
    pub qr_needed: bool,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_string_and_number_values() {
        // テスト項目: value は文字列・数値のどちらでも受け付ける
        // given (前提条件):
        let text = r#"{"phone":"77988556030","athleteName":"Ana","month":"Março/2024","value":"99.9"}"#;
        let number = r#"{"phone":"77988556030","athleteName":"Ana","month":"Março/2024","value":150}"#;

        // when (操作):
        let text_draft: NotificationDraft =
            serde_json::from_str::<SendMessageRequest>(text).unwrap().into();
        let number_draft: NotificationDraft =
            serde_json::from_str::<SendMessageRequest>(number).unwrap().into();

        // then (期待する結果):
        assert_eq!(text_draft.value, Some(AmountInput::Text("99.9".to_string())));
        assert_eq!(number_draft.value, Some(AmountInput::Number(150.0)));
    }

    #[test]
    fn test_numeric_phone_is_converted_to_text() {
        // テスト項目: 数値で送られた電話番号は文字列に変換される
        // given (前提条件):
        let json = r#"{"phone":77988556030}"#;

        // when (操作):
        let draft: NotificationDraft = serde_json::from_str::<SendMessageRequest>(json)
            .unwrap()
            .into();

        // then (期待する結果):
        assert_eq!(draft.phone, Some("77988556030".to_string()));
        assert_eq!(draft.athlete_name, None);
    }

    #[test]
    fn test_null_fields_are_absent() {
        // テスト項目: null の項目は欠損として扱われる
        // given (前提条件):
        let json = r#"{"phone":null,"athleteName":null,"month":null,"value":null}"#;

        // when (操作):
        let request: SendMessageRequest = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(request, SendMessageRequest::default());
    }

    #[test]
    fn test_failure_response_omits_success_fields() {
        // テスト項目: 失敗レスポンスには message / chatId が含まれない
        // given (前提条件):
        let response = SendMessageResponse::failure("WhatsApp não conectado", None);

        // when (操作):
        let json = serde_json::to_value(&response).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "WhatsApp não conectado"})
        );
    }

    #[test]
    fn test_sent_response_shape() {
        // テスト項目: 成功レスポンスに message と chatId が含まれる
        // given (前提条件):
        let response = SendMessageResponse::sent("5577988556030@c.us");

        // when (操作):
        let json = serde_json::to_value(&response).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "message": "Mensagem enviada",
                "chatId": "5577988556030@c.us"
            })
        );
    }
}
