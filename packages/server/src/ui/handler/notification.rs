//! Send endpoints: `/send-message`, `/test-message`.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    domain::{AmountInput, ChatId, NotificationDraft, NotificationError},
    infrastructure::dto::http::{SendMessageRequest, SendMessageResponse},
    ui::state::AppState,
    usecase::SendNotificationError,
};

/// Hint returned with delivery failures
const DELIVERY_HINT: &str = "Verifique o número e o DDD";

type SendResponse = (StatusCode, Json<SendMessageResponse>);

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> SendResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Rejected send-message body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(SendMessageResponse::failure(
                    "Dados incompletos",
                    Some(rejection.body_text()),
                )),
            );
        }
    };

    to_response(
        state
            .send_payment_notification_usecase
            .execute(request.into())
            .await,
    )
}

/// Smoke test: sends a fixed confirmation through the same path as `/send-message`
pub async fn test_message(State(state): State<Arc<AppState>>) -> SendResponse {
    tracing::info!("Sending test message");
    to_response(
        state
            .send_payment_notification_usecase
            .execute(test_payload())
            .await,
    )
}

fn test_payload() -> NotificationDraft {
    NotificationDraft {
        phone: Some("5577988556030".to_string()),
        athlete_name: Some("João Silva".to_string()),
        month: Some("Janeiro/2024".to_string()),
        value: Some(AmountInput::Text("150.00".to_string())),
    }
}

fn to_response(result: Result<ChatId, SendNotificationError>) -> SendResponse {
    match result {
        Ok(chat_id) => (
            StatusCode::OK,
            Json(SendMessageResponse::sent(chat_id.as_str())),
        ),
        Err(SendNotificationError::InvalidRequest(e @ NotificationError::MissingFields(_))) => (
            StatusCode::BAD_REQUEST,
            Json(SendMessageResponse::failure(
                "Dados incompletos",
                Some(e.to_string()),
            )),
        ),
        Err(SendNotificationError::InvalidRequest(e @ NotificationError::InvalidAmount(_))) => (
            StatusCode::BAD_REQUEST,
            Json(SendMessageResponse::failure(
                "Valor inválido",
                Some(e.to_string()),
            )),
        ),
        Err(SendNotificationError::NotReady) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(SendMessageResponse::failure("WhatsApp não conectado", None)),
        ),
        Err(SendNotificationError::Delivery(message)) => {
            tracing::error!("Failed to send message: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendMessageResponse::failure(
                    message,
                    Some(DELIVERY_HINT.to_string()),
                )),
            )
        }
    }
}
