//! Payment confirmation message.
//!
//! [`NotificationDraft`] carries the raw request fields; validating it yields a
//! [`PaymentNotification`], which renders into a chat id and message text.

use chrono::{DateTime, FixedOffset};
use notifier_shared::time::format_br_date;
use thiserror::Error;

use super::value_object::{AmountError, ChatId, PaymentAmount, PhoneNumber};

/// Amount as received over the wire: JSON string or JSON number
#[derive(Debug, Clone, PartialEq)]
pub enum AmountInput {
    Text(String),
    Number(f64),
}

/// Unvalidated notification fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationDraft {
    pub phone: Option<String>,
    pub athlete_name: Option<String>,
    pub month: Option<String>,
    pub value: Option<AmountInput>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotificationError {
    /// Names (as sent on the wire) of the required fields that were absent
    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
}

/// Validated payment confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentNotification {
    pub phone: PhoneNumber,
    pub athlete_name: String,
    pub month: String,
    pub amount: PaymentAmount,
}

/// Rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedNotification {
    pub chat_id: ChatId,
    pub text: String,
}

/// Treat empty or whitespace-only strings like missing fields
fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

impl NotificationDraft {
    /// Check that every required field is present and the amount is numeric.
    pub fn validate(self) -> Result<PaymentNotification, NotificationError> {
        let phone = present(self.phone);
        let athlete_name = present(self.athlete_name);
        let month = present(self.month);
        let value = self.value.filter(|v| match v {
            AmountInput::Text(s) => !s.trim().is_empty(),
            AmountInput::Number(_) => true,
        });

        let mut missing = Vec::new();
        if phone.is_none() {
            missing.push("phone");
        }
        if athlete_name.is_none() {
            missing.push("athleteName");
        }
        if month.is_none() {
            missing.push("month");
        }
        if value.is_none() {
            missing.push("value");
        }

        match (phone, athlete_name, month, value) {
            (Some(phone), Some(athlete_name), Some(month), Some(value)) => {
                let amount = match value {
                    AmountInput::Text(text) => PaymentAmount::parse(&text)?,
                    AmountInput::Number(number) => PaymentAmount::from_number(number)?,
                };
                Ok(PaymentNotification {
                    phone: PhoneNumber::normalize(&phone),
                    athlete_name,
                    month,
                    amount,
                })
            }
            _ => Err(NotificationError::MissingFields(missing)),
        }
    }
}

impl PaymentNotification {
    /// Render the confirmation for delivery, stamping it with `date`.
    pub fn format(&self, date: &DateTime<FixedOffset>) -> FormattedNotification {
        let text = format!(
            "✅ *Pagamento Confirmado!*\n\
             \n\
             Olá *{name}*!\n\
             \n\
             Seu pagamento de *{month}* no valor de *R$ {value}* foi confirmado!\n\
             \n\
             📅 Data: {date}\n\
             💪 Status: ✅ Pago\n\
             \n\
             Obrigado!",
            name = self.athlete_name,
            month = self.month,
            value = self.amount.to_fixed_2(),
            date = format_br_date(date),
        );

        FormattedNotification {
            chat_id: ChatId::from(&self.phone),
            text,
        }
    }
}
