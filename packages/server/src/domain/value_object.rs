//! Value objects: phone numbers, chat identifiers and payment amounts.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Chat-domain suffix appended to phone digits to address a WhatsApp user
pub const CHAT_ID_SUFFIX: &str = "@c.us";

/// Country code prepended to numbers that arrive without one (Brazil)
pub const BRAZIL_COUNTRY_CODE: &str = "55";

/// Length of a Brazilian mobile number with area code but without country code
/// (2-digit DDD + 9-digit subscriber number)
const LOCAL_NUMBER_LEN: usize = 11;

/// Length of a fully qualified Brazilian mobile number
const INTERNATIONAL_NUMBER_LEN: usize = 13;

/// Phone number reduced to its digits, with the Brazilian country code added
/// when the input looks like a local number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize a free-form phone number.
    ///
    /// Every non-digit character is dropped. A result of exactly 11 digits is
    /// treated as a local number and gets `55` prepended. Anything else is kept
    /// as-is; no further validation happens here.
    pub fn normalize(raw: &str) -> Self {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == LOCAL_NUMBER_LEN {
            Self(format!("{BRAZIL_COUNTRY_CODE}{digits}"))
        } else {
            Self(digits)
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Whether the number has the shape of a Brazilian mobile number with
    /// country code. Other shapes still produce a chat id but are likely wrong.
    pub fn looks_international(&self) -> bool {
        self.0.len() == INTERNATIONAL_NUMBER_LEN && self.0.starts_with(BRAZIL_COUNTRY_CODE)
    }
}

/// Addressable WhatsApp conversation handle (`<digits>@c.us`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&PhoneNumber> for ChatId {
    fn from(phone: &PhoneNumber) -> Self {
        Self(format!("{}{CHAT_ID_SUFFIX}", phone.digits()))
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("value '{0}' is not a number")]
    NotANumber(String),

    #[error("value must be a finite, non-negative amount (got {0})")]
    OutOfRange(String),
}

/// Amount paid, in reais
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAmount(Decimal);

impl PaymentAmount {
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::OutOfRange(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Amount sent as a JSON number
    pub fn from_number(value: f64) -> Result<Self, AmountError> {
        let decimal =
            Decimal::try_from(value).map_err(|_| AmountError::OutOfRange(value.to_string()))?;
        Self::new(decimal)
    }

    /// Parse an amount sent as text.
    ///
    /// Accepts `"150"`, `"99.9"`, `"150.00"` and, when no dot is present, a comma
    /// as decimal separator (`"99,90"`). Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        let trimmed = text.trim();
        let candidate = if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            trimmed.replacen(',', ".", 1)
        };
        let value = Decimal::from_str(&candidate)
            .map_err(|_| AmountError::NotANumber(text.to_string()))?;
        Self::new(value)
    }

    /// Fixed-point rendering with exactly two fractional digits.
    /// Half cents round away from zero (`10.125` -> `10.13`).
    pub fn to_fixed_2(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }
}
