//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Offset of Brasília time (UTC-3), the default "local" time of the service.
pub const BRASILIA_UTC_OFFSET_HOURS: i32 = -3;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current local time, in the offset this clock was configured with
    fn now_local(&self) -> DateTime<FixedOffset>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Create a system clock reporting time at the given whole-hour UTC offset.
    ///
    /// Returns `None` when the offset is outside of `-23..=23` hours.
    pub fn with_utc_offset_hours(hours: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(hours.checked_mul(3600)?)?;
        Some(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            offset: brasilia_offset(),
        }
    }
}

impl Clock for SystemClock {
    fn now_local(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<FixedOffset>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    pub fn new(fixed_time: DateTime<FixedOffset>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now_local(&self) -> DateTime<FixedOffset> {
        self.fixed_time
    }
}

/// UTC-3
pub fn brasilia_offset() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap() // BRT is UTC-3
}

/// Format a date the way pt-BR locales print it (`dd/mm/yyyy`)
pub fn format_br_date(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%d/%m/%Y").to_string()
}

/// Current UTC time as RFC 3339 with millisecond precision and a `Z` suffix
pub fn utc_now_rfc3339() -> String {
    to_utc_rfc3339(Utc::now())
}

/// Convert a UTC time to RFC 3339 with millisecond precision and a `Z` suffix
pub fn to_utc_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_clock_uses_configured_offset() {
        // テスト項目: SystemClock が設定したオフセットで時刻を返す
        // given (前提条件):
        let clock = SystemClock::with_utc_offset_hours(-3).unwrap();

        // when (操作):
        let now = clock.now_local();

        // then (期待する結果):
        assert_eq!(now.offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_system_clock_rejects_out_of_range_offset() {
        // テスト項目: 範囲外のオフセットは拒否される
        // given (前提条件):
        let hours = 30;

        // when (操作):
        let clock = SystemClock::with_utc_offset_hours(hours);

        // then (期待する結果):
        assert!(clock.is_none());
    }

    #[test]
    fn test_system_clock_default_is_brasilia() {
        // テスト項目: デフォルトの SystemClock はブラジリア時間
        // given (前提条件):
        let clock = SystemClock::default();

        // when (操作):
        let offset = clock.offset();

        // then (期待する結果):
        assert_eq!(offset.local_minus_utc(), BRASILIA_UTC_OFFSET_HOURS * 3600);
    }

    #[test]
    fn test_fixed_clock_returns_consistent_time() {
        // テスト項目: FixedClock が複数回呼び出しても同じ時刻を返す
        // given (前提条件):
        let fixed = brasilia_offset()
            .with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
            .unwrap();
        let clock = FixedClock::new(fixed);

        // when (操作):
        let first = clock.now_local();
        let second = clock.now_local();

        // then (期待する結果):
        assert_eq!(first, fixed);
        assert_eq!(second, fixed);
    }

    #[test]
    fn test_format_br_date_pads_day_and_month() {
        // テスト項目: 日付が dd/mm/yyyy 形式でゼロ埋めされる
        // given (前提条件):
        let dt = brasilia_offset()
            .with_ymd_and_hms(2024, 3, 5, 23, 59, 0)
            .unwrap();

        // when (操作):
        let result = format_br_date(&dt);

        // then (期待する結果):
        assert_eq!(result, "05/03/2024");
    }

    #[test]
    fn test_local_date_differs_from_utc_date_near_midnight() {
        // テスト項目: UTC の深夜直後はブラジリア時間では前日になる
        // given (前提条件):
        let utc = Utc.with_ymd_and_hms(2024, 2, 1, 1, 0, 0).unwrap();

        // when (操作):
        let local = utc.with_timezone(&brasilia_offset());

        // then (期待する結果):
        assert_eq!(format_br_date(&local), "31/01/2024");
    }

    #[test]
    fn test_to_utc_rfc3339_uses_z_suffix_and_millis() {
        // テスト項目: RFC 3339 形式（ミリ秒・Z サフィックス）に変換される
        // given (前提条件):
        let dt = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();

        // when (操作):
        let result = to_utc_rfc3339(dt);

        // then (期待する結果):
        assert_eq!(result, "2023-01-01T00:00:00.000Z");
    }
}
