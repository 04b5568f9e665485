use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

pub const ISO_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Converts `YYYY-MM-DD` (optionally followed by a `T...` time part) to
/// `DD/MM/YYYY`. Anything else comes back unchanged.
pub fn to_display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);

    match NaiveDate::parse_from_str(date_part, ISO_FORMAT) {
        Ok(date) => date.format(DISPLAY_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn parse_display_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DISPLAY_FORMAT).map_err(|e| EtlError::DateParseError {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// First calendar day of the month; fails for an impossible year/month.
pub fn first_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(EtlError::InvalidPeriodError { year, month })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_becomes_display_date() {
        assert_eq!(to_display_date("2025-04-15"), "15/04/2025");
    }

    #[test]
    fn test_datetime_keeps_only_date() {
        assert_eq!(to_display_date("2025-04-15T00:00:00"), "15/04/2025");
        assert_eq!(to_display_date("2025-04-15T08:30:00-03:00"), "15/04/2025");
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        assert_eq!(to_display_date("15/04/2025"), "15/04/2025");
        assert_eq!(to_display_date("sem data"), "sem data");
        assert_eq!(to_display_date(""), "");
    }

    #[test]
    fn test_parse_display_date() {
        assert_eq!(
            parse_display_date("01/04/2025").unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
        assert!(matches!(
            parse_display_date("2025-04-01"),
            Err(EtlError::DateParseError { .. })
        ));
    }

    #[test]
    fn test_first_day_of_month_rejects_month_13() {
        assert_eq!(
            first_day_of_month(2025, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
        assert!(matches!(
            first_day_of_month(2025, 13),
            Err(EtlError::InvalidPeriodError { year: 2025, month: 13 })
        ));
    }
}
