//! Base contract system
//!
//! A contract turns the raw strings of a submitted form into a validated
//! insert DTO, or into the full set of problems found with the submission.

use std::str::FromStr;

use chrono::NaiveDate;
use obra_core::error::ValidationErrors;
use obra_core::traits::Id;
use rust_decimal::Decimal;

/// Result of contract validation
pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Largest magnitude accepted for any money or quantity field
pub const MAX_NUMERIC: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0); // 1e12

/// Date format used by forms and query strings
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const BLANK: &str = "can't be blank";

/// Base contract trait
pub trait Contract<P>: Send + Sync {
    /// Validated value produced from the params
    type Output;

    /// Validate the submitted params
    fn validate(&self, params: &P) -> ValidationResult<Self::Output>;
}

/// Trimmed value of an optional form field; blank counts as absent
pub fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

/// Like [`present`], owned
pub fn present_owned(raw: Option<&str>) -> Option<String> {
    present(raw).map(str::to_string)
}

/// Parse a decimal as typed by a user: "1,250.50" -> 1250.50
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parse a positive record id; anything else is `None`
pub fn parse_id(raw: &str) -> Option<Id> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<Id>().ok().filter(|id| *id > 0)
}

/// Validate a required text field, adding "can't be blank" when missing
pub fn require_text(field: &str, raw: Option<&str>, errors: &mut ValidationErrors) -> String {
    match present(raw) {
        Some(value) => value.to_string(),
        None => {
            errors.add(field, BLANK);
            String::new()
        }
    }
}

/// Whether `value` has more decimal places than `scale` (trailing zeros ignored)
pub fn exceeds_scale(value: Decimal, scale: u32) -> bool {
    value.normalize().scale() > scale
}

pub fn scale_message(scale: u32) -> String {
    format!("must have at most {} decimal places", scale)
}

/// Validate a non-negative decimal field where blank means zero
pub fn non_negative_or_zero(
    field: &str,
    raw: Option<&str>,
    scale: u32,
    errors: &mut ValidationErrors,
) -> Decimal {
    let Some(raw) = present(raw) else {
        return Decimal::ZERO;
    };
    match parse_decimal(raw) {
        None => {
            errors.add(field, "is not a number");
            Decimal::ZERO
        }
        Some(value) if value.is_sign_negative() && !value.is_zero() => {
            errors.add(field, "must be greater than or equal to 0");
            Decimal::ZERO
        }
        Some(value) if exceeds_scale(value, scale) => {
            errors.add(field, scale_message(scale));
            Decimal::ZERO
        }
        Some(value) if value > MAX_NUMERIC => {
            errors.add(field, "is too large");
            Decimal::ZERO
        }
        Some(value) => value,
    }
}

/// Merge length violations found by the DTO's `validator` rules.
///
/// Fields that already carry an error are skipped so one problem is reported
/// once. Fields are visited in name order for stable messages.
pub fn merge_length_errors(
    result: Result<(), validator::ValidationErrors>,
    errors: &mut ValidationErrors,
) {
    let Err(found) = result else {
        return;
    };

    let field_errors = found.field_errors();
    let mut fields: Vec<_> = field_errors.keys().copied().collect();
    fields.sort_unstable();

    for field in fields {
        if errors.has_error(field) {
            continue;
        }
        for error in field_errors[field].iter() {
            let max = error.params.get("max").and_then(|v| v.as_u64());
            let message = match (error.code.as_ref(), max) {
                ("length", Some(max)) if !below_min(error) => {
                    format!("is too long (maximum is {} characters)", max)
                }
                ("length", _) => BLANK.to_string(),
                _ => "is invalid".to_string(),
            };
            errors.add(field, message);
        }
    }
}

/// Whether a length error was raised by the `min` bound
fn below_min(error: &validator::ValidationError) -> bool {
    let min = error.params.get("min").and_then(|v| v.as_u64());
    let len = error
        .params
        .get("value")
        .and_then(|v| v.as_str())
        .map(|v| v.chars().count() as u64);
    matches!((min, len), (Some(min), Some(len)) if len < min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_numeric_is_one_trillion() {
        assert_eq!(MAX_NUMERIC, dec!(1_000_000_000_000));
    }

    #[test]
    fn test_parse_decimal_strips_thousands_separators() {
        assert_eq!(parse_decimal("1,250.50"), Some(dec!(1250.50)));
        assert_eq!(parse_decimal(" 150.50 "), Some(dec!(150.50)));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal(","), None);
    }

    #[test]
    fn test_extra_decimal_places_are_rejected_not_rounded() {
        let mut errors = ValidationErrors::new();
        assert_eq!(non_negative_or_zero("quantity", Some("2.5000"), 3, &mut errors), dec!(2.5));
        assert!(errors.is_empty());

        let value = non_negative_or_zero("unit_price", Some("80.405"), 2, &mut errors);
        assert_eq!(value, Decimal::ZERO);
        assert_eq!(errors.get("unit_price"), vec!["must have at most 2 decimal places"]);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-02"),
            NaiveDate::from_ymd_opt(2024, 5, 2)
        );
        assert_eq!(parse_date("02/05/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("3a"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_non_negative_or_zero() {
        let mut errors = ValidationErrors::new();
        assert_eq!(non_negative_or_zero("quantity", None, 3, &mut errors), Decimal::ZERO);
        assert_eq!(non_negative_or_zero("quantity", Some("  "), 3, &mut errors), Decimal::ZERO);
        assert_eq!(non_negative_or_zero("quantity", Some("2.5"), 3, &mut errors), dec!(2.5));
        assert!(errors.is_empty());

        non_negative_or_zero("unit_price", Some("-1"), 2, &mut errors);
        non_negative_or_zero("quantity", Some("lots"), 3, &mut errors);
        assert_eq!(errors.get("unit_price"), vec!["must be greater than or equal to 0"]);
        assert_eq!(errors.get("quantity"), vec!["is not a number"]);
    }

    #[test]
    fn test_present() {
        assert_eq!(present(Some("  x ")), Some("x"));
        assert_eq!(present(Some("   ")), None);
        assert_eq!(present(None), None);
    }
}
