// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured data extracted from a customer message.
//!
//! [`ExtractedEntities::from_json`] is the coercion boundary for untrusted
//! backend output: every field is checked on its own and dropped unless it is
//! positively recognized. It never fails.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum digit count for a value to be accepted as a phone number.
const MIN_PHONE_DIGITS: usize = 6;

/// Typed entity fields. All absent unless recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    /// Calendar date (serialized as ISO `YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// 24-hour `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Person name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

impl ExtractedEntities {
    /// Coerces an untrusted JSON value field by field.
    ///
    /// Non-object input yields empty entities.
    pub fn from_json(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        Self {
            date: map.get("date").and_then(coerce_date),
            time: map.get("time").and_then(coerce_time),
            service: map.get("service").and_then(coerce_text),
            name: map.get("name").and_then(coerce_text),
            phone: map.get("phone").and_then(coerce_phone),
            email: map.get("email").and_then(coerce_email),
            quantity: map.get("quantity").and_then(coerce_quantity),
        }
    }

    /// True when no field was recognized.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(text.to_string())
    }
}

fn coerce_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

fn coerce_time(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
        .map(|t| t.format("%H:%M").to_string())
}

fn coerce_phone(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let digits = text.chars().filter(char::is_ascii_digit).count();
    (digits >= MIN_PHONE_DIGITS).then_some(text)
}

fn coerce_email(value: &Value) -> Option<String> {
    let text = coerce_text(value)?;
    let (local, domain) = text.split_once('@')?;
    (!local.is_empty() && domain.contains('.') && !text.contains(char::is_whitespace))
        .then_some(text)
}

fn coerce_quantity(value: &Value) -> Option<i64> {
    let quantity = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral))?,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))?
        }
        _ => return None,
    };
    (quantity >= 0).then_some(quantity)
}

/// Accepts floats with no fractional part that fit in an `i64`.
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_string_quantity_is_parsed() {
        let e = ExtractedEntities::from_json(&json!({"quantity": "3"}));
        assert_eq!(e.quantity, Some(3));
    }

    #[test]
    fn non_numeric_quantity_is_dropped() {
        let e = ExtractedEntities::from_json(&json!({"quantity": "three"}));
        assert_eq!(e.quantity, None);
        assert!(e.is_empty());
    }

    #[test]
    fn quantity_accepts_integral_numbers_only() {
        assert_eq!(ExtractedEntities::from_json(&json!({"quantity": 4})).quantity, Some(4));
        assert_eq!(ExtractedEntities::from_json(&json!({"quantity": 2.0})).quantity, Some(2));
        assert_eq!(ExtractedEntities::from_json(&json!({"quantity": 2.5})).quantity, None);
        assert_eq!(ExtractedEntities::from_json(&json!({"quantity": -1})).quantity, None);
        assert_eq!(ExtractedEntities::from_json(&json!({"quantity": true})).quantity, None);
    }

    #[test]
    fn dates_must_be_iso_calendar_dates() {
        let e = ExtractedEntities::from_json(&json!({"date": "2026-10-21"}));
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2026, 10, 21));
        let e = ExtractedEntities::from_json(&json!({"date": "2026-02-30"}));
        assert_eq!(e.date, None);
        let e = ExtractedEntities::from_json(&json!({"date": "next tuesday"}));
        assert_eq!(e.date, None);
    }

    #[test]
    fn times_normalize_to_24h_minutes() {
        assert_eq!(
            ExtractedEntities::from_json(&json!({"time": "9:30"})).time.as_deref(),
            Some("09:30")
        );
        assert_eq!(
            ExtractedEntities::from_json(&json!({"time": "14:05:00"})).time.as_deref(),
            Some("14:05")
        );
        assert_eq!(ExtractedEntities::from_json(&json!({"time": "25:00"})).time, None);
        assert_eq!(ExtractedEntities::from_json(&json!({"time": "3pm"})).time, None);
    }

    #[test]
    fn text_fields_reject_blank_and_non_strings() {
        let e = ExtractedEntities::from_json(&json!({
            "service": "  Haircut ",
            "name": "",
            "email": 42,
        }));
        assert_eq!(e.service.as_deref(), Some("Haircut"));
        assert_eq!(e.name, None);
        assert_eq!(e.email, None);
    }

    #[test]
    fn contact_fields_need_plausible_shapes() {
        let e = ExtractedEntities::from_json(&json!({
            "phone": "+33 6 12 34 56 78",
            "email": "anna@example.com",
        }));
        assert_eq!(e.phone.as_deref(), Some("+33 6 12 34 56 78"));
        assert_eq!(e.email.as_deref(), Some("anna@example.com"));

        let e = ExtractedEntities::from_json(&json!({"phone": "12", "email": "not an email"}));
        assert_eq!(e.phone, None);
        assert_eq!(e.email, None);
    }

    #[test]
    fn non_object_input_yields_empty_entities() {
        assert!(ExtractedEntities::from_json(&json!("date: today")).is_empty());
        assert!(ExtractedEntities::from_json(&Value::Null).is_empty());
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let e = ExtractedEntities {
            quantity: Some(2),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&e).unwrap(), json!({"quantity": 2}));
    }
}
