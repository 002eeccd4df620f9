use anyhow::{Context as _, Result};
use chrono::{DateTime, Duration, Local, Utc};
use crate::error::invalid_input;
use mailcamp_core::domain::{parse_field_assignment, CustomFields};
use std::fs;
use std::path::Path;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn days_ago_utc(days: u32) -> Result<i64> {
    Duration::try_days(i64::from(days))
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .map(|cutoff| cutoff.timestamp())
        .ok_or_else(|| invalid_input(format!("{days} days is out of range")))
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Parses repeated `--field key=value` flags; later assignments win.
pub fn parse_fields(raw: &[String]) -> Result<CustomFields> {
    let mut fields = CustomFields::new();
    for assignment in raw {
        let (key, value) = parse_field_assignment(assignment)?;
        fields.insert(key, value);
    }
    Ok(fields)
}

pub fn display_or_dash(value: Option<&str>) -> &str {
    value.filter(|value| !value.is_empty()).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_field_assignments_win() {
        let fields = parse_fields(&["plan=free".to_string(), "plan = pro".to_string()])
            .expect("parse fields");
        assert_eq!(fields.get("plan").map(String::as_str), Some("pro"));
    }

    #[test]
    fn days_ago_counts_back_from_now() {
        let cutoff = days_ago_utc(1).expect("one day");
        let elapsed = now_utc() - cutoff;
        assert!((86_400..86_400 + 5).contains(&elapsed));
    }

    #[test]
    fn days_ago_rejects_unrepresentable_window() {
        assert!(days_ago_utc(u32::MAX).is_err());
    }

    #[test]
    fn field_without_separator_is_rejected() {
        assert!(parse_fields(&["plan".to_string()]).is_err());
    }
}
