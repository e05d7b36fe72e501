use std::sync::LazyLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;

static LEADING_PLUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+").unwrap());

/// Phone numbers go to the orders endpoint without the international `+`.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let phone = LEADING_PLUS.replace(trimmed, "").into_owned();

    if phone.is_empty() { None } else { Some(phone) }
}

pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

pub fn format_local(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%d/%m/%Y, %H:%M:%S").to_string()
}
