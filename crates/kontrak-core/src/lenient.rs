//! Forgiving deserializers for extraction output.
//!
//! The extraction process emits `null` anywhere, numbers as strings and
//! strings as numbers. These helpers absorb that noise at load time so that
//! only structurally wrong payloads (an object where a scalar belongs) fail.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::{self, Deserialize, DeserializeOwned, Deserializer, Unexpected};
use serde_json::Value;

/// `1.110.000` or `1.110.000,50`: dots group thousands, a comma marks decimals.
static GROUPED_RUPIAH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}(?:\.\d{3})+)(?:,(\d+))?$").expect("rupiah regex compiles")
});

fn unexpected(v: &Value) -> Unexpected<'_> {
    match v {
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
        _ => Unexpected::Other("scalar"),
    }
}

/// Parse a numeric-looking string. Blank or non-numeric text yields `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a rupiah amount as OCR writes it: an optional `Rp` prefix, then
/// either a plain number or Indonesian digit grouping.
pub fn parse_amount(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let bare = ["Rp.", "Rp", "RP.", "RP"]
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(*prefix))
        .unwrap_or(trimmed)
        .trim_start();
    if let Some(caps) = GROUPED_RUPIAH.captures(bare) {
        let whole = caps[1].replace('.', "");
        let fraction = caps.get(2).map_or("0", |m| m.as_str());
        return format!("{whole}.{fraction}").parse().ok();
    }
    parse_number(bare)
}

/// A string amount that [`amount`] would have to replace with `0`.
pub fn is_unreadable_amount(v: &Value) -> bool {
    match v {
        Value::String(s) => !s.trim().is_empty() && parse_amount(s).is_none(),
        _ => false,
    }
}

/// Optional text field. Numbers and booleans are kept as their textual form.
pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a string or null")),
    }
}

/// Monetary amount. `null`, blank and unreadable strings become `0`.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Null | Value::Bool(_) => Ok(0.0),
        Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => Ok(parse_amount(&s).unwrap_or(0.0)),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a number or null")),
    }
}

/// Optional number (processing duration and similar metadata).
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Null | Value::Bool(_) => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => Ok(parse_number(&s)),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a number or null")),
    }
}

/// Non-negative count. Negative, fractional-noise and non-numeric input is
/// clamped/rounded into range; anything unusable becomes `0`.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = amount(deserializer)?;
    if n <= 0.0 {
        return Ok(0);
    }
    Ok(n.round().min(u32::MAX as f64) as u32)
}

/// Nested object that may arrive as `null`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(deserializer)?;
    if v.is_null() {
        return Ok(T::default());
    }
    T::deserialize(v).map_err(de::Error::custom)
}
