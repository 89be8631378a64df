//! Field grammar shared by lenient and strict validation.
//!
//! Each rule takes the raw value and a [`Findings`] sink and returns the
//! normalised value. Malformed values are always dropped from the output;
//! the sink decides whether that is an error or an advisory.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use super::{FieldIssue, Strictness};
use crate::normalize::{is_valid_phone, normalize_phone, normalize_tax_id};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex compiles")
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex compiles"));

/// Collects issues according to the validation mode.
#[derive(Debug)]
pub(crate) struct Findings {
    strictness: Strictness,
    pub errors: Vec<FieldIssue>,
    pub advisories: Vec<FieldIssue>,
}

impl Findings {
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            errors: Vec::new(),
            advisories: Vec::new(),
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }

    /// A non-empty value that does not match its field grammar.
    pub fn malformed(&mut self, field_path: &str, message: impl Into<String>) {
        let issue = FieldIssue::new(field_path, message);
        match self.strictness {
            Strictness::Strict => self.errors.push(issue),
            Strictness::Lenient => {
                tracing::debug!(field = field_path, reason = %issue.message, "discarding malformed value");
                self.advisories.push(issue);
            }
        }
    }

    /// A schedule or amount problem: fatal when strict, advisory otherwise.
    pub fn flag(&mut self, issue: FieldIssue) {
        match self.strictness {
            Strictness::Strict => self.errors.push(issue),
            Strictness::Lenient => self.advisories.push(issue),
        }
    }

    /// A whole-document rule, only enforced at confirmation.
    pub fn require(&mut self, field_path: &str, message: impl Into<String>) {
        if self.is_strict() {
            self.errors.push(FieldIssue::new(field_path, message));
        }
    }
}

/// Blank text is absent; anything else is kept verbatim.
pub(crate) fn text(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty()).map(str::to_string)
}

pub(crate) fn tax_id(raw: Option<&str>, path: &str, findings: &mut Findings) -> Option<String> {
    let raw = text(raw)?;
    let normalized = normalize_tax_id(&raw);
    if normalized.valid {
        return Some(normalized.value).filter(|v| !v.is_empty());
    }
    findings.malformed(
        path,
        normalized
            .error
            .unwrap_or_else(|| "NPWP is not valid".to_string()),
    );
    None
}

pub(crate) fn phone(raw: Option<&str>, path: &str, findings: &mut Findings) -> Option<String> {
    let raw = text(raw)?;
    let normalized = normalize_phone(&raw);
    if is_valid_phone(&normalized) {
        return Some(normalized);
    }
    findings.malformed(
        path,
        format!("Phone number must be +62 followed by 8 to 13 digits (got {raw:?})"),
    );
    None
}

pub(crate) fn email(raw: Option<&str>, path: &str, findings: &mut Findings) -> Option<String> {
    let raw = text(raw)?;
    let trimmed = raw.trim();
    if EMAIL.is_match(trimmed) {
        return Some(trimmed.to_string());
    }
    findings.malformed(path, format!("Email address is not valid (got {raw:?})"));
    None
}

/// Parse a zero-padded `YYYY-MM-DD` date or an RFC 3339 timestamp, keeping
/// the timestamp's calendar date in its own offset.
pub(crate) fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if ISO_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok();
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

pub(crate) fn iso_date(raw: Option<&str>, path: &str, findings: &mut Findings) -> Option<String> {
    let raw = text(raw)?;
    match parse_iso_date(&raw) {
        Some(date) => Some(date.format("%Y-%m-%d").to_string()),
        None => {
            findings.malformed(
                path,
                format!("Date must be an ISO calendar date YYYY-MM-DD (got {raw:?})"),
            );
            None
        }
    }
}

pub(crate) fn non_negative_amount(amount: f64, path: &str, findings: &mut Findings) {
    if amount < 0.0 {
        findings.flag(FieldIssue::new(
            path,
            format!("Amount must not be negative (got {amount})"),
        ));
    }
}
