//! Single-value normalisers for OCR-extracted fields.
//!
//! Indonesian tax IDs (NPWP) come out of OCR with dots, dashes and letter
//! confusions; phone numbers come out in every local and international
//! notation. Normalisers never reject: they return a canonical value and let
//! the validators decide whether the result is acceptable.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Digit counts accepted for an NPWP: legacy 15-digit, NIK-based 16-digit,
/// and 15-digit plus 4-digit branch suffix.
pub const TAX_ID_DIGIT_COUNTS: [usize; 3] = [15, 16, 19];

static TAX_ID_15_FORMATTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}\.\d{3}\.\d{3}\.\d-\d{3}\.\d{3}$").expect("15-digit NPWP regex compiles")
});

static TAX_ID_19_FORMATTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}\.\d{3}\.\d{3}\.\d-\d{3}\.\d{3}\.\d{4}$")
        .expect("19-digit NPWP regex compiles")
});

static PHONE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+62\d{8,13}$").expect("phone regex compiles"));

/// Outcome of [`normalize_tax_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxIdNormalization {
    /// Digits of the ID. Input with no digits at all is echoed back
    /// trimmed, so that a rejected value normalises to itself.
    pub value: String,
    pub valid: bool,
    pub digit_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaxIdNormalization {
    fn accepted(value: String) -> Self {
        let digit_count = value.len();
        Self {
            value,
            valid: true,
            digit_count,
            error: None,
        }
    }

    fn rejected(value: String, digit_count: usize) -> Self {
        Self {
            error: Some(format!(
                "NPWP must have 15, 16, or 19 digits (found {digit_count})"
            )),
            value,
            valid: false,
            digit_count,
        }
    }
}

fn is_accepted_len(len: usize) -> bool {
    TAX_ID_DIGIT_COUNTS.contains(&len)
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Map characters OCR commonly confuses with digits back to the digit.
fn ocr_substitute(c: char) -> char {
    match c {
        'O' => '0',
        'I' | 'l' | '|' => '1',
        'S' => '5',
        'B' => '8',
        other => other,
    }
}

/// Normalise a raw NPWP string into its digits.
///
/// Pure-digit input of an accepted length passes through unchanged, the two
/// punctuated layouts (`XX.XXX.XXX.X-XXX.XXX` and the same with a `.XXXX`
/// branch suffix) are reduced to digits, and anything else is stripped of
/// non-digits, falling back to OCR-noise substitution when the plain strip
/// does not yield an accepted length. Empty input is valid: the field is
/// optional.
pub fn normalize_tax_id(raw: &str) -> TaxIdNormalization {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return TaxIdNormalization::accepted(String::new());
    }

    if trimmed.bytes().all(|b| b.is_ascii_digit()) && is_accepted_len(trimmed.len()) {
        return TaxIdNormalization::accepted(trimmed.to_string());
    }

    if TAX_ID_15_FORMATTED.is_match(trimmed) || TAX_ID_19_FORMATTED.is_match(trimmed) {
        return TaxIdNormalization::accepted(digits_only(trimmed));
    }

    let stripped = digits_only(trimmed);
    if is_accepted_len(stripped.len()) {
        return TaxIdNormalization::accepted(stripped);
    }

    let substituted: String = trimmed.chars().map(ocr_substitute).collect();
    let recovered = digits_only(&substituted);
    if is_accepted_len(recovered.len()) {
        return TaxIdNormalization::accepted(recovered);
    }

    if stripped.is_empty() {
        return TaxIdNormalization::rejected(trimmed.to_string(), 0);
    }
    let digit_count = stripped.len();
    TaxIdNormalization::rejected(stripped, digit_count)
}

/// Render an NPWP for display.
///
/// 15 and 19 digit IDs get the dotted layout, 16-digit (NIK) IDs stay as bare
/// digits. Input that does not normalise to a valid ID is returned as-is.
pub fn format_tax_id(raw: &str) -> String {
    let n = normalize_tax_id(raw);
    if !n.valid || n.value.is_empty() {
        return raw.to_string();
    }
    let d = &n.value;
    match d.len() {
        15 => format!(
            "{}.{}.{}.{}-{}.{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..9],
            &d[9..12],
            &d[12..15]
        ),
        19 => format!(
            "{}.{}.{}.{}-{}.{}.{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..9],
            &d[9..12],
            &d[12..15],
            &d[15..19]
        ),
        _ => d.clone(),
    }
}

/// Normalise a phone number towards `+62` international form.
///
/// Keeps digits and a leading `+`. A leading `0` is replaced with `+62`, a
/// bare `62` prefix gains a `+`, numbers already carrying `+` are kept, and
/// anything else is treated as a local number. Never rejects; use
/// [`is_valid_phone`] on the result.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let international = trimmed.starts_with('+');
    let digits = digits_only(trimmed);
    if digits.is_empty() {
        return String::new();
    }

    if international {
        format!("+{digits}")
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("+62{rest}")
    } else if digits.starts_with("62") {
        format!("+{digits}")
    } else {
        format!("+62{digits}")
    }
}

/// `+62` followed by 8 to 13 digits.
pub fn is_valid_phone(normalized: &str) -> bool {
    PHONE_SHAPE.is_match(normalized)
}

/// Render a phone number as `+62 812-3456-7890`.
///
/// Input that does not normalise to a valid `+62` number is returned as-is.
pub fn format_phone(raw: &str) -> String {
    let normalized = normalize_phone(raw);
    if !is_valid_phone(&normalized) {
        return raw.to_string();
    }
    let subscriber = &normalized[3..];
    let (head, tail) = subscriber.split_at(3);
    let mut groups = vec![head.to_string()];
    let tail: Vec<char> = tail.chars().collect();
    groups.extend(tail.chunks(4).map(|c| c.iter().collect::<String>()));
    format!("+62 {}", groups.join("-"))
}
