//! Backend-shaped contract data as produced by the extraction process.
//!
//! Every leaf is nullable and every nested object tolerates `null`. Field
//! names follow the extraction output. Loading never fails on bad values,
//! only on payloads that are not contract-shaped at all.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ContractError;
use crate::lenient;
use crate::validation::FieldIssue;

/// A backend contract after lenient normalisation.
pub type ContractDocument = BackendContract;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendContract {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub informasi_pelanggan: CustomerInfo,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub layanan_utama: MainServices,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub rincian_layanan: Vec<ServiceLineItem>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tata_cara_pembayaran: PaymentMethod,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub kontak_person_telkom: ContactPerson,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub jangka_waktu: ContractPeriod,
    /// ISO 8601 timestamp of the extraction run.
    #[serde(default, deserialize_with = "lenient::string")]
    pub extraction_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub processing_time_seconds: Option<f64>,
    /// Amounts the loader could not read and stored as `0`. Validation
    /// reports them; normalisation clears them.
    #[serde(skip)]
    pub load_issues: Vec<FieldIssue>,
}

impl BackendContract {
    /// Load a contract from extraction JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ContractError> {
        Self::from_json_value(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: Value) -> Result<Self, ContractError> {
        let load_issues = unreadable_amounts(&value);
        let mut doc: Self = serde_json::from_value(value)?;
        if !load_issues.is_empty() {
            tracing::warn!(count = load_issues.len(), "unreadable amounts loaded as 0");
        }
        doc.load_issues = load_issues;
        Ok(doc)
    }

    /// Payment methods in document order: the contract-level one first, then
    /// each service item's override.
    pub fn payment_methods(&self) -> impl Iterator<Item = &PaymentMethod> {
        std::iter::once(&self.tata_cara_pembayaran).chain(
            self.rincian_layanan
                .iter()
                .filter_map(|item| item.tata_cara_pembayaran.as_ref()),
        )
    }
}

/// Field paths of amounts that arrived as text [`lenient::amount`] cannot read.
fn unreadable_amounts(doc: &Value) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    let items = doc.get("rincian_layanan").and_then(Value::as_array);
    for (i, item) in items.into_iter().flatten().enumerate() {
        let path = format!("rincian_layanan[{i}]");
        for field in ["biaya_instalasi", "biaya_langganan_tahunan"] {
            check_amount(item.get(field), &format!("{path}.{field}"), &mut issues);
        }
        check_termin_amounts(
            item.get("tata_cara_pembayaran"),
            &format!("{path}.tata_cara_pembayaran"),
            &mut issues,
        );
    }
    check_termin_amounts(
        doc.get("tata_cara_pembayaran"),
        "tata_cara_pembayaran",
        &mut issues,
    );
    issues
}

fn check_termin_amounts(payment: Option<&Value>, path: &str, issues: &mut Vec<FieldIssue>) {
    let payments = payment
        .and_then(|pm| pm.get("termin_payments"))
        .and_then(Value::as_array);
    for (j, t) in payments.into_iter().flatten().enumerate() {
        check_amount(
            t.get("amount"),
            &format!("{path}.termin_payments[{j}].amount"),
            issues,
        );
    }
}

fn check_amount(value: Option<&Value>, path: &str, issues: &mut Vec<FieldIssue>) {
    if let Some(v) = value
        && lenient::is_unreadable_amount(v)
    {
        issues.push(FieldIssue::new(
            path,
            format!("Amount is not a number (got {v}); loaded as 0"),
        ));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub nama_pelanggan: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub alamat: Option<String>,
    /// NPWP (tax ID).
    #[serde(default, deserialize_with = "lenient::string")]
    pub npwp: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub perwakilan: Representative,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub kontak_person: ContactPerson,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Representative {
    #[serde(default, deserialize_with = "lenient::string")]
    pub nama: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub jabatan: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPerson {
    #[serde(default, deserialize_with = "lenient::string")]
    pub nama: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub jabatan: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub telepon: Option<String>,
}

/// Counts of the three main service categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainServices {
    #[serde(default, deserialize_with = "lenient::count")]
    pub connectivity_telkom: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub non_connectivity_telkom: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub bundling: u32,
}

impl MainServices {
    pub fn total(&self) -> u64 {
        u64::from(self.connectivity_telkom)
            + u64::from(self.non_connectivity_telkom)
            + u64::from(self.bundling)
    }
}

/// One service line. Both costs are gross figures (VAT included).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceLineItem {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub biaya_instalasi: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub biaya_langganan_tahunan: f64,
    #[serde(default)]
    pub tata_cara_pembayaran: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    #[default]
    OneTimeCharge,
    Recurring,
    Termin,
}

impl PaymentMethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTimeCharge => "one_time_charge",
            Self::Recurring => "recurring",
            Self::Termin => "termin",
        }
    }

    /// Parse a method tag, tolerating case, spaces and dashes.
    pub fn parse(tag: &str) -> Option<Self> {
        let key = tag.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "one_time_charge" => Some(Self::OneTimeCharge),
            "recurring" => Some(Self::Recurring),
            "termin" => Some(Self::Termin),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for PaymentMethodType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = lenient::string(deserializer)?;
        Ok(match tag.as_deref().map(str::trim) {
            None | Some("") => Self::default(),
            Some(tag) => Self::parse(tag).unwrap_or_else(|| {
                tracing::warn!(tag, "unknown payment method tag, using one_time_charge");
                Self::default()
            }),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(default)]
    pub method_type: PaymentMethodType,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub termin_payments: Vec<TerminPayment>,
    /// Payment clause as read by OCR.
    #[serde(default, deserialize_with = "lenient::string")]
    pub raw_text: Option<String>,
}

impl PaymentMethod {
    /// True when the method carries nothing beyond the default tag.
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminPayment {
    #[serde(default, deserialize_with = "lenient::count")]
    pub termin_number: u32,
    /// "Month Year" label, e.g. "Januari 2025".
    #[serde(default, deserialize_with = "lenient::string")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub raw_text: Option<String>,
}

/// Contract term as ISO calendar dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractPeriod {
    #[serde(default, deserialize_with = "lenient::string")]
    pub mulai: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub akhir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_everywhere_loads() {
        let doc = BackendContract::from_json_str(
            r#"{
                "informasi_pelanggan": null,
                "layanan_utama": null,
                "rincian_layanan": null,
                "tata_cara_pembayaran": null,
                "kontak_person_telkom": null,
                "jangka_waktu": null,
                "extraction_timestamp": null,
                "processing_time_seconds": null
            }"#,
        )
        .unwrap();
        assert_eq!(doc, BackendContract::default());
    }

    #[test]
    fn unreadable_amounts_are_remembered() {
        let doc = BackendContract::from_json_str(
            r#"{
                "rincian_layanan": [
                    {"biaya_instalasi": "Rp 1.110.000", "biaya_langganan_tahunan": "n/a"},
                    {"tata_cara_pembayaran": {"termin_payments": [{"amount": "?"}]}}
                ],
                "tata_cara_pembayaran": {"termin_payments": [{"amount": ""}, {"amount": "x"}]}
            }"#,
        )
        .unwrap();
        assert_eq!(doc.rincian_layanan[0].biaya_instalasi, 1_110_000.0);
        assert_eq!(doc.rincian_layanan[0].biaya_langganan_tahunan, 0.0);
        let paths: Vec<&str> = doc
            .load_issues
            .iter()
            .map(|i| i.field_path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec![
                "rincian_layanan[0].biaya_langganan_tahunan",
                "rincian_layanan[1].tata_cara_pembayaran.termin_payments[0].amount",
                "tata_cara_pembayaran.termin_payments[1].amount",
            ]
        );
    }

    #[test]
    fn extraction_payload_loads() {
        let doc = BackendContract::from_json_str(
            r#"{
                "informasi_pelanggan": {
                    "nama_pelanggan": "PT Maju Jaya",
                    "npwp": "12.345.678.9-012.345",
                    "perwakilan": {"nama": "Budi", "jabatan": null},
                    "kontak_person": {"telepon": 81234567890}
                },
                "layanan_utama": {"connectivity_telkom": "2", "bundling": 1},
                "rincian_layanan": [
                    {"biaya_instalasi": "1110000", "biaya_langganan_tahunan": 13320000}
                ],
                "tata_cara_pembayaran": {
                    "method_type": "Termin",
                    "termin_payments": [
                        {"termin_number": 1, "period": "Januari 2025", "amount": "5000000"}
                    ]
                },
                "extraction_timestamp": "2025-01-10T08:00:00Z",
                "processing_time_seconds": 12.5
            }"#,
        )
        .unwrap();

        assert_eq!(
            doc.informasi_pelanggan.kontak_person.telepon.as_deref(),
            Some("81234567890")
        );
        assert_eq!(doc.layanan_utama.total(), 3);
        assert_eq!(doc.rincian_layanan[0].biaya_instalasi, 1_110_000.0);
        assert_eq!(
            doc.tata_cara_pembayaran.method_type,
            PaymentMethodType::Termin
        );
        assert_eq!(doc.tata_cara_pembayaran.termin_payments[0].amount, 5_000_000.0);
        assert_eq!(doc.processing_time_seconds, Some(12.5));
    }

    #[test]
    fn unknown_method_tag_defaults() {
        let pm: PaymentMethod = serde_json::from_str(r#"{"method_type": "cicilan"}"#).unwrap();
        assert_eq!(pm.method_type, PaymentMethodType::OneTimeCharge);
        assert!(pm.is_unset());
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = BackendContract::from_json_str(r#"{"rincian_layanan": "none"}"#).unwrap_err();
        assert!(matches!(err, ContractError::Malformed(_)));
    }

    #[test]
    fn payment_methods_in_document_order() {
        let mut doc = BackendContract::default();
        doc.tata_cara_pembayaran.method_type = PaymentMethodType::Recurring;
        doc.rincian_layanan.push(ServiceLineItem {
            tata_cara_pembayaran: Some(PaymentMethod {
                method_type: PaymentMethodType::Termin,
                ..Default::default()
            }),
            ..Default::default()
        });
        doc.rincian_layanan.push(ServiceLineItem::default());
        let tags: Vec<_> = doc.payment_methods().map(|pm| pm.method_type).collect();
        assert_eq!(
            tags,
            vec![PaymentMethodType::Recurring, PaymentMethodType::Termin]
        );
    }
}
