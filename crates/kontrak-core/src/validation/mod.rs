//! Contract schema: one validator, two failure policies.
//!
//! [`Strictness::Lenient`] is the load path. It never fails: malformed values
//! are dropped to absent and reported as advisories so a corrupted OCR result
//! can still be opened for editing. [`Strictness::Strict`] is the
//! confirmation gate. It applies the same field grammar but turns every
//! malformed value into an error and adds the whole-document rules.

mod rules;

use serde::Serialize;
use thiserror::Error;

use crate::contract::{
    BackendContract, ContactPerson, ContractDocument, ContractPeriod, CustomerInfo,
    PaymentMethod, PaymentMethodType, Representative, ServiceLineItem, TerminPayment,
};
use crate::termin::check_schedule;
use rules::Findings;

pub(crate) use rules::parse_iso_date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Load mode: coerce, never fail.
    #[default]
    Lenient,
    /// Confirmation mode: report everything.
    Strict,
}

/// A message attached to a dotted field path such as
/// `rincian_layanan[0].tata_cara_pembayaran.termin_payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    pub field_path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field_path: &str, message: impl Into<String>) -> Self {
        Self {
            field_path: field_path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field_path, self.message)
    }
}

/// Ordered field errors from a failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("contract failed validation with {} issue(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldIssue>);

impl ValidationErrors {
    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }
}

/// A document that passed validation, with any non-fatal findings.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub document: ContractDocument,
    pub advisories: Vec<FieldIssue>,
}

pub type ValidationResult = Result<Validated, ValidationErrors>;

/// Serializable form of a [`ValidationResult`]:
/// `{"ok": true, "value": …}` or `{"ok": false, "errors": […]}`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ContractDocument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<FieldIssue>,
}

impl From<ValidationResult> for ValidationReport {
    fn from(result: ValidationResult) -> Self {
        match result {
            Ok(v) => Self {
                ok: true,
                value: Some(v.document),
                errors: Vec::new(),
                advisories: v.advisories,
            },
            Err(e) => Self {
                ok: false,
                value: None,
                errors: e.0,
                advisories: Vec::new(),
            },
        }
    }
}

/// Validate and normalise a contract.
///
/// Lenient mode always returns `Ok`. Strict mode returns every problem it
/// finds, in document order.
pub fn validate(doc: &BackendContract, strictness: Strictness) -> ValidationResult {
    let (document, findings) = run(doc, strictness);
    tracing::debug!(
        ?strictness,
        errors = findings.errors.len(),
        advisories = findings.advisories.len(),
        "contract validated"
    );
    if findings.errors.is_empty() {
        Ok(Validated {
            document,
            advisories: findings.advisories,
        })
    } else {
        Err(ValidationErrors(findings.errors))
    }
}

/// Lenient normalisation: the document as the load path would store it.
///
/// Idempotent: `normalize(&normalize(d)) == normalize(d)`.
pub fn normalize(doc: &BackendContract) -> ContractDocument {
    run(doc, Strictness::Lenient).0
}

fn run(doc: &BackendContract, strictness: Strictness) -> (ContractDocument, Findings) {
    let mut findings = Findings::new(strictness);

    let informasi_pelanggan =
        customer_info(&doc.informasi_pelanggan, "informasi_pelanggan", &mut findings);

    let layanan_utama = doc.layanan_utama.clone();
    if layanan_utama.total() == 0 {
        findings.require("layanan_utama", "At least one main service is required");
    }

    let rincian_layanan = doc
        .rincian_layanan
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("rincian_layanan[{i}]");
            unreadable_amounts(&doc.load_issues, &path, &mut findings);
            service_item(item, &path, &mut findings)
        })
        .collect();

    unreadable_amounts(&doc.load_issues, "tata_cara_pembayaran", &mut findings);
    let tata_cara_pembayaran = payment_method(
        &doc.tata_cara_pembayaran,
        "tata_cara_pembayaran",
        &mut findings,
    );

    let kontak_person_telkom = contact_person(
        &doc.kontak_person_telkom,
        "kontak_person_telkom",
        &mut findings,
    );

    let jangka_waktu = contract_period(&doc.jangka_waktu, "jangka_waktu", &mut findings);

    let document = BackendContract {
        informasi_pelanggan,
        layanan_utama,
        rincian_layanan,
        tata_cara_pembayaran,
        kontak_person_telkom,
        jangka_waktu,
        extraction_timestamp: doc.extraction_timestamp.clone(),
        processing_time_seconds: doc.processing_time_seconds,
        load_issues: Vec::new(),
    };
    (document, findings)
}

/// Amounts under `path` that the loader replaced with `0`.
fn unreadable_amounts(load_issues: &[FieldIssue], path: &str, findings: &mut Findings) {
    let prefix = format!("{path}.");
    for issue in load_issues
        .iter()
        .filter(|issue| issue.field_path.starts_with(&prefix))
    {
        findings.malformed(&issue.field_path, issue.message.clone());
    }
}

fn customer_info(c: &CustomerInfo, path: &str, findings: &mut Findings) -> CustomerInfo {
    let nama_pelanggan = rules::text(c.nama_pelanggan.as_deref());
    if nama_pelanggan.is_none() {
        findings.require(
            &format!("{path}.nama_pelanggan"),
            "Customer name is required",
        );
    }
    CustomerInfo {
        nama_pelanggan,
        alamat: rules::text(c.alamat.as_deref()),
        npwp: rules::tax_id(c.npwp.as_deref(), &format!("{path}.npwp"), findings),
        perwakilan: Representative {
            nama: rules::text(c.perwakilan.nama.as_deref()),
            jabatan: rules::text(c.perwakilan.jabatan.as_deref()),
        },
        kontak_person: contact_person(&c.kontak_person, &format!("{path}.kontak_person"), findings),
    }
}

fn contact_person(c: &ContactPerson, path: &str, findings: &mut Findings) -> ContactPerson {
    ContactPerson {
        nama: rules::text(c.nama.as_deref()),
        jabatan: rules::text(c.jabatan.as_deref()),
        email: rules::email(c.email.as_deref(), &format!("{path}.email"), findings),
        telepon: rules::phone(c.telepon.as_deref(), &format!("{path}.telepon"), findings),
    }
}

fn service_item(item: &ServiceLineItem, path: &str, findings: &mut Findings) -> ServiceLineItem {
    rules::non_negative_amount(
        item.biaya_instalasi,
        &format!("{path}.biaya_instalasi"),
        findings,
    );
    rules::non_negative_amount(
        item.biaya_langganan_tahunan,
        &format!("{path}.biaya_langganan_tahunan"),
        findings,
    );
    let tata_cara_pembayaran = item
        .tata_cara_pembayaran
        .as_ref()
        .map(|pm| payment_method(pm, &format!("{path}.tata_cara_pembayaran"), findings))
        .filter(|pm| !pm.is_unset());
    ServiceLineItem {
        biaya_instalasi: item.biaya_instalasi,
        biaya_langganan_tahunan: item.biaya_langganan_tahunan,
        tata_cara_pembayaran,
    }
}

fn payment_method(pm: &PaymentMethod, path: &str, findings: &mut Findings) -> PaymentMethod {
    let termin_payments: Vec<TerminPayment> = pm
        .termin_payments
        .iter()
        .map(|t| TerminPayment {
            termin_number: t.termin_number,
            period: rules::text(t.period.as_deref()),
            amount: t.amount,
            raw_text: rules::text(t.raw_text.as_deref()),
        })
        .collect();

    if pm.method_type == PaymentMethodType::Termin {
        let list_path = format!("{path}.termin_payments");
        if termin_payments.is_empty() {
            findings.require(&list_path, "At least one termin payment is required");
        }
        for issue in check_schedule(&termin_payments, &list_path) {
            findings.flag(issue);
        }
    }

    PaymentMethod {
        method_type: pm.method_type,
        description: rules::text(pm.description.as_deref()),
        termin_payments,
        raw_text: rules::text(pm.raw_text.as_deref()),
    }
}

fn contract_period(p: &ContractPeriod, path: &str, findings: &mut Findings) -> ContractPeriod {
    let mulai = rules::iso_date(p.mulai.as_deref(), &format!("{path}.mulai"), findings);
    let akhir = rules::iso_date(p.akhir.as_deref(), &format!("{path}.akhir"), findings);
    // Canonical ISO strings compare in calendar order.
    if let (Some(start), Some(end)) = (&mulai, &akhir)
        && end <= start
    {
        findings.require(
            &format!("{path}.akhir"),
            "Contract end date must be after the start date",
        );
    }
    ContractPeriod { mulai, akhir }
}
