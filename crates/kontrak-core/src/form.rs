//! Form-shaped contract for interactive editing.
//!
//! Mirrors [`BackendContract`](crate::contract::BackendContract) with every
//! nullable leaf replaced by its zero value, so an editor never sees `null`.

use serde::{Deserialize, Serialize};

use crate::contract::{MainServices, PaymentMethodType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormContract {
    pub informasi_pelanggan: CustomerInfoForm,
    pub layanan_utama: MainServices,
    pub rincian_layanan: Vec<ServiceItemForm>,
    pub tata_cara_pembayaran: PaymentMethodForm,
    pub kontak_person_telkom: ContactPersonForm,
    pub jangka_waktu: ContractPeriodForm,
    /// Not editable; carried so the backend shape survives a form round trip.
    #[serde(rename = "_metadata")]
    pub metadata: ExtractionMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInfoForm {
    pub nama_pelanggan: String,
    pub alamat: String,
    pub npwp: String,
    pub perwakilan: RepresentativeForm,
    pub kontak_person: ContactPersonForm,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepresentativeForm {
    pub nama: String,
    pub jabatan: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPersonForm {
    pub nama: String,
    pub jabatan: String,
    pub email: String,
    pub telepon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceItemForm {
    pub biaya_instalasi: f64,
    pub biaya_langganan_tahunan: f64,
    /// Left at its default when the item has no payment method of its own.
    pub tata_cara_pembayaran: PaymentMethodForm,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethodForm {
    pub method_type: PaymentMethodType,
    pub description: String,
    pub termin_payments: Vec<TerminPaymentForm>,
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminPaymentForm {
    pub termin_number: u32,
    pub period: String,
    pub amount: f64,
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractPeriodForm {
    pub mulai: String,
    pub akhir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
}
