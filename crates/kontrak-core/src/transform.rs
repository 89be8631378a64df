//! Conversions between the backend and form shapes.
//!
//! `to_backend(&to_form(&d)) == normalize(&d)` for every backend contract `d`.

use crate::contract::{
    BackendContract, ContactPerson, ContractPeriod, CustomerInfo, PaymentMethod,
    Representative, ServiceLineItem, TerminPayment,
};
use crate::form::{
    ContactPersonForm, ContractPeriodForm, CustomerInfoForm, ExtractionMetadata, FormContract,
    PaymentMethodForm, RepresentativeForm, ServiceItemForm, TerminPaymentForm,
};
use crate::validation::normalize;

fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    Some(value).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Materialise every absent value as its zero value. Never fails.
pub fn to_form(doc: &BackendContract) -> FormContract {
    let c = &doc.informasi_pelanggan;
    FormContract {
        informasi_pelanggan: CustomerInfoForm {
            nama_pelanggan: or_empty(&c.nama_pelanggan),
            alamat: or_empty(&c.alamat),
            npwp: or_empty(&c.npwp),
            perwakilan: RepresentativeForm {
                nama: or_empty(&c.perwakilan.nama),
                jabatan: or_empty(&c.perwakilan.jabatan),
            },
            kontak_person: contact_to_form(&c.kontak_person),
        },
        layanan_utama: doc.layanan_utama.clone(),
        rincian_layanan: doc
            .rincian_layanan
            .iter()
            .map(|item| ServiceItemForm {
                biaya_instalasi: item.biaya_instalasi,
                biaya_langganan_tahunan: item.biaya_langganan_tahunan,
                tata_cara_pembayaran: item
                    .tata_cara_pembayaran
                    .as_ref()
                    .map(payment_to_form)
                    .unwrap_or_default(),
            })
            .collect(),
        tata_cara_pembayaran: payment_to_form(&doc.tata_cara_pembayaran),
        kontak_person_telkom: contact_to_form(&doc.kontak_person_telkom),
        jangka_waktu: ContractPeriodForm {
            mulai: or_empty(&doc.jangka_waktu.mulai),
            akhir: or_empty(&doc.jangka_waktu.akhir),
        },
        metadata: ExtractionMetadata {
            extraction_timestamp: doc.extraction_timestamp.clone(),
            processing_time_seconds: doc.processing_time_seconds,
        },
    }
}

/// Map zero values back to absent and run lenient normalisation.
///
/// Never fails. Values the editor left malformed are dropped the same way
/// the load path drops them; strict confirmation is a separate step.
pub fn to_backend(form: &FormContract) -> BackendContract {
    let c = &form.informasi_pelanggan;
    let raw = BackendContract {
        informasi_pelanggan: CustomerInfo {
            nama_pelanggan: non_empty(&c.nama_pelanggan),
            alamat: non_empty(&c.alamat),
            npwp: non_empty(&c.npwp),
            perwakilan: Representative {
                nama: non_empty(&c.perwakilan.nama),
                jabatan: non_empty(&c.perwakilan.jabatan),
            },
            kontak_person: contact_from_form(&c.kontak_person),
        },
        layanan_utama: form.layanan_utama.clone(),
        rincian_layanan: form
            .rincian_layanan
            .iter()
            .map(|item| ServiceLineItem {
                biaya_instalasi: item.biaya_instalasi,
                biaya_langganan_tahunan: item.biaya_langganan_tahunan,
                tata_cara_pembayaran: Some(payment_from_form(&item.tata_cara_pembayaran))
                    .filter(|pm| !pm.is_unset()),
            })
            .collect(),
        tata_cara_pembayaran: payment_from_form(&form.tata_cara_pembayaran),
        kontak_person_telkom: contact_from_form(&form.kontak_person_telkom),
        jangka_waktu: ContractPeriod {
            mulai: non_empty(&form.jangka_waktu.mulai),
            akhir: non_empty(&form.jangka_waktu.akhir),
        },
        extraction_timestamp: form.metadata.extraction_timestamp.clone(),
        processing_time_seconds: form.metadata.processing_time_seconds,
        load_issues: Vec::new(),
    };
    normalize(&raw)
}

fn contact_to_form(c: &ContactPerson) -> ContactPersonForm {
    ContactPersonForm {
        nama: or_empty(&c.nama),
        jabatan: or_empty(&c.jabatan),
        email: or_empty(&c.email),
        telepon: or_empty(&c.telepon),
    }
}

fn contact_from_form(c: &ContactPersonForm) -> ContactPerson {
    ContactPerson {
        nama: non_empty(&c.nama),
        jabatan: non_empty(&c.jabatan),
        email: non_empty(&c.email),
        telepon: non_empty(&c.telepon),
    }
}

fn payment_to_form(pm: &PaymentMethod) -> PaymentMethodForm {
    PaymentMethodForm {
        method_type: pm.method_type,
        description: or_empty(&pm.description),
        termin_payments: pm
            .termin_payments
            .iter()
            .map(|t| TerminPaymentForm {
                termin_number: t.termin_number,
                period: or_empty(&t.period),
                amount: t.amount,
                raw_text: or_empty(&t.raw_text),
            })
            .collect(),
        raw_text: or_empty(&pm.raw_text),
    }
}

fn payment_from_form(pm: &PaymentMethodForm) -> PaymentMethod {
    PaymentMethod {
        method_type: pm.method_type,
        description: non_empty(&pm.description),
        termin_payments: pm
            .termin_payments
            .iter()
            .map(|t| TerminPayment {
                termin_number: t.termin_number,
                period: non_empty(&t.period),
                amount: t.amount,
                raw_text: non_empty(&t.raw_text),
            })
            .collect(),
        raw_text: non_empty(&pm.raw_text),
    }
}
