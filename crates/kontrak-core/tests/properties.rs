use kontrak_core::contract::{
    BackendContract, ContactPerson, ContractPeriod, CustomerInfo, MainServices, PaymentMethod,
    PaymentMethodType, Representative, ServiceLineItem, TerminPayment,
};
use kontrak_core::finance::{aggregate, from_gross, service_breakdown};
use kontrak_core::form::TerminPaymentForm;
use kontrak_core::termin::{Installment, remove_installment};
use kontrak_core::{normalize, normalize_tax_id, to_backend, to_form};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   ".to_string())),
        "[A-Za-z .,]{1,24}".prop_map(Some),
    ]
}

fn tax_id() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[0-9]{15}".prop_map(Some),
        "[0-9]{2}\\.[0-9]{3}\\.[0-9]{3}\\.[0-9]-[0-9]{3}\\.[0-9]{3}".prop_map(Some),
        "[0-9.\\- OlISB|]{0,24}".prop_map(Some),
    ]
}

fn phone() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "0[0-9]{9,12}".prop_map(Some),
        "\\+?[0-9 ()\\-]{0,18}".prop_map(Some),
    ]
}

fn email() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[a-z]{1,8}@[a-z]{1,8}\\.(com|co\\.id|id)".prop_map(Some),
        "[ -~]{0,16}".prop_map(Some),
    ]
}

fn date() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "20[0-9]{2}-[01][0-9]-[0-3][0-9]".prop_map(Some),
        "20[0-9]{2}-0[1-9]-1[0-9]T00:00:00Z".prop_map(Some),
        "[0-9/ ]{0,10}".prop_map(Some),
    ]
}

fn amount() -> impl Strategy<Value = f64> {
    (0u64..50_000_000_000).prop_map(|n| n as f64)
}

fn contact() -> impl Strategy<Value = ContactPerson> {
    (text(), text(), email(), phone()).prop_map(|(nama, jabatan, email, telepon)| ContactPerson {
        nama,
        jabatan,
        email,
        telepon,
    })
}

fn termin() -> impl Strategy<Value = TerminPayment> {
    (0u32..6, text(), amount(), text()).prop_map(|(termin_number, period, amount, raw_text)| {
        TerminPayment {
            termin_number,
            period,
            amount,
            raw_text,
        }
    })
}

fn payment_method() -> impl Strategy<Value = PaymentMethod> {
    (
        prop_oneof![
            Just(PaymentMethodType::OneTimeCharge),
            Just(PaymentMethodType::Recurring),
            Just(PaymentMethodType::Termin),
        ],
        text(),
        proptest::collection::vec(termin(), 0..4),
        text(),
    )
        .prop_map(|(method_type, description, termin_payments, raw_text)| PaymentMethod {
            method_type,
            description,
            termin_payments,
            raw_text,
        })
}

fn service_item() -> impl Strategy<Value = ServiceLineItem> {
    (amount(), amount(), proptest::option::of(payment_method())).prop_map(
        |(biaya_instalasi, biaya_langganan_tahunan, tata_cara_pembayaran)| ServiceLineItem {
            biaya_instalasi,
            biaya_langganan_tahunan,
            tata_cara_pembayaran,
        },
    )
}

fn backend_contract() -> impl Strategy<Value = BackendContract> {
    let customer = (text(), text(), tax_id(), text(), text(), contact()).prop_map(
        |(nama_pelanggan, alamat, npwp, rep_nama, rep_jabatan, kontak_person)| CustomerInfo {
            nama_pelanggan,
            alamat,
            npwp,
            perwakilan: Representative {
                nama: rep_nama,
                jabatan: rep_jabatan,
            },
            kontak_person,
        },
    );
    let services = (0u32..5, 0u32..5, 0u32..5).prop_map(|(a, b, c)| MainServices {
        connectivity_telkom: a,
        non_connectivity_telkom: b,
        bundling: c,
    });
    let meta = (
        proptest::option::of("2025-0[1-9]-1[0-9]T08:00:00Z"),
        proptest::option::of(0.0f64..120.0),
    );
    (
        customer,
        services,
        proptest::collection::vec(service_item(), 0..4),
        payment_method(),
        contact(),
        (date(), date()),
        meta,
    )
        .prop_map(
            |(customer, services, items, payment, telkom, (mulai, akhir), (ts, secs))| {
                BackendContract {
                    informasi_pelanggan: customer,
                    layanan_utama: services,
                    rincian_layanan: items,
                    tata_cara_pembayaran: payment,
                    kontak_person_telkom: telkom,
                    jangka_waktu: ContractPeriod { mulai, akhir },
                    extraction_timestamp: ts,
                    processing_time_seconds: secs,
                    load_issues: Vec::new(),
                }
            },
        )
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn tax_id_normalisation_is_idempotent(raw in "[ -~]{0,30}") {
        let once = normalize_tax_id(&raw);
        prop_assert_eq!(normalize_tax_id(&once.value), once);
    }

    #[test]
    fn form_round_trip_is_lossless(doc in backend_contract()) {
        prop_assert_eq!(to_backend(&to_form(&doc)), normalize(&doc));
    }

    #[test]
    fn normalisation_is_idempotent(doc in backend_contract()) {
        let once = normalize(&doc);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn vat_identity(gross in 0u64..1_000_000_000_000) {
        let g = gross as f64;
        let b = from_gross(g);
        prop_assert_eq!(b.net + b.vat, g);
        prop_assert_eq!(b.total, g);
        prop_assert_eq!(b.net.fract(), 0.0);
    }

    #[test]
    fn removal_renumbers_from_one(
        numbers in proptest::collection::vec(0u32..20, 1..12),
        pick in any::<prop::sample::Index>(),
    ) {
        let list: Vec<TerminPaymentForm> = numbers
            .iter()
            .map(|&n| TerminPaymentForm { termin_number: n, ..Default::default() })
            .collect();
        let index = pick.index(list.len());
        let next = remove_installment(&list, index).unwrap();
        let got: Vec<u32> = next.iter().map(Installment::number).collect();
        let expected: Vec<u32> = (1..=next.len() as u32).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn aggregate_matches_item_totals(items in proptest::collection::vec(service_item(), 0..8)) {
        let totals = aggregate(&items);
        let item_sum: f64 = items.iter().map(|i| service_breakdown(i).item_total.total).sum();
        prop_assert_eq!(totals.overall_contract_value.total, item_sum);
    }
}
