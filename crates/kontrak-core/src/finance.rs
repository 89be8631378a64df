//! Net/VAT/gross derivation for service costs.
//!
//! Extracted costs are gross figures with 11% PPN already included, so net
//! and VAT are reverse-derived: net is rounded first and VAT takes whatever
//! is left, which keeps `net + vat == gross` exact for whole-rupiah inputs.

use serde::Serialize;

use crate::contract::{ContractDocument, PaymentMethodType, ServiceLineItem};
use crate::period::contract_months;
use crate::termin::{ScheduleSummary, schedule_summary};

/// PPN rate applied to Telkom services.
pub const VAT_RATE: f64 = 0.11;
/// Gross-to-net divisor, `1 + VAT_RATE`.
pub const VAT_DIVISOR: f64 = 1.11;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub net: f64,
    pub vat: f64,
    pub total: f64,
}

impl CostBreakdown {
    fn combine(self, other: Self) -> Self {
        let net = self.net + other.net;
        let vat = self.vat + other.vat;
        Self {
            net,
            vat,
            total: net + vat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBreakdown {
    pub installation: CostBreakdown,
    pub yearly: CostBreakdown,
    pub monthly: CostBreakdown,
    pub item_total: CostBreakdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotals {
    pub installation: CostBreakdown,
    pub monthly: CostBreakdown,
    pub yearly: CostBreakdown,
    /// Installation plus yearly subscription.
    pub overall_contract_value: CostBreakdown,
}

/// Round half toward positive infinity.
fn round_half_up(x: f64) -> f64 {
    let r = x.round();
    if x - r == 0.5 { r + 1.0 } else { r }
}

/// Split a gross amount into net and VAT.
pub fn from_gross(gross: f64) -> CostBreakdown {
    let net = round_half_up(gross / VAT_DIVISOR);
    CostBreakdown {
        net,
        vat: gross - net,
        total: gross,
    }
}

/// Monthly figures from a yearly gross amount.
///
/// The yearly gross is divided by 12 and rounded *before* VAT is
/// reverse-derived, so twelve monthly breakdowns need not add up to the
/// yearly one. Callers comparing the two must allow for that drift.
pub fn monthly_from_yearly(yearly_gross: f64) -> CostBreakdown {
    from_gross(round_half_up(yearly_gross / 12.0))
}

pub fn service_breakdown(item: &ServiceLineItem) -> ServiceBreakdown {
    ServiceBreakdown {
        installation: from_gross(item.biaya_instalasi),
        yearly: from_gross(item.biaya_langganan_tahunan),
        monthly: monthly_from_yearly(item.biaya_langganan_tahunan),
        item_total: from_gross(item.biaya_instalasi + item.biaya_langganan_tahunan),
    }
}

/// Sum nets and VATs per bucket across items; each bucket total is
/// `net + vat`.
pub fn aggregate(items: &[ServiceLineItem]) -> AggregateTotals {
    aggregate_breakdowns(&items.iter().map(service_breakdown).collect::<Vec<_>>())
}

pub fn aggregate_breakdowns(breakdowns: &[ServiceBreakdown]) -> AggregateTotals {
    let mut totals = AggregateTotals::default();
    for b in breakdowns {
        totals.installation = totals.installation.combine(b.installation);
        totals.monthly = totals.monthly.combine(b.monthly);
        totals.yearly = totals.yearly.combine(b.yearly);
    }
    totals.overall_contract_value = totals.installation.combine(totals.yearly);
    totals
}

/// Everything a review screen shows for a normalised contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub items: Vec<ServiceBreakdown>,
    pub totals: AggregateTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_months: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termin_schedule: Option<ScheduleSummary>,
}

pub fn summarize(doc: &ContractDocument) -> ContractSummary {
    let items: Vec<ServiceBreakdown> =
        doc.rincian_layanan.iter().map(service_breakdown).collect();
    let totals = aggregate_breakdowns(&items);
    let payment = &doc.tata_cara_pembayaran;
    let termin_schedule = (payment.method_type == PaymentMethodType::Termin)
        .then(|| schedule_summary(&payment.termin_payments));
    ContractSummary {
        items,
        totals,
        contract_months: contract_months(&doc.jangka_waktu),
        termin_schedule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContractPeriod, TerminPayment};

    fn item(install: f64, yearly: f64) -> ServiceLineItem {
        ServiceLineItem {
            biaya_instalasi: install,
            biaya_langganan_tahunan: yearly,
            tata_cara_pembayaran: None,
        }
    }

    #[test]
    fn exact_gross_splits_cleanly() {
        assert_eq!(
            from_gross(1_110_000.0),
            CostBreakdown {
                net: 1_000_000.0,
                vat: 110_000.0,
                total: 1_110_000.0
            }
        );
    }

    #[test]
    fn vat_absorbs_rounding_remainder() {
        // 1000 / 1.11 = 900.9009…, net rounds up to 901.
        let b = from_gross(1000.0);
        assert_eq!(b.net, 901.0);
        assert_eq!(b.vat, 99.0);
        assert_eq!(b.net + b.vat, 1000.0);
    }

    #[test]
    fn zero_gross() {
        assert_eq!(from_gross(0.0), CostBreakdown::default());
    }

    #[test]
    fn half_rounds_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.4), 2.0);
    }

    #[test]
    fn monthly_rounds_before_deriving_vat() {
        // 13_320_000 / 12 = 1_110_000 exactly.
        let m = monthly_from_yearly(13_320_000.0);
        assert_eq!(m.net, 1_000_000.0);
        assert_eq!(m.vat, 110_000.0);

        // 1_000_000 / 12 = 83_333.33 → 83_333 gross per month.
        let m = monthly_from_yearly(1_000_000.0);
        assert_eq!(m.total, 83_333.0);
        assert_eq!(m.net, 75_075.0);
        assert_eq!(m.vat, 8_258.0);
    }

    #[test]
    fn monthly_times_twelve_can_drift_from_yearly() {
        let yearly = from_gross(1_000_000.0);
        let monthly = monthly_from_yearly(1_000_000.0);
        assert_ne!(monthly.total * 12.0, yearly.total);
    }

    #[test]
    fn item_breakdown_buckets() {
        let b = service_breakdown(&item(1_110_000.0, 13_320_000.0));
        assert_eq!(b.installation.net, 1_000_000.0);
        assert_eq!(b.yearly.net, 12_000_000.0);
        assert_eq!(b.monthly.total, 1_110_000.0);
        assert_eq!(b.item_total.total, 14_430_000.0);
        assert_eq!(b.item_total.net, 13_000_000.0);
    }

    #[test]
    fn aggregate_sums_components() {
        let items = vec![item(1_110_000.0, 13_320_000.0), item(1000.0, 2000.0)];
        let totals = aggregate(&items);
        assert_eq!(totals.installation.net, 1_000_000.0 + 901.0);
        assert_eq!(totals.installation.vat, 110_000.0 + 99.0);
        assert_eq!(totals.installation.total, 1_111_000.0);
        assert_eq!(totals.yearly.total, 13_322_000.0);

        let item_sum: f64 = items
            .iter()
            .map(|i| service_breakdown(i).item_total.total)
            .sum();
        assert_eq!(totals.overall_contract_value.total, item_sum);
        assert_eq!(
            totals.overall_contract_value.net,
            totals.installation.net + totals.yearly.net
        );
    }

    #[test]
    fn aggregate_of_nothing_is_zero() {
        assert_eq!(aggregate(&[]), AggregateTotals::default());
    }

    #[test]
    fn summary_reports_schedule_only_for_termin() {
        let mut doc = ContractDocument {
            rincian_layanan: vec![item(1_110_000.0, 13_320_000.0)],
            jangka_waktu: ContractPeriod {
                mulai: Some("2025-01-01".into()),
                akhir: Some("2025-12-31".into()),
            },
            ..Default::default()
        };
        let s = summarize(&doc);
        assert_eq!(s.items.len(), 1);
        assert_eq!(s.contract_months, Some(12));
        assert_eq!(s.termin_schedule, None);

        doc.tata_cara_pembayaran.method_type = PaymentMethodType::Termin;
        doc.tata_cara_pembayaran.termin_payments = vec![TerminPayment {
            termin_number: 1,
            period: Some("Januari 2025".into()),
            amount: 14_430_000.0,
            raw_text: None,
        }];
        let s = summarize(&doc);
        assert_eq!(
            s.termin_schedule,
            Some(ScheduleSummary {
                count: 1,
                total: 14_430_000.0
            })
        );
    }
}
