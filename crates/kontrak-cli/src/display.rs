//! Terminal rendering for validation results and contract summaries.

use chrono::NaiveDate;
use kontrak_core::currency::format_rupiah;
use kontrak_core::finance::{ContractSummary, CostBreakdown};
use kontrak_core::period::elapsed_months_to_today;
use kontrak_core::{ContractDocument, ValidationResult};

// ── Validation ──

pub fn print_validation(result: &ValidationResult) {
    match result {
        Ok(v) => {
            println!("OK");
            if !v.advisories.is_empty() {
                println!();
                println!("Advisories ({}):", v.advisories.len());
                for issue in &v.advisories {
                    println!("  {:<48} {}", issue.field_path, issue.message);
                }
            }
        }
        Err(errors) => {
            println!("FAILED ({} issues)", errors.issues().len());
            for issue in errors.issues() {
                println!("  {:<48} {}", issue.field_path, issue.message);
            }
        }
    }
}

// ── Summary ──

pub fn print_summary(doc: &ContractDocument, summary: &ContractSummary) {
    let name = doc
        .informasi_pelanggan
        .nama_pelanggan
        .as_deref()
        .unwrap_or("(unnamed customer)");
    println!("=== {name} ===");
    println!();

    for (i, item) in summary.items.iter().enumerate() {
        println!("Service {}", i + 1);
        print_breakdown("installation", &item.installation);
        print_breakdown("yearly", &item.yearly);
        print_breakdown("monthly", &item.monthly);
        print_breakdown("item total", &item.item_total);
        println!();
    }

    println!("Totals");
    print_breakdown("installation", &summary.totals.installation);
    print_breakdown("monthly", &summary.totals.monthly);
    print_breakdown("yearly", &summary.totals.yearly);
    print_breakdown("contract value", &summary.totals.overall_contract_value);
    println!();

    if let Some(months) = summary.contract_months {
        println!("Period");
        println!("  {:<16} {} months", "duration", months);
        if let Some(start) = doc
            .jangka_waktu
            .mulai
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        {
            println!("  {:<16} {} months", "elapsed", elapsed_months_to_today(start));
        }
        println!();
    }

    if let Some(schedule) = &summary.termin_schedule {
        println!("Termin");
        for t in &doc.tata_cara_pembayaran.termin_payments {
            println!(
                "  {:>3}. {:<20} {:>20}",
                t.termin_number,
                t.period.as_deref().unwrap_or("-"),
                format_rupiah(t.amount)
            );
        }
        println!(
            "  {} installments, {}",
            schedule.count,
            format_rupiah(schedule.total)
        );
    }
}

fn print_breakdown(label: &str, b: &CostBreakdown) {
    println!(
        "  {:<16} net {:>18}  vat {:>16}  total {:>18}",
        label,
        format_rupiah(b.net),
        format_rupiah(b.vat),
        format_rupiah(b.total)
    );
}
