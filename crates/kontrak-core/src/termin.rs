//! Installment ("termin") schedule editing and checks.
//!
//! Every mutation returns a new list. Removal renumbers the survivors
//! `1..=n` in their current list order; field updates never renumber.

use serde::Serialize;

use crate::contract::TerminPayment;
use crate::error::ContractError;
use crate::form::TerminPaymentForm;
use crate::validation::FieldIssue;

/// A single field edit on one installment.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminField {
    Number(u32),
    Period(String),
    Amount(f64),
    RawText(String),
}

/// Common view over backend and form installments.
pub trait Installment: Clone + Default {
    fn number(&self) -> u32;
    fn set_number(&mut self, number: u32);
    /// Period label, empty when absent.
    fn period(&self) -> &str;
    fn amount(&self) -> f64;
    fn apply(&mut self, field: TerminField);
}

impl Installment for TerminPayment {
    fn number(&self) -> u32 {
        self.termin_number
    }

    fn set_number(&mut self, number: u32) {
        self.termin_number = number;
    }

    fn period(&self) -> &str {
        self.period.as_deref().unwrap_or_default()
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn apply(&mut self, field: TerminField) {
        match field {
            TerminField::Number(n) => self.termin_number = n,
            TerminField::Period(p) => self.period = Some(p).filter(|p| !p.is_empty()),
            TerminField::Amount(a) => self.amount = a,
            TerminField::RawText(t) => self.raw_text = Some(t).filter(|t| !t.is_empty()),
        }
    }
}

impl Installment for TerminPaymentForm {
    fn number(&self) -> u32 {
        self.termin_number
    }

    fn set_number(&mut self, number: u32) {
        self.termin_number = number;
    }

    fn period(&self) -> &str {
        &self.period
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn apply(&mut self, field: TerminField) {
        match field {
            TerminField::Number(n) => self.termin_number = n,
            TerminField::Period(p) => self.period = p,
            TerminField::Amount(a) => self.amount = a,
            TerminField::RawText(t) => self.raw_text = t,
        }
    }
}

/// Count and sum of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub count: usize,
    pub total: f64,
}

/// Append an empty installment numbered `len + 1`.
pub fn add_installment<T: Installment>(list: &[T]) -> Vec<T> {
    let mut next = list.to_vec();
    let mut item = T::default();
    item.set_number(list.len() as u32 + 1);
    next.push(item);
    next
}

/// Remove the entry at `index` and renumber the rest in list order.
pub fn remove_installment<T: Installment>(
    list: &[T],
    index: usize,
) -> Result<Vec<T>, ContractError> {
    if index >= list.len() {
        return Err(ContractError::IndexOutOfRange {
            index,
            len: list.len(),
        });
    }
    let mut next = list.to_vec();
    next.remove(index);
    renumber(&mut next);
    Ok(next)
}

/// Replace one field of the entry at `index`.
pub fn update_field<T: Installment>(
    list: &[T],
    index: usize,
    field: TerminField,
) -> Result<Vec<T>, ContractError> {
    let mut next = list.to_vec();
    let len = next.len();
    let item = next
        .get_mut(index)
        .ok_or(ContractError::IndexOutOfRange { index, len })?;
    item.apply(field);
    Ok(next)
}

/// Number entries `1..=n` in their current order.
pub fn renumber<T: Installment>(list: &mut [T]) {
    for (i, item) in list.iter_mut().enumerate() {
        item.set_number(i as u32 + 1);
    }
}

/// True when the numbers, once sorted, are exactly `1..=n`.
pub fn is_sequential<T: Installment>(list: &[T]) -> bool {
    let mut numbers: Vec<u32> = list.iter().map(Installment::number).collect();
    numbers.sort_unstable();
    numbers
        .iter()
        .enumerate()
        .all(|(i, &n)| n as usize == i + 1)
}

/// Schedule problems under `path`: numbering gaps or duplicates, blank
/// periods, and non-positive amounts.
pub fn check_schedule<T: Installment>(list: &[T], path: &str) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if !is_sequential(list) {
        let found: Vec<String> = list.iter().map(|t| t.number().to_string()).collect();
        issues.push(FieldIssue::new(
            path,
            format!(
                "Termin numbers must run from 1 without gaps or duplicates (found {})",
                found.join(", ")
            ),
        ));
    }

    for (i, item) in list.iter().enumerate() {
        if item.period().trim().is_empty() {
            issues.push(FieldIssue::new(
                &format!("{path}[{i}].period"),
                "Termin period is required",
            ));
        }
        if item.amount() <= 0.0 {
            issues.push(FieldIssue::new(
                &format!("{path}[{i}].amount"),
                "Termin amount must be greater than 0",
            ));
        }
    }

    issues
}

pub fn schedule_summary<T: Installment>(list: &[T]) -> ScheduleSummary {
    ScheduleSummary {
        count: list.len(),
        total: list.iter().map(Installment::amount).sum(),
    }
}
