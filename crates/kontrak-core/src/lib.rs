//! Validation, backend/form transformation, and financial derivation for
//! OCR-extracted Telkom service contracts.

pub mod contract;
pub mod currency;
mod error;
pub mod finance;
pub mod form;
mod lenient;
pub mod normalize;
pub mod period;
pub mod termin;
pub mod transform;
pub mod validation;

pub use contract::{BackendContract, ContractDocument, PaymentMethodType};
pub use error::ContractError;
pub use finance::{AggregateTotals, CostBreakdown, ServiceBreakdown, from_gross, summarize};
pub use form::FormContract;
pub use normalize::{normalize_phone, normalize_tax_id};
pub use transform::{to_backend, to_form};
pub use validation::{
    FieldIssue, Strictness, Validated, ValidationErrors, ValidationReport, ValidationResult,
    normalize, validate,
};
