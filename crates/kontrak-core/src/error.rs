use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    /// The payload is not shaped like a contract at all (wrong JSON types).
    #[error("malformed contract payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("installment index {index} out of range for schedule of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}
