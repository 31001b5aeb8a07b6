use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleTreeError {
    #[error("Duplicate account in allocation set: {0}")]
    DuplicateAccount(String),
    #[error("Invalid allocation: {0}")]
    InvalidAllocation(String),
    #[error("Allocation set is empty")]
    EmptyInput,
    #[error("Merkle Tree Validation Error: {0}")]
    MerkleValidationError(String),
    #[error("Merkle Root Error")]
    MerkleRootError,
    #[error("io Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serde Error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Csv Error: {0}")]
    CsvError(#[from] csv::Error),
}
