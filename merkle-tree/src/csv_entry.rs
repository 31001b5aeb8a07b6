use std::{fs::File, path::Path, result};

use serde::{Deserialize, Serialize};

use crate::{allocation::RawAllocation, allocation::RawAmount, error::MerkleTreeError};

pub type Result<T> = result::Result<T, MerkleTreeError>;

/// Represents a single entry in a CSV, with a `pubkey,amount` header
#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct CsvEntry {
    /// Pubkey of the claimant
    pub pubkey: String,
    /// Raw token amount; decimal or `0x` hex
    pub amount: String,
}

impl CsvEntry {
    pub fn new_from_file(path: &Path) -> Result<Vec<Self>> {
        let file = File::open(path)?;
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

        let mut entries = Vec::new();
        for result in rdr.deserialize() {
            let record: CsvEntry = result?;
            entries.push(record);
        }

        Ok(entries)
    }
}

impl From<CsvEntry> for RawAllocation {
    fn from(entry: CsvEntry) -> Self {
        RawAllocation {
            account: entry.pubkey,
            amount: RawAmount::Text(entry.amount),
        }
    }
}
