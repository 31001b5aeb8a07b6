use std::{fmt, fs::File, io::BufReader, path::Path, str::FromStr};

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use solana_program::pubkey::Pubkey;

use crate::error::MerkleTreeError::{self, InvalidAllocation};

pub type Result<T> = std::result::Result<T, MerkleTreeError>;

/// Amount exactly as it appeared in the input, before range checks.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Unsigned(u64),
    Signed(i64),
    /// Decimal string, or hex with a `0x` prefix
    Text(String),
    /// Anything else: floats, integers past 64 bits, booleans. Always rejected
    /// by [RawAmount::parse], but kept so the failure is an allocation error.
    Other(serde_json::Value),
}

impl RawAmount {
    /// Parses into a strictly positive token amount.
    pub fn parse(&self) -> Result<u64> {
        let amount: u128 = match self {
            RawAmount::Unsigned(amount) => u128::from(*amount),
            RawAmount::Signed(amount) => u128::try_from(*amount)
                .map_err(|_| InvalidAllocation(format!("amount {amount} is negative")))?,
            RawAmount::Text(text) => parse_amount_text(text)?,
            RawAmount::Other(value) => {
                return Err(InvalidAllocation(format!(
                    "amount {value} is not a token amount"
                )))
            }
        };

        if amount == 0 {
            return Err(InvalidAllocation("amount must be greater than zero".to_string()));
        }
        u64::try_from(amount)
            .map_err(|_| InvalidAllocation(format!("amount {amount} does not fit in a u64")))
    }
}

impl From<u64> for RawAmount {
    fn from(amount: u64) -> Self {
        RawAmount::Unsigned(amount)
    }
}

fn parse_amount_text(text: &str) -> Result<u128> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(digits) => u128::from_str_radix(digits, 16),
        None => text.parse::<u128>(),
    };
    parsed.map_err(|e| InvalidAllocation(format!("amount {text:?} is not a valid integer: {e}")))
}

/// One (account, amount) pair of the raw allocation set.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawAllocation {
    pub account: String,
    pub amount: RawAmount,
}

impl RawAllocation {
    pub fn new(account: impl Into<String>, amount: impl Into<RawAmount>) -> Self {
        Self {
            account: account.into(),
            amount: amount.into(),
        }
    }

    /// Normalizes the account to a [Pubkey] and range-checks the amount.
    pub fn parse(&self) -> Result<(Pubkey, u64)> {
        let account = Pubkey::from_str(self.account.trim()).map_err(|e| {
            InvalidAllocation(format!("account {:?} is not a valid pubkey: {e}", self.account))
        })?;
        match self.amount.parse() {
            Ok(amount) => Ok((account, amount)),
            Err(InvalidAllocation(msg)) => Err(InvalidAllocation(format!("account {account}: {msg}"))),
            Err(e) => Err(e),
        }
    }
}

/// JSON balance map, `{ "<pubkey>": <amount>, ... }`.
///
/// Entries are kept in file order and repeated keys are kept as separate entries
/// so that duplicates can be rejected instead of silently overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceMap(pub Vec<RawAllocation>);

impl BalanceMap {
    pub fn new_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn into_allocations(self) -> Vec<RawAllocation> {
        self.0
    }
}

impl<'de> Deserialize<'de> for BalanceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BalanceMapVisitor;

        impl<'de> Visitor<'de> for BalanceMapVisitor {
            type Value = BalanceMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of account to amount")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((account, amount)) = map.next_entry::<String, RawAmount>()? {
                    entries.push(RawAllocation { account, amount });
                }
                Ok(BalanceMap(entries))
            }
        }

        deserializer.deserialize_map(BalanceMapVisitor)
    }
}
