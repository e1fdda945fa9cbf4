use std::fmt;

use chrono::{DateTime, Utc};
use num_bigint::{BigInt, BigUint, Sign};
use serde::Deserialize;

/// Number of decimal places between attoFIL and FIL.
pub const FIL_DECIMALS: usize = 18;

/// One page of `/address/{wallet}/transfers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransfersPage {
    pub total_count: usize,
    pub transfers: Vec<RawRecord>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// A single transfer row as returned by the API. `value` is a signed
/// attoFIL integer encoded as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub height: i64,
    pub timestamp: i64,
    #[serde(rename = "message")]
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Send,
    Receive,
    MinerFee,
    BurnFee,
}

impl RecordKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "send" => Some(Self::Send),
            "receive" => Some(Self::Receive),
            "miner-fee" => Some(Self::MinerFee),
            "burn-fee" => Some(Self::BurnFee),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
        }
    }
}

/// A message's principal movement merged with its fee records.
/// All amounts are in attoFIL.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub height: i64,
    pub timestamp: DateTime<Utc>,
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub amount: BigInt,
    pub miner_fee: Option<BigInt>,
    pub burn_fee: Option<BigInt>,
}

impl Transfer {
    pub fn direction(&self) -> Direction {
        if self.amount.sign() == Sign::Plus {
            Direction::In
        } else {
            Direction::Out
        }
    }

    /// Sum of the absolute miner and burn fees.
    pub fn total_fee(&self) -> BigUint {
        [&self.miner_fee, &self.burn_fee]
            .into_iter()
            .flatten()
            .map(BigInt::magnitude)
            .sum()
    }

    /// The wallet-side address: receiver for incoming, sender for outgoing.
    pub fn account_address(&self) -> &str {
        match self.direction() {
            Direction::In => &self.to,
            Direction::Out => &self.from,
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fee = |fee: &Option<BigInt>| {
            fee.as_ref()
                .map(signed_atto_to_fil)
                .unwrap_or_else(|| "-".to_string())
        };
        write!(
            f,
            "[{}] #{} {}: {:.6}… -> {:.6}…, amount: {:>12} FIL | miner fee: {} | burn fee: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.height,
            self.message_id,
            self.from,
            self.to,
            signed_atto_to_fil(&self.amount),
            fee(&self.miner_fee),
            fee(&self.burn_fee),
        )
    }
}

/// Parses a base-10 attoFIL integer of any width with an optional sign.
pub fn parse_atto(value: &str) -> Option<BigInt> {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Renders attoFIL as FIL without rounding, dropping trailing zeros.
pub fn atto_to_fil(atto: &BigUint) -> String {
    let digits = format!("{:0>width$}", atto.to_string(), width = FIL_DECIMALS + 1);
    let (whole, fraction) = digits.split_at(digits.len() - FIL_DECIMALS);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

fn signed_atto_to_fil(atto: &BigInt) -> String {
    let fil = atto_to_fil(atto.magnitude());
    match atto.sign() {
        Sign::Minus => format!("-{}", fil),
        _ => fil,
    }
}
