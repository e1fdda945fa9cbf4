use std::collections::HashMap;

use chrono::{DateTime, Utc};
use num_bigint::BigInt;

use crate::{
    error::{Error, Result},
    models::{parse_atto, RawRecord, RecordKind, Transfer},
};

/// A transfer whose principal amount may not have arrived yet.
struct PendingTransfer {
    height: i64,
    timestamp: DateTime<Utc>,
    message_id: String,
    from: String,
    to: String,
    amount: Option<BigInt>,
    miner_fee: Option<BigInt>,
    burn_fee: Option<BigInt>,
}

impl PendingTransfer {
    fn seed(record: &RawRecord) -> Result<Self> {
        let timestamp = DateTime::from_timestamp(record.timestamp, 0).ok_or_else(|| {
            Error::InvalidTimestamp {
                message_id: record.message_id.clone(),
                timestamp: record.timestamp,
            }
        })?;

        Ok(Self {
            height: record.height,
            timestamp,
            message_id: record.message_id.clone(),
            from: record.from.clone(),
            to: record.to.clone(),
            amount: None,
            miner_fee: None,
            burn_fee: None,
        })
    }

    fn finish(self) -> Result<Transfer> {
        let amount = self
            .amount
            .ok_or_else(|| Error::IncompleteTransfer(self.message_id.clone()))?;

        Ok(Transfer {
            height: self.height,
            timestamp: self.timestamp,
            message_id: self.message_id,
            from: self.from,
            to: self.to,
            amount,
            miner_fee: self.miner_fee,
            burn_fee: self.burn_fee,
        })
    }
}

/// Merges raw records into one transfer per message, most recent first.
///
/// Height, timestamp and addresses come from the first record seen for a
/// message. A repeated record of the same kind replaces the earlier value.
/// Transfers sharing a timestamp keep the order their messages first
/// appeared in.
pub fn reconcile(records: &[RawRecord]) -> Result<Vec<Transfer>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut pending: Vec<PendingTransfer> = Vec::new();

    for record in records {
        let slot = match index.get(record.message_id.as_str()) {
            Some(&slot) => slot,
            None => {
                pending.push(PendingTransfer::seed(record)?);
                index.insert(&record.message_id, pending.len() - 1);
                pending.len() - 1
            }
        };
        let transfer = &mut pending[slot];

        let value = parse_atto(&record.value).ok_or_else(|| Error::Parse {
            message_id: record.message_id.clone(),
            value: record.value.clone(),
        })?;

        match RecordKind::from_tag(&record.kind) {
            Some(RecordKind::Send | RecordKind::Receive) => transfer.amount = Some(value),
            Some(RecordKind::MinerFee) => transfer.miner_fee = Some(value),
            Some(RecordKind::BurnFee) => transfer.burn_fee = Some(value),
            None => {
                return Err(Error::UnknownType {
                    message_id: record.message_id.clone(),
                    kind: record.kind.clone(),
                })
            }
        }
    }

    let mut transfers = pending
        .into_iter()
        .map(PendingTransfer::finish)
        .collect::<Result<Vec<_>>>()?;
    transfers.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(transfers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(id: &str, timestamp: i64, kind: &str, value: &str) -> RawRecord {
        RawRecord {
            height: 4_000_000 + timestamp,
            timestamp,
            message_id: id.to_string(),
            from: "f1sender".to_string(),
            to: "f1receiver".to_string(),
            value: value.to_string(),
            kind: kind.to_string(),
        }
    }

    fn big(s: &str) -> BigInt {
        BigInt::from_str(s).unwrap()
    }

    #[test]
    fn merges_amount_and_fee_records() {
        let records = vec![
            record("m1", 100, "receive", "500000000000000000"),
            record("m1", 100, "miner-fee", "10000000000000000"),
        ];

        let transfers = reconcile(&records).unwrap();

        assert_eq!(transfers.len(), 1);
        let transfer = &transfers[0];
        assert_eq!(transfer.message_id, "m1");
        assert_eq!(transfer.amount, big("500000000000000000"));
        assert_eq!(transfer.miner_fee, Some(big("10000000000000000")));
        assert_eq!(transfer.burn_fee, None);
        assert_eq!(transfer.height, 4_000_100);
        assert_eq!(transfer.timestamp.timestamp(), 100);
    }

    #[test]
    fn fee_records_may_precede_the_amount() {
        let records = vec![
            record("m1", 100, "burn-fee", "-7"),
            record("m1", 100, "miner-fee", "-3"),
            record("m1", 100, "send", "-1000"),
        ];

        let transfers = reconcile(&records).unwrap();

        assert_eq!(transfers[0].amount, big("-1000"));
        assert_eq!(transfers[0].miner_fee, Some(big("-3")));
        assert_eq!(transfers[0].burn_fee, Some(big("-7")));
    }

    #[test]
    fn sorts_most_recent_first() {
        let records = vec![
            record("a", 100, "send", "-1"),
            record("b", 50, "receive", "2"),
            record("c", 200, "receive", "3"),
        ];

        let transfers = reconcile(&records).unwrap();

        let stamps: Vec<i64> = transfers.iter().map(|t| t.timestamp.timestamp()).collect();
        assert_eq!(stamps, [200, 100, 50]);
    }

    #[test]
    fn equal_timestamps_keep_first_seen_order() {
        let records = vec![
            record("x", 10, "receive", "1"),
            record("y", 10, "receive", "2"),
            record("z", 10, "receive", "3"),
            record("x", 10, "miner-fee", "1"),
        ];

        let transfers = reconcile(&records).unwrap();

        let ids: Vec<&str> = transfers.iter().map(|t| t.message_id.as_str()).collect();
        assert_eq!(ids, ["x", "y", "z"]);
    }

    #[test]
    fn duplicate_amount_records_are_last_wins() {
        let records = vec![
            record("m1", 100, "send", "-5"),
            record("m1", 100, "receive", "8"),
        ];

        let transfers = reconcile(&records).unwrap();
        assert_eq!(transfers[0].amount, big("8"));
    }

    #[test]
    fn duplicate_fee_records_are_last_wins() {
        let records = vec![
            record("m1", 100, "miner-fee", "1"),
            record("m1", 100, "send", "-5"),
            record("m1", 100, "miner-fee", "2"),
        ];

        let transfers = reconcile(&records).unwrap();
        assert_eq!(transfers[0].miner_fee, Some(big("2")));
    }

    #[test]
    fn first_record_sets_message_metadata() {
        let mut later = record("m1", 999, "miner-fee", "1");
        later.from = "f1other".to_string();
        later.height = 1;
        let records = vec![record("m1", 100, "send", "-5"), later];

        let transfers = reconcile(&records).unwrap();

        assert_eq!(transfers[0].from, "f1sender");
        assert_eq!(transfers[0].height, 4_000_100);
        assert_eq!(transfers[0].timestamp.timestamp(), 100);
    }

    #[test]
    fn values_beyond_96_bits_are_kept_exactly() {
        let records = vec![
            record("m1", 100, "receive", "100000000000000000000000000000"),
            record("m1", 100, "burn-fee", "-79228162514264337593543950336"),
        ];

        let transfers = reconcile(&records).unwrap();

        assert_eq!(transfers[0].amount, big("100000000000000000000000000000"));
        assert_eq!(transfers[0].burn_fee, Some(big("-79228162514264337593543950336")));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let records = vec![record("m1", 100, "slash-fee", "1")];

        match reconcile(&records).unwrap_err() {
            Error::UnknownType { message_id, kind } => {
                assert_eq!(message_id, "m1");
                assert_eq!(kind, "slash-fee");
            }
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let records = vec![record("m1", 100, "send", "abc")];

        match reconcile(&records).unwrap_err() {
            Error::Parse { message_id, value } => {
                assert_eq!(message_id, "m1");
                assert_eq!(value, "abc");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn fractional_value_is_rejected() {
        let records = vec![record("m1", 100, "send", "1.5")];
        assert!(matches!(reconcile(&records), Err(Error::Parse { .. })));
    }

    #[test]
    fn fee_only_message_is_incomplete() {
        let records = vec![
            record("ok", 100, "send", "-1"),
            record("orphan", 90, "miner-fee", "1"),
            record("orphan", 90, "burn-fee", "1"),
        ];

        match reconcile(&records).unwrap_err() {
            Error::IncompleteTransfer(message_id) => assert_eq!(message_id, "orphan"),
            other => panic!("expected IncompleteTransfer, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let mut far_future = record("m1", 100, "send", "1");
        far_future.timestamp = i64::MAX;
        assert!(matches!(
            reconcile(&[far_future]),
            Err(Error::InvalidTimestamp { timestamp: i64::MAX, .. })
        ));
    }

    #[test]
    fn empty_input_yields_no_transfers() {
        assert!(reconcile(&[]).unwrap().is_empty());
    }
}
