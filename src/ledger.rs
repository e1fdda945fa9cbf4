use std::io;

use crate::{
    config::Config,
    error::Result,
    models::{atto_to_fil, Direction, Transfer},
};

/// Ledger Live operation history columns. The two countervalue amount
/// columns are left out so cost basis can be imported from another source.
pub const HEADERS: [&str; 10] = [
    "Operation Date",
    "Status",
    "Currency Ticker",
    "Operation Type",
    "Operation Amount",
    "Operation Fees",
    "Operation Hash",
    "Account Name",
    "Account xpub",
    "Countervalue Ticker",
];

const STATUS: &str = "Confirmed";
const CURRENCY_TICKER: &str = "FIL";
const OPERATION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub struct LedgerExporter {
    account_name: String,
    countervalue_ticker: String,
}

impl LedgerExporter {
    pub fn new(config: &Config) -> Self {
        Self {
            account_name: config.account_name.clone(),
            countervalue_ticker: config.countervalue_ticker.clone(),
        }
    }

    /// Writes the header and one row per transfer, in the given order.
    /// Rows already written stay written if a later write fails.
    pub fn write<W: io::Write>(&self, writer: W, transfers: &[Transfer]) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(HEADERS)?;

        for transfer in transfers {
            out.write_record(self.row(transfer))?;
        }

        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    fn row(&self, transfer: &Transfer) -> [String; 10] {
        let direction = transfer.direction();
        let fees = transfer.total_fee();
        // Ledger folds the fees into the amount of outgoing operations.
        let amount = match direction {
            Direction::In => transfer.amount.magnitude().clone(),
            Direction::Out => transfer.amount.magnitude() + &fees,
        };

        [
            transfer.timestamp.format(OPERATION_DATE_FORMAT).to_string(),
            STATUS.to_string(),
            CURRENCY_TICKER.to_string(),
            direction.as_str().to_string(),
            atto_to_fil(&amount),
            atto_to_fil(&fees),
            transfer.message_id.clone(),
            self.account_name.clone(),
            transfer.account_address().to_string(),
            self.countervalue_ticker.clone(),
        ]
    }
}
