use serde::Serialize;

use super::query::SeatQuery;
use super::LOG_TARGET;
use crate::receipt::{parse, ParsedReceipt, Receipt, ReceiptError};
use crate::table::{Address, StateTree};

/// Outcome of reading a seat's last receipt.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LastReceipt {
    /// No table, hand, seat, or receipt at the queried key.
    NoAction,
    Decoded(ParsedReceipt),
    /// A receipt is stored but could not be decoded.
    Undecodable {
        #[serde(serialize_with = "display")]
        error: ReceiptError,
    },
}

fn display<S: serde::Serializer>(error: &ReceiptError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl LastReceipt {
    pub fn parsed(&self) -> Option<&ParsedReceipt> {
        match self {
            LastReceipt::Decoded(parsed) => Some(parsed),
            _ => None,
        }
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.parsed().map(|parsed| &parsed.receipt)
    }

    pub fn signer(&self) -> Option<&Address> {
        self.parsed().map(|parsed| &parsed.signer)
    }

    pub fn is_undecodable(&self) -> bool {
        matches!(self, LastReceipt::Undecodable { .. })
    }
}

/// Last receipt recorded for the seat at `query`.
pub fn last_receipt(state: &StateTree, query: &SeatQuery) -> LastReceipt {
    let Some(signed) = query.seat(state).and_then(|seat| seat.last.as_ref()) else {
        return LastReceipt::NoAction;
    };
    match parse(signed) {
        Ok(parsed) => LastReceipt::Decoded(parsed),
        Err(error) => {
            tracing::debug!(
                target: LOG_TARGET,
                table = %query.table_addr,
                hand = query.hand_id,
                pos = query.pos,
                %error,
                "undecodable receipt"
            );
            LastReceipt::Undecodable { error }
        }
    }
}
