use serde::{Deserialize, Serialize};

use crate::table::{Address, Hand, HandId, Position, Seat, StateTree};

/// Lookup key shared by all seat selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatQuery {
    pub table_addr: Address,
    pub hand_id: HandId,
    pub pos: Position,
}

impl SeatQuery {
    pub fn new(table_addr: Address, hand_id: HandId, pos: Position) -> Self {
        Self {
            table_addr,
            hand_id,
            pos,
        }
    }

    pub(crate) fn hand<'a>(&self, state: &'a StateTree) -> Option<&'a Hand> {
        state.hand(&self.table_addr, self.hand_id)
    }

    pub(crate) fn seat<'a>(&self, state: &'a StateTree) -> Option<&'a Seat> {
        state.seat(&self.table_addr, self.hand_id, self.pos)
    }
}
