use super::action::last_receipt;
use super::query::SeatQuery;
use crate::table::StateTree;

/// True iff the seat's last receipt decodes to a fold.
pub fn is_folded(state: &StateTree, query: &SeatQuery) -> bool {
    last_receipt(state, query)
        .receipt()
        .is_some_and(|receipt| receipt.is_fold())
}
