use super::action::last_receipt;
use super::query::SeatQuery;
use crate::table::{Chips, StateTree};

/// Portion of a stated wager that belongs to the current round.
///
/// Values above the round cap are reduced by the cap; values at or below it
/// are taken as-is.
pub fn round_amount(bet_value: Chips, last_round_max_bet: Chips) -> Chips {
    if bet_value > last_round_max_bet {
        bet_value - last_round_max_bet
    } else {
        bet_value
    }
}

/// Amount the seat at `query` contributes in the current betting round.
///
/// Zero unless the seat's last receipt decodes to a bet or raise.
pub fn last_amount(state: &StateTree, query: &SeatQuery) -> Chips {
    let last = last_receipt(state, query);
    let Some(receipt) = last.receipt().filter(|receipt| receipt.is_wager()) else {
        return 0;
    };
    let cap = query
        .hand(state)
        .map(|hand| hand.last_round_max_bet)
        .unwrap_or_default();
    round_amount(receipt.amount(), cap)
}
