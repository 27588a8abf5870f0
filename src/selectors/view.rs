use serde::Serialize;

use super::action::{last_receipt, LastReceipt};
use super::amount::last_amount;
use super::cards::{viewer_position, visible_cards};
use super::fold::is_folded;
use super::query::SeatQuery;
use crate::table::{Address, CardPair, Chips, HandId, HandPhase, Position, StateTree};

/// Everything the table UI renders for one seat.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub pos: Position,
    pub address: Address,
    pub is_viewer: bool,
    pub last: LastReceipt,
    pub amount: Chips,
    pub folded: bool,
    pub cards: CardPair,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub table_addr: Address,
    pub hand_id: HandId,
    pub state: HandPhase,
    pub last_round_max_bet: Chips,
    pub viewer_pos: Option<Position>,
    pub seats: Vec<SeatView>,
}

pub fn seat_view(
    state: &StateTree,
    query: &SeatQuery,
    viewer: Option<&Address>,
) -> Option<SeatView> {
    let seat = query.seat(state)?;
    Some(SeatView {
        pos: query.pos,
        address: seat.address,
        is_viewer: viewer == Some(&seat.address),
        last: last_receipt(state, query),
        amount: last_amount(state, query),
        folded: is_folded(state, query),
        cards: visible_cards(state, query, viewer),
    })
}

/// Views for every seat in the lineup of one hand.
pub fn table_view(
    state: &StateTree,
    table_addr: &Address,
    hand_id: HandId,
    viewer: Option<&Address>,
) -> Option<TableView> {
    let hand = state.hand(table_addr, hand_id)?;
    let seats = (0..hand.lineup.len())
        .filter_map(|pos| seat_view(state, &SeatQuery::new(*table_addr, hand_id, pos), viewer))
        .collect();
    Some(TableView {
        table_addr: *table_addr,
        hand_id,
        state: hand.state,
        last_round_max_bet: hand.last_round_max_bet,
        viewer_pos: viewer_position(state, table_addr, hand_id, viewer),
        seats,
    })
}
