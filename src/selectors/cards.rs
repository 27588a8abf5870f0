use super::query::SeatQuery;
use crate::table::{Address, CardPair, HandId, Position, StateTree, HIDDEN_CARDS};

/// Lineup position held by `viewer` in the given hand.
pub fn viewer_position(
    state: &StateTree,
    table_addr: &Address,
    hand_id: HandId,
    viewer: Option<&Address>,
) -> Option<Position> {
    let viewer = viewer?;
    state.hand(table_addr, hand_id)?.position_of(viewer)
}

/// Hole cards of the seat at `query` as `viewer` is allowed to see them.
///
/// The viewer's own seat shows the hand's private `hole_cards`. Any other
/// seat shows its revealed `cards`, or `HIDDEN_CARDS` before a reveal.
pub fn visible_cards(state: &StateTree, query: &SeatQuery, viewer: Option<&Address>) -> CardPair {
    let Some(hand) = query.hand(state) else {
        return HIDDEN_CARDS;
    };
    let Some(seat) = hand.seat(query.pos) else {
        return HIDDEN_CARDS;
    };
    // private cards only flow to the seat whose address is the viewer
    if viewer.is_some_and(|viewer| &seat.address == viewer) {
        return hand.hole_cards.unwrap_or(HIDDEN_CARDS);
    }
    seat.cards.unwrap_or(HIDDEN_CARDS)
}
