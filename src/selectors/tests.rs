#![cfg(test)]

use proptest::prelude::*;

use super::*;
use crate::receipt::{parse, Receipt, SignedReceipt, BET, CHECK, FOLD, RAISE};
use crate::table::{Address, HandPhase, Seat, HIDDEN_CARDS};
use crate::test_utils::{TwoPlayers, TBL_ADDR};

fn at(pos: usize) -> SeatQuery {
    SeatQuery::new(TBL_ADDR, 0, pos)
}

#[test]
fn last_receipt_selects_parsed_fold() {
    let players = TwoPlayers::new();
    let signed = players.p2.sign(&FOLD, &[1, 500]).unwrap();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(1, Seat::new(players.p2.address()).with_last(signed.clone())),
    );

    let last = last_receipt(&state, &at(1));
    assert_eq!(last, LastReceipt::Decoded(parse(&signed).unwrap()));
    assert_eq!(last.signer(), Some(&players.p2.address()));
    assert_eq!(
        last.receipt(),
        Some(&Receipt::Fold {
            round: 1,
            amount: 500
        })
    );
    assert_eq!(last_receipt(&state, &at(0)), LastReceipt::NoAction);
}

#[test]
fn last_receipt_is_no_action_for_missing_paths() {
    let players = TwoPlayers::new();
    let state = players.state_with(players.flop_hand());

    assert_eq!(last_receipt(&state, &at(7)), LastReceipt::NoAction);
    assert_eq!(
        last_receipt(&state, &SeatQuery::new(TBL_ADDR, 3, 0)),
        LastReceipt::NoAction
    );
    assert_eq!(
        last_receipt(&state, &SeatQuery::new(Address::new([1; 20]), 0, 0)),
        LastReceipt::NoAction
    );
}

#[test]
fn garbled_receipt_is_surfaced_not_defaulted() {
    let players = TwoPlayers::new();
    let state = players.state_with(players.flop_hand().with_seat(
        1,
        Seat::new(players.p2.address()).with_last(SignedReceipt::new("0xdeadbeef")),
    ));

    let last = last_receipt(&state, &at(1));
    assert!(last.is_undecodable());
    assert!(last.receipt().is_none());
    assert_eq!(last_amount(&state, &at(1)), 0);
    assert!(!is_folded(&state, &at(1)));
}

#[test]
fn last_amount_clips_bet_above_round_max() {
    let players = TwoPlayers::new();
    let signed = players.p2.sign(&BET, &[1, 1500]).unwrap();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(1, Seat::new(players.p2.address()).with_last(signed))
            .with_last_round_max_bet(1000),
    );

    assert_eq!(last_amount(&state, &at(1)), 500);
    assert_eq!(last_amount(&state, &at(0)), 0);
}

#[test]
fn last_amount_keeps_raise_within_round_max() {
    let players = TwoPlayers::new();
    let signed = players.p2.sign(&RAISE, &[1, 800]).unwrap();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(1, Seat::new(players.p2.address()).with_last(signed))
            .with_last_round_max_bet(1000),
    );

    assert_eq!(last_amount(&state, &at(1)), 800);
}

#[test]
fn last_amount_is_zero_for_fold_and_check() {
    let players = TwoPlayers::new();
    let fold = players.p1.sign(&FOLD, &[1, 500]).unwrap();
    let check = players.p2.sign(&CHECK, &[1, 500]).unwrap();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(0, Seat::new(players.p1.address()).with_last(fold))
            .with_seat(1, Seat::new(players.p2.address()).with_last(check)),
    );

    assert_eq!(last_amount(&state, &at(0)), 0);
    assert_eq!(last_amount(&state, &at(1)), 0);
}

#[test]
fn folded_only_for_fold_receipts() {
    let players = TwoPlayers::new();
    let fold = players.p2.sign(&FOLD, &[1, 500]).unwrap();
    let bet = players.p1.sign(&BET, &[1, 500]).unwrap();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(0, Seat::new(players.p1.address()).with_last(bet))
            .with_seat(1, Seat::new(players.p2.address()).with_last(fold)),
    );

    assert!(is_folded(&state, &at(1)));
    assert!(!is_folded(&state, &at(0)));
    assert!(!is_folded(&state, &at(5)));
}

#[test]
fn cards_show_own_hole_cards_at_viewer_pos() {
    let players = TwoPlayers::new();
    let state = players.state_with(players.flop_hand().with_hole_cards([15, 25]));
    let viewer = players.p1.address();

    assert_eq!(visible_cards(&state, &at(0), Some(&viewer)), [15, 25]);
}

#[test]
fn cards_show_revealed_cards_of_other_seat() {
    let players = TwoPlayers::new();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(1, Seat::new(players.p2.address()).with_cards([12, 21]))
            .with_hole_cards([15, 25]),
    );
    let viewer = players.p1.address();

    assert_eq!(visible_cards(&state, &at(1), Some(&viewer)), [12, 21]);
}

#[test]
fn cards_hidden_for_unrevealed_other_seat() {
    let players = TwoPlayers::new();
    let state = players.state_with(players.flop_hand().with_hole_cards([15, 25]));
    let viewer = players.p1.address();

    assert_eq!(visible_cards(&state, &at(1), Some(&viewer)), [-1, -1]);
}

#[test]
fn own_seat_wins_over_public_cards() {
    let players = TwoPlayers::new();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(0, Seat::new(players.p1.address()).with_cards([40, 41]))
            .with_hole_cards([15, 25]),
    );
    let viewer = players.p1.address();

    assert_eq!(visible_cards(&state, &at(0), Some(&viewer)), [15, 25]);
}

#[test]
fn no_viewer_never_sees_hole_cards() {
    let players = TwoPlayers::new();
    let state = players.state_with(players.flop_hand().with_hole_cards([15, 25]));

    assert_eq!(visible_cards(&state, &at(0), None), HIDDEN_CARDS);
    assert_eq!(visible_cards(&state, &at(1), None), HIDDEN_CARDS);
    assert_eq!(visible_cards(&state, &at(9), Some(&players.p1.address())), HIDDEN_CARDS);
}

#[test]
fn own_seat_before_deal_is_hidden() {
    let players = TwoPlayers::new();
    let state = players.state_with(players.flop_hand().with_state(HandPhase::Dealing));

    assert_eq!(
        visible_cards(&state, &at(0), Some(&players.p1.address())),
        HIDDEN_CARDS
    );
}

#[test]
fn viewer_position_follows_lineup() {
    let players = TwoPlayers::new();
    let state = players.state_with(players.flop_hand());

    assert_eq!(viewer_position(&state, &TBL_ADDR, 0, state.viewer()), Some(0));
    assert_eq!(
        viewer_position(&state, &TBL_ADDR, 0, Some(&players.p2.address())),
        Some(1)
    );
    assert_eq!(
        viewer_position(&state, &TBL_ADDR, 0, Some(&Address::new([3; 20]))),
        None
    );
    assert_eq!(viewer_position(&state, &TBL_ADDR, 0, None), None);
}

#[test]
fn table_view_combines_selectors_per_seat() {
    let players = TwoPlayers::new();
    let bet = players.p1.sign(&BET, &[1, 1500]).unwrap();
    let fold = players.p2.sign(&FOLD, &[1, 500]).unwrap();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(0, Seat::new(players.p1.address()).with_last(bet))
            .with_seat(1, Seat::new(players.p2.address()).with_last(fold))
            .with_last_round_max_bet(1000)
            .with_hole_cards([15, 25]),
    );

    let view = table_view(&state, &TBL_ADDR, 0, state.viewer()).unwrap();
    assert_eq!(view.state, HandPhase::Flop);
    assert_eq!(view.viewer_pos, Some(0));
    assert_eq!(view.seats.len(), 2);

    let me = &view.seats[0];
    assert!(me.is_viewer);
    assert_eq!(me.amount, 500);
    assert!(!me.folded);
    assert_eq!(me.cards, [15, 25]);

    let other = &view.seats[1];
    assert!(!other.is_viewer);
    assert!(other.folded);
    assert_eq!(other.amount, 0);
    assert_eq!(other.cards, HIDDEN_CARDS);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["seats"][1]["last"]["status"], "decoded");
    assert_eq!(json["seats"][1]["last"]["receipt"]["action"], "fold");
    assert_eq!(json["lastRoundMaxBet"], 1000);

    assert!(table_view(&state, &TBL_ADDR, 4, state.viewer()).is_none());
}

#[test]
fn selectors_read_hands_keyed_beside_table_data() {
    let players = TwoPlayers::new();
    let bet = players.p2.sign(&BET, &[1, 1500]).unwrap();
    let snapshot = serde_json::json!({
        "account": { "address": players.p1.address() },
        "table": {
            TBL_ADDR.to_string(): {
                "data": { "seats": [], "smallBlind": 50 },
                "0": {
                    "state": "flop",
                    "lineup": [
                        { "address": players.p1.address() },
                        { "address": players.p2.address(), "last": bet, "cards": [12, 21] }
                    ],
                    "lastRoundMaxBet": 1000,
                    "holeCards": [15, 25]
                }
            }
        }
    });
    let state = crate::table::StateTree::from_json(&snapshot.to_string()).unwrap();
    let viewer = state.viewer().copied();

    assert_eq!(visible_cards(&state, &at(0), viewer.as_ref()), [15, 25]);
    assert_eq!(visible_cards(&state, &at(1), viewer.as_ref()), [12, 21]);
    assert_eq!(last_amount(&state, &at(1)), 500);
    assert_eq!(viewer_position(&state, &TBL_ADDR, 0, viewer.as_ref()), Some(0));

    let view = table_view(&state, &TBL_ADDR, 0, viewer.as_ref()).unwrap();
    assert_eq!(view.seats.len(), 2);
    assert_eq!(view.state, HandPhase::Flop);
}

#[test]
fn selectors_agree_across_threads_on_one_snapshot() {
    let players = TwoPlayers::new();
    let bet = players.p2.sign(&BET, &[1, 1500]).unwrap();
    let state = players.state_with(
        players
            .flop_hand()
            .with_seat(1, Seat::new(players.p2.address()).with_last(bet))
            .with_last_round_max_bet(1000)
            .with_hole_cards([15, 25]),
    );
    let viewer = players.p1.address();
    let expected = table_view(&state, &TBL_ADDR, 0, Some(&viewer));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| table_view(&state, &TBL_ADDR, 0, Some(&viewer))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

fn wager_state(players: &TwoPlayers, receipt: &Receipt, cap: u64) -> crate::table::StateTree {
    let signed = players.p2.sign_receipt(receipt).unwrap();
    players.state_with(
        players
            .flop_hand()
            .with_seat(1, Seat::new(players.p2.address()).with_last(signed))
            .with_last_round_max_bet(cap),
    )
}

fn any_receipt() -> impl Strategy<Value = Receipt> {
    (0u64..4, 0u64..5, 0u64..1_000_000).prop_map(|(kind, round, amount)| match kind {
        0 => Receipt::Fold { round, amount },
        1 => Receipt::Check { round, amount },
        2 => Receipt::Bet { round, amount },
        _ => Receipt::Raise { round, amount },
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn folded_iff_last_action_is_fold(receipt in any_receipt()) {
        let players = TwoPlayers::new();
        let state = wager_state(&players, &receipt, 0);
        prop_assert_eq!(is_folded(&state, &at(1)), receipt.is_fold());
    }

    #[test]
    fn amount_follows_round_cap(receipt in any_receipt(), cap in 0u64..1_000_000) {
        let players = TwoPlayers::new();
        let state = wager_state(&players, &receipt, cap);
        let expected = match receipt {
            Receipt::Bet { amount, .. } | Receipt::Raise { amount, .. } if amount > cap => amount - cap,
            Receipt::Bet { amount, .. } | Receipt::Raise { amount, .. } => amount,
            _ => 0,
        };
        prop_assert_eq!(last_amount(&state, &at(1)), expected);
    }

    #[test]
    fn selectors_are_idempotent(receipt in any_receipt(), cap in 0u64..1_000_000) {
        let players = TwoPlayers::new();
        let state = wager_state(&players, &receipt, cap);
        let viewer = players.p1.address();
        for pos in 0..3 {
            let query = at(pos);
            prop_assert_eq!(last_receipt(&state, &query), last_receipt(&state, &query));
            prop_assert_eq!(last_amount(&state, &query), last_amount(&state, &query));
            prop_assert_eq!(is_folded(&state, &query), is_folded(&state, &query));
            prop_assert_eq!(
                visible_cards(&state, &query, Some(&viewer)),
                visible_cards(&state, &query, Some(&viewer))
            );
        }
    }
}
