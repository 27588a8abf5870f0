//! Common test utilities for selector and codec tests

use rand::{rngs::StdRng, SeedableRng};

use crate::receipt::{ReceiptCodec, ReceiptCurve, ReceiptSigner};
use crate::table::{Account, Address, Hand, HandPhase, Seat, StateTree};

/// Helpers shared across test modules.
pub mod serde {
    use std::fmt::Debug;

    /// Assert that a value survives a serde_json round-trip using structural equality.
    pub fn assert_round_trip_eq<T>(value: &T)
    where
        T: ::serde::Serialize + ::serde::de::DeserializeOwned + PartialEq + Debug,
    {
        let json = serde_json::to_string(value)
            .expect("serialization should succeed during round-trip testing");
        let restored: T = serde_json::from_str(&json)
            .expect("deserialization should succeed during round-trip testing");
        assert_eq!(restored, *value, "serde_json round-trip altered the value");
    }
}

pub const TBL_ADDR: Address = Address::new([0x77; 20]);

/// Two deterministic players sharing one set of receipt parameters.
pub struct TwoPlayers {
    pub codec: ReceiptCodec<ReceiptCurve>,
    pub p1: ReceiptSigner<ReceiptCurve>,
    pub p2: ReceiptSigner<ReceiptCurve>,
}

impl Default for TwoPlayers {
    fn default() -> Self {
        let mut rng = StdRng::from_seed([7u8; 32]);
        let codec = ReceiptCodec::<ReceiptCurve>::setup(&mut rng).expect("setup");
        let p1 = codec.signer(&mut rng).expect("keygen");
        let p2 = codec.signer(&mut rng).expect("keygen");
        Self { codec, p1, p2 }
    }
}

impl TwoPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand 0 on the flop with `[p1, p2]` seated and nothing acted yet.
    pub fn flop_hand(&self) -> Hand {
        Hand::new(
            HandPhase::Flop,
            vec![Seat::new(self.p1.address()), Seat::new(self.p2.address())],
        )
    }

    /// State with `hand` at `TBL_ADDR`, hand 0, viewed by p1.
    pub fn state_with(&self, hand: Hand) -> StateTree {
        StateTree::new(Account::new(self.p1.address())).with_hand(TBL_ADDR, 0, hand)
    }
}
