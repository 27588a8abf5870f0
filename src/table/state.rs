use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::types::{Address, CardPair, Chips, HandId, HandPhase, Position};
use crate::receipt::SignedReceipt;

// Shared alias used throughout the state tree
pub type Shared<T> = Arc<T>;

/// Session record of the local viewer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Self {
            address: Some(address),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSeat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub amount: Chips,
}

/// Static table configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    #[serde(default)]
    pub seats: Vec<TableSeat>,
    #[serde(default)]
    pub small_blind: Chips,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub address: Address,
    /// Most recent signed action of this seat in the hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<SignedReceipt>,
    /// Publicly revealed hole cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<CardPair>,
}

impl Seat {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            last: None,
            cards: None,
        }
    }

    pub fn with_last(mut self, receipt: SignedReceipt) -> Self {
        self.last = Some(receipt);
        self
    }

    pub fn with_cards(mut self, cards: CardPair) -> Self {
        self.cards = Some(cards);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hand {
    #[serde(default)]
    pub state: HandPhase,
    #[serde(default)]
    pub lineup: Vec<Seat>,
    #[serde(default)]
    pub last_round_max_bet: Chips,
    /// The local viewer's own cards; never copied into a seat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hole_cards: Option<CardPair>,
}

impl Hand {
    pub fn new(state: HandPhase, lineup: Vec<Seat>) -> Self {
        Self {
            state,
            lineup,
            last_round_max_bet: 0,
            hole_cards: None,
        }
    }

    pub fn with_last_round_max_bet(mut self, max_bet: Chips) -> Self {
        self.last_round_max_bet = max_bet;
        self
    }

    pub fn with_hole_cards(mut self, cards: CardPair) -> Self {
        self.hole_cards = Some(cards);
        self
    }

    pub fn with_state(mut self, state: HandPhase) -> Self {
        self.state = state;
        self
    }

    /// Replace the seat at `pos`; out-of-range positions leave the hand unchanged.
    pub fn with_seat(mut self, pos: Position, seat: Seat) -> Self {
        if let Some(slot) = self.lineup.get_mut(pos) {
            *slot = seat;
        }
        self
    }

    pub fn seat(&self, pos: Position) -> Option<&Seat> {
        self.lineup.get(pos)
    }

    pub fn position_of(&self, address: &Address) -> Option<Position> {
        self.lineup.iter().position(|seat| &seat.address == address)
    }
}

/// One table: its static `data` plus every hand keyed by index.
///
/// On the wire hands sit beside `data` under their decimal index, so
/// `table[addr][0]` is hand 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub data: TableData,
    hands: BTreeMap<HandId, Shared<Hand>>,
}

impl Table {
    pub fn new(data: TableData) -> Self {
        Self {
            data,
            hands: BTreeMap::new(),
        }
    }

    pub fn with_hand(&self, id: HandId, hand: Hand) -> Self {
        let mut hands = self.hands.clone();
        hands.insert(id, Shared::new(hand));
        Self {
            data: self.data.clone(),
            hands,
        }
    }

    pub fn hand(&self, id: HandId) -> Option<&Hand> {
        self.hands.get(&id).map(|hand| hand.as_ref())
    }

    pub fn shared_hand(&self, id: HandId) -> Option<&Shared<Hand>> {
        self.hands.get(&id)
    }

    /// Highest hand index recorded for the table.
    pub fn latest_hand_id(&self) -> Option<HandId> {
        self.hands.keys().next_back().copied()
    }
}

const TABLE_DATA_KEY: &str = "data";

impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.hands.len() + 1))?;
        map.serialize_entry(TABLE_DATA_KEY, &self.data)?;
        for (id, hand) in &self.hands {
            map.serialize_entry(&id.to_string(), hand.as_ref())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TableVisitor)
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = Table;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table map with `data` and hands keyed by index")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Table, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut table = Table::default();
        while let Some(key) = access.next_key::<String>()? {
            if key == TABLE_DATA_KEY {
                table.data = access.next_value()?;
            } else if let Ok(id) = key.parse::<HandId>() {
                let hand: Hand = access.next_value()?;
                table.hands.insert(id, Shared::new(hand));
            } else {
                // unrelated protocol fields
                access.next_value::<IgnoredAny>()?;
            }
        }
        Ok(table)
    }
}

/// Immutable snapshot of everything the client knows.
///
/// Every `with_*` method returns a new version; untouched tables and hands
/// are shared with the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTree {
    #[serde(default)]
    pub account: Account,
    #[serde(default, rename = "table")]
    tables: BTreeMap<Address, Shared<Table>>,
}

impl StateTree {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            tables: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn viewer(&self) -> Option<&Address> {
        self.account.address.as_ref()
    }

    pub fn with_account(&self, account: Account) -> Self {
        Self {
            account,
            tables: self.tables.clone(),
        }
    }

    pub fn with_table(&self, address: Address, table: Table) -> Self {
        let mut tables = self.tables.clone();
        tables.insert(address, Shared::new(table));
        Self {
            account: self.account.clone(),
            tables,
        }
    }

    /// Insert or replace one hand, creating the table entry if needed.
    pub fn with_hand(&self, address: Address, id: HandId, hand: Hand) -> Self {
        let table = match self.tables.get(&address) {
            Some(existing) => existing.with_hand(id, hand),
            None => Table::default().with_hand(id, hand),
        };
        self.with_table(address, table)
    }

    pub fn table(&self, address: &Address) -> Option<&Table> {
        self.tables.get(address).map(|table| table.as_ref())
    }

    pub fn shared_table(&self, address: &Address) -> Option<&Shared<Table>> {
        self.tables.get(address)
    }

    pub fn table_data(&self, address: &Address) -> Option<&TableData> {
        self.table(address).map(|table| &table.data)
    }

    pub fn hand(&self, address: &Address, id: HandId) -> Option<&Hand> {
        self.table(address).and_then(|table| table.hand(id))
    }

    pub fn seat(&self, address: &Address, id: HandId, pos: Position) -> Option<&Seat> {
        self.hand(address, id).and_then(|hand| hand.seat(pos))
    }

}
