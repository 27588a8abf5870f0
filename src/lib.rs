pub mod receipt;
pub mod selectors;
pub mod signing;
pub mod table;

#[cfg(test)]
pub mod test_utils;

pub use receipt::{parse, ParsedReceipt, Receipt, ReceiptCodec, ReceiptSigner, SignedReceipt};
pub use selectors::{
    is_folded, last_amount, last_receipt, seat_view, table_view, viewer_position, visible_cards,
    LastReceipt, SeatQuery,
};
pub use table::{Address, StateTree};
