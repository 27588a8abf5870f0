pub mod action;
pub mod codec;
pub mod errors;

pub use action::*;
pub use codec::*;
pub use errors::*;
