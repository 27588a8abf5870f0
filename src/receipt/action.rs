use serde::{Deserialize, Serialize};

use super::errors::ReceiptError;
use crate::signing::{Signable, TranscriptBuilder};
use crate::table::types::{Chips, Round};

pub const RECEIPT_KIND: &str = "receipt/action_v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Uint,
}

/// ABI-like description of a signed action: its name and parameter list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub name: &'static str,
    pub inputs: &'static [ParamKind],
}

const ROUND_AND_AMOUNT: &[ParamKind] = &[ParamKind::Uint, ParamKind::Uint];

pub const FOLD: ActionDescriptor = ActionDescriptor {
    name: "fold",
    inputs: ROUND_AND_AMOUNT,
};
pub const CHECK: ActionDescriptor = ActionDescriptor {
    name: "check",
    inputs: ROUND_AND_AMOUNT,
};
pub const BET: ActionDescriptor = ActionDescriptor {
    name: "bet",
    inputs: ROUND_AND_AMOUNT,
};
pub const RAISE: ActionDescriptor = ActionDescriptor {
    name: "raise",
    inputs: ROUND_AND_AMOUNT,
};

pub static DESCRIPTORS: [ActionDescriptor; 4] = [FOLD, CHECK, BET, RAISE];

impl ActionDescriptor {
    pub fn by_name(name: &str) -> Option<&'static ActionDescriptor> {
        DESCRIPTORS.iter().find(|d| d.name == name)
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }
}

/// A decoded player action.
///
/// For `Fold` and `Check` the amount is informational. For `Bet` and `Raise`
/// it is the seat's cumulative commitment for the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Receipt {
    Fold { round: Round, amount: Chips },
    Check { round: Round, amount: Chips },
    Bet { round: Round, amount: Chips },
    Raise { round: Round, amount: Chips },
}

impl Receipt {
    /// Build a receipt from a descriptor and its positional values.
    pub fn from_values(
        descriptor: &ActionDescriptor,
        values: &[u64],
    ) -> Result<Self, ReceiptError> {
        let [round, amount] = values else {
            return Err(ReceiptError::Arity {
                action: descriptor.name.to_string(),
                expected: descriptor.arity(),
                found: values.len(),
            });
        };
        let (round, amount) = (*round, *amount);
        match descriptor.name {
            "fold" => Ok(Receipt::Fold { round, amount }),
            "check" => Ok(Receipt::Check { round, amount }),
            "bet" => Ok(Receipt::Bet { round, amount }),
            "raise" => Ok(Receipt::Raise { round, amount }),
            other => Err(ReceiptError::UnknownAction(other.to_string())),
        }
    }

    pub fn descriptor(&self) -> &'static ActionDescriptor {
        match self {
            Receipt::Fold { .. } => &FOLD,
            Receipt::Check { .. } => &CHECK,
            Receipt::Bet { .. } => &BET,
            Receipt::Raise { .. } => &RAISE,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn round(&self) -> Round {
        match *self {
            Receipt::Fold { round, .. }
            | Receipt::Check { round, .. }
            | Receipt::Bet { round, .. }
            | Receipt::Raise { round, .. } => round,
        }
    }

    pub fn amount(&self) -> Chips {
        match *self {
            Receipt::Fold { amount, .. }
            | Receipt::Check { amount, .. }
            | Receipt::Bet { amount, .. }
            | Receipt::Raise { amount, .. } => amount,
        }
    }

    pub fn values(&self) -> Vec<u64> {
        vec![self.round(), self.amount()]
    }

    pub fn is_fold(&self) -> bool {
        matches!(self, Receipt::Fold { .. })
    }

    /// True for actions that put chips in: bet and raise.
    pub fn is_wager(&self) -> bool {
        matches!(self, Receipt::Bet { .. } | Receipt::Raise { .. })
    }
}

impl Signable for Receipt {
    fn domain_kind(&self) -> &'static str {
        RECEIPT_KIND
    }

    fn write_transcript(&self, builder: &mut TranscriptBuilder) {
        builder.append_bytes(self.name().as_bytes());
        let values = self.values();
        builder.append_u8(values.len() as u8);
        for value in values {
            builder.append_u64(value);
        }
    }
}
