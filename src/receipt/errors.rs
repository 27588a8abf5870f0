use thiserror::Error;

use crate::signing::TranscriptError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReceiptError {
    #[error("receipt is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("malformed receipt: {0}")]
    Transcript(#[from] TranscriptError),
    #[error("unsupported receipt version {0}")]
    UnsupportedVersion(u8),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("action `{action}` takes {expected} values, found {found}")]
    Arity {
        action: String,
        expected: usize,
        found: usize,
    },
    #[error("action name is not utf-8")]
    ActionName,
    #[error("invalid signer public key")]
    PublicKey,
    #[error("invalid signature encoding")]
    Signature,
    #[error("signature does not match transcript")]
    InvalidSignature,
    #[error("signing failed: {0}")]
    Signing(String),
}
