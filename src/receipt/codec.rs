use std::cell::RefCell;
use std::fmt;

use ark_crypto_primitives::signature::schnorr::{Schnorr, Signature as SchnorrSignature};
use ark_crypto_primitives::signature::SignatureScheme;
use ark_ec::CurveGroup;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::action::{ActionDescriptor, Receipt, RECEIPT_KIND};
use super::errors::ReceiptError;
use crate::signing::{TranscriptBuilder, TranscriptReader, WithSignature};
use crate::table::types::Address;

const LOG_TARGET: &str = "receipt::codec";
const RECEIPT_VERSION: u8 = 1;

pub type ReceiptScheme<C> = Schnorr<C, Sha256>;
pub type ReceiptCurve = ark_grumpkin::Projective;

type Params<C> = <ReceiptScheme<C> as SignatureScheme>::Parameters;
type PublicKey<C> = <ReceiptScheme<C> as SignatureScheme>::PublicKey;
type SecretKey<C> = <ReceiptScheme<C> as SignatureScheme>::SecretKey;

/// Opaque `0x`-hex encoding of a signed action as it travels between peers.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedReceipt(String);

impl SignedReceipt {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SignedReceipt {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}

impl fmt::Display for SignedReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SignedReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 18;
        match self.0.get(..PREVIEW) {
            Some(head) if self.0.len() > PREVIEW => write!(f, "SignedReceipt({head}..)"),
            _ => write!(f, "SignedReceipt({})", self.0),
        }
    }
}

/// Signer identity and action recovered from a signed receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    pub signer: Address,
    pub receipt: Receipt,
}

impl ParsedReceipt {
    pub fn action(&self) -> &'static str {
        self.receipt.name()
    }

    pub fn values(&self) -> Vec<u64> {
        self.receipt.values()
    }
}

struct Envelope<'a> {
    public_key: &'a [u8],
    transcript: &'a [u8],
    signature: &'a [u8],
}

fn seal(public_key: &[u8], transcript: &[u8], signature: &[u8]) -> SignedReceipt {
    let mut builder = TranscriptBuilder::raw();
    builder.append_u8(RECEIPT_VERSION);
    builder.append_bytes(public_key);
    builder.append_bytes(transcript);
    builder.append_bytes(signature);
    SignedReceipt(format!("0x{}", hex::encode(builder.finish())))
}

fn decode_hex(receipt: &SignedReceipt) -> Result<Vec<u8>, ReceiptError> {
    let s = receipt.as_str();
    Ok(hex::decode(s.strip_prefix("0x").unwrap_or(s))?)
}

fn open_envelope(bytes: &[u8]) -> Result<Envelope<'_>, ReceiptError> {
    let mut reader = TranscriptReader::raw(bytes);
    let version = reader.read_u8()?;
    if version != RECEIPT_VERSION {
        return Err(ReceiptError::UnsupportedVersion(version));
    }
    let public_key = reader.read_bytes()?;
    let transcript = reader.read_bytes()?;
    let signature = reader.read_bytes()?;
    reader.finish()?;
    Ok(Envelope {
        public_key,
        transcript,
        signature,
    })
}

fn decode_transcript(transcript: &[u8]) -> Result<Receipt, ReceiptError> {
    let mut reader = TranscriptReader::open(transcript, RECEIPT_KIND)?;
    let name = std::str::from_utf8(reader.read_bytes()?).map_err(|_| ReceiptError::ActionName)?;
    let descriptor = ActionDescriptor::by_name(name)
        .ok_or_else(|| ReceiptError::UnknownAction(name.to_string()))?;
    let count = reader.read_u8()? as usize;
    let values = (0..count)
        .map(|_| reader.read_u64())
        .collect::<Result<Vec<_>, _>>()?;
    reader.finish()?;
    Receipt::from_values(descriptor, &values)
}

/// Decode a signed receipt without checking its signature.
///
/// Signatures are verified where receipts enter the client; readers of the
/// state tree only need the signer and the action.
pub fn parse(receipt: &SignedReceipt) -> Result<ParsedReceipt, ReceiptError> {
    let bytes = decode_hex(receipt)?;
    let envelope = open_envelope(&bytes)?;
    let decoded = decode_transcript(envelope.transcript)?;
    Ok(ParsedReceipt {
        signer: Address::from_public_key_bytes(envelope.public_key),
        receipt: decoded,
    })
}

fn encode_signature<C: CurveGroup>(signature: &SchnorrSignature<C>) -> Result<Vec<u8>, ReceiptError> {
    let mut bytes = Vec::new();
    signature
        .prover_response
        .serialize_compressed(&mut bytes)
        .map_err(|err| ReceiptError::Signing(format!("signature serialization error: {err}")))?;
    signature
        .verifier_challenge
        .serialize_compressed(&mut bytes)
        .map_err(|err| ReceiptError::Signing(format!("signature serialization error: {err}")))?;
    Ok(bytes)
}

fn decode_signature<C: CurveGroup>(bytes: &[u8]) -> Result<SchnorrSignature<C>, ReceiptError> {
    let mut reader = bytes;
    let prover_response = CanonicalDeserialize::deserialize_compressed(&mut reader)
        .map_err(|_| ReceiptError::Signature)?;
    let verifier_challenge = CanonicalDeserialize::deserialize_compressed(&mut reader)
        .map_err(|_| ReceiptError::Signature)?;
    if !reader.is_empty() {
        return Err(ReceiptError::Signature);
    }
    Ok(SchnorrSignature {
        prover_response,
        verifier_challenge,
    })
}

fn public_key_bytes<C: CurveGroup>(pk: &PublicKey<C>) -> Result<Vec<u8>, ReceiptError> {
    let mut bytes = Vec::new();
    pk.serialize_compressed(&mut bytes)
        .map_err(|_| ReceiptError::PublicKey)?;
    Ok(bytes)
}

/// Shared Schnorr parameters for every seat at a table.
#[derive(Clone)]
pub struct ReceiptCodec<C: CurveGroup> {
    params: Params<C>,
}

impl<C: CurveGroup> ReceiptCodec<C> {
    pub fn new(params: Params<C>) -> Self {
        Self { params }
    }

    pub fn setup<R: Rng>(rng: &mut R) -> Result<Self, ReceiptError> {
        let params = ReceiptScheme::<C>::setup(rng)
            .map_err(|err| ReceiptError::Signing(format!("setup error: {err}")))?;
        Ok(Self::new(params))
    }

    /// Generate a fresh key pair and wrap it in a signer.
    pub fn signer<R: Rng>(&self, rng: &mut R) -> Result<ReceiptSigner<C>, ReceiptError> {
        let (pk, sk) = ReceiptScheme::<C>::keygen(&self.params, rng)
            .map_err(|err| ReceiptError::Signing(format!("keygen error: {err}")))?;
        ReceiptSigner::new(self.params.clone(), pk, sk, rng.gen())
    }

    /// Decode a receipt and check its signature against the embedded key.
    pub fn verify(&self, receipt: &SignedReceipt) -> Result<ParsedReceipt, ReceiptError> {
        let bytes = decode_hex(receipt)?;
        let envelope = open_envelope(&bytes)?;
        let pk = <C::Affine as CanonicalDeserialize>::deserialize_compressed(envelope.public_key)
            .map_err(|_| ReceiptError::PublicKey)?;
        let signature = decode_signature::<C>(envelope.signature)?;
        let valid = ReceiptScheme::<C>::verify(&self.params, &pk, envelope.transcript, &signature)
            .map_err(|_| ReceiptError::InvalidSignature)?;
        if !valid {
            return Err(ReceiptError::InvalidSignature);
        }
        let decoded = decode_transcript(envelope.transcript)?;
        Ok(ParsedReceipt {
            signer: Address::from_public_key_bytes(envelope.public_key),
            receipt: decoded,
        })
    }
}

/// Key holder that signs receipts for one seat.
pub struct ReceiptSigner<C: CurveGroup> {
    params: Params<C>,
    sk: SecretKey<C>,
    public_key_bytes: Vec<u8>,
    address: Address,
    rng: RefCell<StdRng>,
}

impl<C: CurveGroup> ReceiptSigner<C> {
    pub fn new(
        params: Params<C>,
        pk: PublicKey<C>,
        sk: SecretKey<C>,
        seed: [u8; 32],
    ) -> Result<Self, ReceiptError> {
        let public_key_bytes = public_key_bytes::<C>(&pk)?;
        let address = Address::from_public_key_bytes(&public_key_bytes);
        Ok(Self {
            params,
            sk,
            public_key_bytes,
            address,
            rng: RefCell::new(StdRng::from_seed(seed)),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign `descriptor(values...)`.
    pub fn sign(
        &self,
        descriptor: &ActionDescriptor,
        values: &[u64],
    ) -> Result<SignedReceipt, ReceiptError> {
        let receipt = Receipt::from_values(descriptor, values)?;
        self.sign_receipt(&receipt)
    }

    pub fn sign_receipt(&self, receipt: &Receipt) -> Result<SignedReceipt, ReceiptError> {
        let mut rng = self.rng.borrow_mut();
        let signed = WithSignature::<SchnorrSignature<C>, Receipt>::new::<ReceiptScheme<C>, StdRng>(
            *receipt,
            &self.params,
            &self.sk,
            &mut *rng,
        )
        .map_err(|err| ReceiptError::Signing(err.to_string()))?;
        let signature = encode_signature::<C>(&signed.signature)?;
        tracing::debug!(
            target: LOG_TARGET,
            signer = %self.address,
            action = receipt.name(),
            round = receipt.round(),
            amount = receipt.amount(),
            "signed receipt"
        );
        Ok(seal(&self.public_key_bytes, &signed.transcript, &signature))
    }
}
