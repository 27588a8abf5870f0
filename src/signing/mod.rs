use anyhow::Result;
use ark_crypto_primitives::signature::SignatureScheme;

pub const DOMAIN_TAG: &[u8] = b"pokerchannel/receipt/v1";

/// Builder for canonical receipt transcripts.
pub struct TranscriptBuilder {
    buffer: Vec<u8>,
}

impl TranscriptBuilder {
    pub fn new(kind: &'static str) -> Self {
        let mut buffer = Vec::with_capacity(64);
        buffer.extend_from_slice(DOMAIN_TAG);
        buffer.extend_from_slice(&(kind.len() as u16).to_be_bytes());
        buffer.extend_from_slice(kind.as_bytes());
        Self { buffer }
    }

    /// Builder without the domain header, for framing already-signed parts.
    pub fn raw() -> Self {
        Self {
            buffer: Vec::with_capacity(128),
        }
    }

    pub fn append_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn append_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.buffer
            .extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        self.buffer.extend_from_slice(bytes);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    #[error("transcript ended early")]
    Truncated,
    #[error("transcript domain does not match")]
    DomainMismatch,
    #[error("{0} unread bytes after transcript")]
    TrailingBytes(usize),
}

/// Cursor over bytes produced by [`TranscriptBuilder`].
pub struct TranscriptReader<'a> {
    bytes: &'a [u8],
}

impl<'a> TranscriptReader<'a> {
    /// Open a transcript, checking the domain tag and kind header.
    pub fn open(bytes: &'a [u8], kind: &'static str) -> Result<Self, TranscriptError> {
        let mut reader = Self::raw(bytes);
        if reader.take(DOMAIN_TAG.len())? != DOMAIN_TAG {
            return Err(TranscriptError::DomainMismatch);
        }
        let len = u16::from_be_bytes(reader.array::<2>()?) as usize;
        if reader.take(len)? != kind.as_bytes() {
            return Err(TranscriptError::DomainMismatch);
        }
        Ok(reader)
    }

    pub fn raw(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn read_u8(&mut self) -> Result<u8, TranscriptError> {
        Ok(self.array::<1>()?[0])
    }

    pub fn read_u64(&mut self) -> Result<u64, TranscriptError> {
        Ok(u64::from_be_bytes(self.array::<8>()?))
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8], TranscriptError> {
        let len = u32::from_be_bytes(self.array::<4>()?) as usize;
        self.take(len)
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(self) -> Result<(), TranscriptError> {
        match self.bytes.len() {
            0 => Ok(()),
            n => Err(TranscriptError::TrailingBytes(n)),
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], TranscriptError> {
        if self.bytes.len() < len {
            return Err(TranscriptError::Truncated);
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], TranscriptError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

/// Values that can be signed into a canonical transcript.
pub trait Signable {
    /// Logical kind string used for domain separation.
    fn domain_kind(&self) -> &'static str;

    /// Append this value's canonical representation into the transcript builder.
    fn write_transcript(&self, builder: &mut TranscriptBuilder);

    /// Obtain canonical signing bytes.
    fn to_signing_bytes(&self) -> Vec<u8> {
        let mut builder = TranscriptBuilder::new(self.domain_kind());
        self.write_transcript(&mut builder);
        builder.finish()
    }
}

/// A signed envelope carrying a signable value, its signature, and the exact
/// transcript bytes that were signed (domain-separated and canonicalized).
#[derive(Clone, Debug)]
pub struct WithSignature<Sig, T>
where
    T: Signable,
{
    pub value: T,
    pub signature: Sig,
    /// Canonical bytes used for signing/verification.
    pub transcript: Vec<u8>,
}

impl<Sig, T> WithSignature<Sig, T>
where
    T: Signable,
{
    /// Build a signed envelope using a provided SignatureScheme.
    ///
    /// The transcript is constructed from the value's `to_signing_bytes`.
    pub fn new<S, R>(
        value: T,
        params: &S::Parameters,
        sk: &S::SecretKey,
        rng: &mut R,
    ) -> Result<Self>
    where
        S: SignatureScheme<Signature = Sig>,
        R: rand::Rng,
    {
        let transcript = value.to_signing_bytes();

        let signature = S::sign(params, sk, &transcript, rng)
            .map_err(|e| anyhow::anyhow!("signature error: {e}"))?;

        Ok(WithSignature {
            value,
            signature,
            transcript,
        })
    }
}
