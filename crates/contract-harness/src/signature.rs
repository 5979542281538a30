use std::{fmt, str::FromStr};

use crate::HarnessError;

/// Length in bytes of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// A recoverable ECDSA signature as produced by `ethkey signmessage`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
    v: u8,
}

impl Signature {
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LEN]) -> Self {
        let mut r = [0; 32];
        let mut s = [0; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self { r, s, v: bytes[64] }
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut bytes = [0; SIGNATURE_LEN];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn v(&self) -> u8 {
        self.v
    }

    /// Returns a copy whose first byte (the top byte of `r`) is replaced.
    pub fn with_leading_byte(mut self, byte: u8) -> Self {
        self.r[0] = byte;
        self
    }
}

impl FromStr for Signature {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| HarnessError::InvalidSignature {
            value: value.to_string(),
            reason,
        };

        let digits = value.strip_prefix("0x").unwrap_or(value);
        let bytes = hex::decode(digits).map_err(|err| invalid(err.to_string()))?;
        let bytes: [u8; SIGNATURE_LEN] = bytes.as_slice().try_into().map_err(|_| {
            invalid(format!(
                "expected {SIGNATURE_LEN} bytes, found {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(&bytes))
    }
}

/// Lower-case hex without a `0x` prefix, the form the contract's call-data expects.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(0x{self})")
    }
}
