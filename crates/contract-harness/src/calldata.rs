use std::fmt;

use crate::signature::{SIGNATURE_LEN, Signature};

/// Hex call-data for the verifier: the 65-byte signature followed directly by the
/// message bytes. No length prefix; the contract derives the message length from
/// the call-data size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallData(String);

impl CallData {
    pub fn new(signature: &Signature, message: &[u8]) -> Self {
        let mut hex = signature.to_string();
        hex.push_str(&hex::encode(message));
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of bytes the contract sees.
    pub fn byte_len(&self) -> usize {
        self.0.len() / 2
    }

    pub fn message_len(&self) -> usize {
        self.byte_len() - SIGNATURE_LEN
    }
}

impl fmt::Display for CallData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature() -> Signature {
        Signature::from_bytes(&[0x11; SIGNATURE_LEN])
    }

    #[test]
    fn signature_then_message() {
        let calldata = CallData::new(&signature(), b"Hi!");
        assert_eq!(calldata.as_str(), format!("{}486921", "11".repeat(65)));
        assert_eq!(calldata.byte_len(), 68);
        assert_eq!(calldata.message_len(), 3);
    }

    #[test]
    fn empty_message_is_signature_only() {
        let calldata = CallData::new(&signature(), b"");
        assert_eq!(calldata.as_str(), signature().to_string());
        assert_eq!(calldata.message_len(), 0);
    }

    #[test]
    fn always_even_length_lower_case_hex() {
        let message: Vec<u8> = (0..=255).collect();
        let calldata = CallData::new(&signature(), &message);
        assert_eq!(calldata.as_str().len() % 2, 0);
        assert!(
            calldata
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
        assert_eq!(calldata.message_len(), 256);
    }
}
