use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Token amounts in the smallest unit.
pub type Amount = u128;

/// Opaque account reference (wallet or contract). Compared by value.
/// Human-readable formats carry it as a hex string, binary ones as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}

impl FromStr for Identity {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| LedgerError::InvalidIdentity(format!("{s}: {e}")))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|v: Vec<u8>| LedgerError::InvalidIdentity(format!("{s}: expected 32 bytes, got {}", v.len())))?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_accepts_prefix() {
        let id = Identity([0xab; 32]);
        let text = format!("0x{}", id);
        assert_eq!(text.parse::<Identity>().unwrap(), id);
    }

    #[test]
    fn json_uses_hex_and_bincode_uses_bytes() {
        let id = Identity([0x01; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        assert_eq!(serde_json::from_str::<Identity>(&json).unwrap(), id);

        let bytes = bincode::serialize(&id).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bincode::deserialize::<Identity>(&bytes).unwrap(), id);
    }

    #[test]
    fn short_hex_is_rejected() {
        let err = "abcd".parse::<Identity>().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidIdentity(_)));
    }
}
