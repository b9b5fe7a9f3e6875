use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    Blake3V1,
}

/// Content address of an image payload. Blob files are named by the hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    pub alg: HashAlgorithm,
    pub bytes: [u8; 32],
}

#[derive(Debug, thiserror::Error)]
pub enum ContentHashParseError {
    #[error("invalid hex in content hash: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("content hash must be 32 bytes, got {0}")]
    Length(usize),
}

impl ContentHash {
    pub fn of(data: &[u8]) -> Self {
        Self {
            alg: HashAlgorithm::Blake3V1,
            bytes: *blake3::hash(data).as_bytes(),
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// First eight hex digits, used in log lines and placeholder labels.
    pub fn short(&self) -> String {
        hex::encode(&self.bytes[..4])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ContentHash {
    type Err = ContentHashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s)?;
        let bytes: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| ContentHashParseError::Length(raw.len()))?;
        Ok(Self {
            alg: HashAlgorithm::Blake3V1,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_hash() {
        assert_eq!(ContentHash::of(b"png-bytes"), ContentHash::of(b"png-bytes"));
        assert_ne!(ContentHash::of(b"png-bytes"), ContentHash::of(b"jpg-bytes"));
    }

    #[test]
    fn hex_form_parses_back() {
        let hash = ContentHash::of(b"payload");
        let parsed: ContentHash = hash.to_hex().parse().expect("parse hex");
        assert_eq!(parsed, hash);
        assert_eq!(hash.short().len(), 8);
    }

    #[test]
    fn short_or_garbage_input_is_rejected() {
        assert!(matches!(
            "abcd".parse::<ContentHash>(),
            Err(ContentHashParseError::Length(2))
        ));
        assert!(matches!(
            "not-hex".parse::<ContentHash>(),
            Err(ContentHashParseError::Hex(_))
        ));
    }
}
