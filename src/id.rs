//! License key and admin token generation.
//!
//! Keys carry 128 bits from the OS CSPRNG so guessing them is infeasible.
//! Two encodings are supported:
//! - `uuid`: hyphenated UUID v4 (`xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`)
//! - `hex`: 32 lowercase hex chars from 16 random bytes

use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

/// Longest operator-supplied key accepted on create.
pub const MAX_KEY_LEN: usize = 256;

/// Encoding used for generated license keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFormat {
    #[default]
    Uuid,
    Hex,
}

impl KeyFormat {
    /// Parses `uuid` or `hex` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Some(Self::Uuid),
            "hex" => Some(Self::Hex),
            _ => None,
        }
    }

    /// Generates a fresh random key in this format.
    pub fn generate(&self) -> String {
        match self {
            Self::Uuid => Uuid::new_v4().to_string(),
            Self::Hex => random_hex(16),
        }
    }
}

/// Hex-encodes `len` bytes from the OS random source.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generates an admin token suitable for `ADMIN_TOKEN`.
pub fn generate_admin_token() -> String {
    format!("kw_{}", random_hex(32))
}

/// Validate an operator-supplied key.
///
/// Keys are opaque, but they travel in JSON bodies and log hints, so
/// whitespace, control characters and oversized values are rejected.
pub fn is_valid_supplied_key(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_KEY_LEN
        && !s.chars().any(|c| c.is_whitespace() || c.is_control())
}
