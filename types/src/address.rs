//! Typed account identifiers with an `acct_` text form.
//!
//! Address format: `acct_` + base32(raw, 32 chars) + base32(checksum, 8 chars)
//!
//! Checksum: first 5 bytes of Blake2b-256(raw).
//! Base32 alphabet: `13456789abcdefghijkmnopqrstuwxyz` (avoids ambiguous chars).
//! Total address length: 5 (prefix) + 32 + 8 = 45 characters.
//!
//! Addresses compare as raw bytes. The text form only exists at the
//! serialization boundary.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

type Blake2b256 = Blake2b<U32>;

/// Base32 alphabet (32 chars, avoids visually ambiguous 0/O, 2/Z, l/I, v).
const BASE32_ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Number of raw bytes in an account address.
pub const ADDRESS_LEN: usize = 20;
/// Base32 characters for the raw bytes (160 bits → 32 chars).
const RAW_CHARS: usize = 32;
/// Base32 characters for the checksum (40 bits → 8 chars).
const CHECKSUM_CHARS: usize = 8;

/// An account on the host chain: users, admins, owners, payout targets and
/// the module authority are all identified this way.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountAddress([u8; ADDRESS_LEN]);

impl AccountAddress {
    /// The standard prefix of the text form.
    pub const PREFIX: &'static str = "acct_";

    pub const fn new(raw: [u8; ADDRESS_LEN]) -> Self {
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Build an address from a byte slice of exactly [`ADDRESS_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            ValidationError::InvalidAddress(format!(
                "expected {ADDRESS_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    /// Parse the `acct_` text form, verifying length, alphabet and checksum.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidAddress(s.to_string());

        let encoded = s.strip_prefix(Self::PREFIX).ok_or_else(invalid)?;
        if encoded.len() != RAW_CHARS + CHECKSUM_CHARS {
            return Err(invalid());
        }
        let (raw_encoded, checksum_encoded) = encoded.split_at(RAW_CHARS);

        let raw: [u8; ADDRESS_LEN] = decode_base32_fixed(raw_encoded).ok_or_else(invalid)?;
        let check: [u8; 5] = decode_base32_fixed(checksum_encoded).ok_or_else(invalid)?;
        if check != checksum(&raw) {
            return Err(invalid());
        }
        Ok(Self(raw))
    }
}

fn checksum(raw: &[u8]) -> [u8; 5] {
    let mut hasher = Blake2b256::new();
    hasher.update(raw);
    let digest = hasher.finalize();
    let mut out = [0u8; 5];
    out.copy_from_slice(&digest[..5]);
    out
}

/// Encode a byte slice as base32 using the address alphabet.
fn encode_base32(bytes: &[u8]) -> String {
    let num_chars = (bytes.len() * 8).div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode a base32 string into a fixed-size byte array. Returns `None` on
/// invalid characters or wrong length.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos < N {
                result[pos] = (buffer >> bits_in_buffer) as u8;
                pos += 1;
            }
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            Self::PREFIX,
            encode_base32(&self.0),
            encode_base32(&checksum(&self.0))
        )
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({self})")
    }
}

impl FromStr for AccountAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
