//! Typed collections over a [`KvStore`].
//!
//! Every collection owns a one-byte prefix. Keys are encoded so that byte
//! order equals logical order (big-endian integers, raw bytes, terminal
//! strings). Values are bincode.

use std::marker::PhantomData;

use fast_types::PubKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kv::KvStore;
use crate::StoreError;

/// Order-preserving key encoding.
pub trait KeyCodec: Sized {
    fn encode_key(&self, out: &mut Vec<u8>);
    fn decode_key(bytes: &[u8]) -> Result<Self, StoreError>;
}

impl KeyCodec for u64 {
    fn encode_key(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, StoreError> {
        let raw: [u8; 8] = bytes
            .try_into()
            .map_err(|_| StoreError::Corruption(format!("u64 key of {} bytes", bytes.len())))?;
        Ok(u64::from_be_bytes(raw))
    }
}

impl KeyCodec for PubKey {
    fn encode_key(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(PubKey::from(bytes))
    }
}

/// `(u64, String)`: the string is the terminal component, so it is stored
/// without a length prefix.
impl KeyCodec for (u64, String) {
    fn encode_key(&self, out: &mut Vec<u8>) {
        self.0.encode_key(out);
        out.extend_from_slice(self.1.as_bytes());
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() < 8 {
            return Err(StoreError::Corruption(format!(
                "pair key of {} bytes",
                bytes.len()
            )));
        }
        let (head, tail) = bytes.split_at(8);
        let id = u64::decode_key(head)?;
        let s = String::from_utf8(tail.to_vec())
            .map_err(|e| StoreError::Corruption(format!("pair key string: {e}")))?;
        Ok((id, s))
    }
}

fn encode_value<V: Serialize>(value: &V) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(value)?)
}

fn decode_value<V: DeserializeOwned>(bytes: &[u8]) -> Result<V, StoreError> {
    Ok(bincode::deserialize(bytes)?)
}

/// A single value under a fixed key.
pub struct Item<V> {
    prefix: u8,
    _value: PhantomData<V>,
}

impl<V: Serialize + DeserializeOwned> Item<V> {
    pub const fn new(prefix: u8) -> Self {
        Self {
            prefix,
            _value: PhantomData,
        }
    }

    pub fn get<S: KvStore + ?Sized>(&self, kv: &S) -> Result<Option<V>, StoreError> {
        kv.get(&[self.prefix])?
            .map(|bytes| decode_value(&bytes))
            .transpose()
    }

    pub fn set<S: KvStore + ?Sized>(&self, kv: &mut S, value: &V) -> Result<(), StoreError> {
        kv.set(&[self.prefix], &encode_value(value)?)
    }
}

/// A monotonically increasing counter. Absent means zero.
pub struct Sequence {
    prefix: u8,
}

impl Sequence {
    pub const fn new(prefix: u8) -> Self {
        Self { prefix }
    }

    /// The value the next call to [`Sequence::next`] will return.
    pub fn peek<S: KvStore + ?Sized>(&self, kv: &S) -> Result<u64, StoreError> {
        match kv.get(&[self.prefix])? {
            Some(bytes) => u64::decode_key(&bytes),
            None => Ok(0),
        }
    }

    /// Return the current value and advance the counter.
    pub fn next<S: KvStore + ?Sized>(&self, kv: &mut S) -> Result<u64, StoreError> {
        let current = self.peek(kv)?;
        let advanced = current
            .checked_add(1)
            .ok_or_else(|| StoreError::Corruption("sequence exhausted".into()))?;
        self.set(kv, advanced)?;
        Ok(current)
    }

    pub fn set<S: KvStore + ?Sized>(&self, kv: &mut S, value: u64) -> Result<(), StoreError> {
        kv.set(&[self.prefix], &value.to_be_bytes())
    }
}

/// A typed map from `K` to `V`.
pub struct Map<K, V> {
    prefix: u8,
    _marker: PhantomData<(K, V)>,
}

impl<K: KeyCodec, V: Serialize + DeserializeOwned> Map<K, V> {
    pub const fn new(prefix: u8) -> Self {
        Self {
            prefix,
            _marker: PhantomData,
        }
    }

    fn key(&self, key: &K) -> Vec<u8> {
        let mut out = vec![self.prefix];
        key.encode_key(&mut out);
        out
    }

    pub fn get<S: KvStore + ?Sized>(&self, kv: &S, key: &K) -> Result<Option<V>, StoreError> {
        kv.get(&self.key(key))?
            .map(|bytes| decode_value(&bytes))
            .transpose()
    }

    pub fn has<S: KvStore + ?Sized>(&self, kv: &S, key: &K) -> Result<bool, StoreError> {
        kv.has(&self.key(key))
    }

    pub fn set<S: KvStore + ?Sized>(&self, kv: &mut S, key: &K, value: &V) -> Result<(), StoreError> {
        kv.set(&self.key(key), &encode_value(value)?)
    }

    pub fn remove<S: KvStore + ?Sized>(&self, kv: &mut S, key: &K) -> Result<(), StoreError> {
        kv.delete(&self.key(key))
    }

    /// All entries in key order.
    pub fn iter<S: KvStore + ?Sized>(&self, kv: &S) -> Result<Vec<(K, V)>, StoreError> {
        self.iter_encoded_prefix(kv, &[])
    }

    /// Entries whose encoded key starts with `partial`, in key order.
    pub fn iter_encoded_prefix<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        partial: &[u8],
    ) -> Result<Vec<(K, V)>, StoreError> {
        let mut prefix = vec![self.prefix];
        prefix.extend_from_slice(partial);
        kv.iter_prefix(&prefix)?
            .into_iter()
            .map(|(k, v)| Ok((K::decode_key(&k[1..])?, decode_value(&v)?)))
            .collect()
    }
}
