//! The ordered key-value capability every backend provides.

use crate::StoreError;

/// Key/value pairs in ascending key order.
pub type KvPairs = Vec<(Vec<u8>, Vec<u8>)>;

/// An ordered byte-keyed store with point access and prefix iteration.
///
/// Keys compare lexicographically. `iter_prefix` must return entries in
/// ascending key order; replicated execution depends on it.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvPairs, StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvPairs, StoreError> {
        (**self).iter_prefix(prefix)
    }
}
