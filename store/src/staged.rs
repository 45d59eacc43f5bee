//! Staged writes: buffer every mutation of one call in memory and apply them
//! to the underlying store in a single step.
//!
//! ```ignore
//! let mut staged = StagedStore::new(&mut store);
//! staged.set(b"k", b"v")?;
//! staged.commit()?;
//! ```
//!
//! If the staged store is dropped without calling [`StagedStore::commit`],
//! every buffered operation is discarded and the underlying store is untouched.

use std::collections::BTreeMap;

use tracing::trace;

use crate::kv::{KvPairs, KvStore};
use crate::StoreError;

/// A write overlay over another [`KvStore`].
///
/// Reads see the overlay first (`Some` = pending write, `None` = pending
/// delete), then the underlying store.
pub struct StagedStore<'a, S: KvStore + ?Sized> {
    inner: &'a mut S,
    overlay: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> StagedStore<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            overlay: BTreeMap::new(),
        }
    }

    /// Number of buffered operations.
    pub fn pending(&self) -> usize {
        self.overlay.len()
    }

    /// Apply all buffered operations to the underlying store, in key order.
    pub fn commit(self) -> Result<(), StoreError> {
        let ops = self.overlay.len();
        for (key, value) in self.overlay {
            match value {
                Some(v) => self.inner.set(&key, &v)?,
                None => self.inner.delete(&key)?,
            }
        }
        trace!(ops, "staged writes committed");
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStore for StagedStore<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.overlay.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.inner.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.overlay.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.overlay.insert(key.to_vec(), None);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<KvPairs, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.inner.iter_prefix(prefix)?.into_iter().collect();
        for (key, value) in self
            .overlay
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MapStore;

    #[test]
    fn reads_see_staged_writes() {
        let mut base = MapStore::default();
        base.set(b"a", b"1").unwrap();
        let mut staged = StagedStore::new(&mut base);
        staged.set(b"a", b"2").unwrap();
        staged.set(b"b", b"3").unwrap();
        assert_eq!(staged.get(b"a").unwrap(), Some(b"2".to_vec()));
        assert_eq!(staged.get(b"b").unwrap(), Some(b"3".to_vec()));
        staged.delete(b"a").unwrap();
        assert_eq!(staged.get(b"a").unwrap(), None);
        assert!(!staged.has(b"a").unwrap());
    }

    #[test]
    fn drop_discards_writes() {
        let mut base = MapStore::default();
        base.set(b"a", b"1").unwrap();
        {
            let mut staged = StagedStore::new(&mut base);
            staged.set(b"a", b"2").unwrap();
            staged.delete(b"a").unwrap();
            staged.set(b"c", b"9").unwrap();
        }
        assert_eq!(base.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(base.get(b"c").unwrap(), None);
    }

    #[test]
    fn commit_applies_writes_and_deletes() {
        let mut base = MapStore::default();
        base.set(b"a", b"1").unwrap();
        base.set(b"b", b"2").unwrap();
        let mut staged = StagedStore::new(&mut base);
        staged.delete(b"a").unwrap();
        staged.set(b"c", b"3").unwrap();
        assert_eq!(staged.pending(), 2);
        staged.commit().unwrap();
        assert_eq!(base.get(b"a").unwrap(), None);
        assert_eq!(base.get(b"b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(base.get(b"c").unwrap(), Some(b"3".to_vec()));
    }

    #[test]
    fn prefix_iteration_merges_in_order() {
        let mut base = MapStore::default();
        base.set(&[1, 1], b"a").unwrap();
        base.set(&[1, 3], b"c").unwrap();
        base.set(&[1, 5], b"e").unwrap();
        base.set(&[2, 0], b"other").unwrap();
        let mut staged = StagedStore::new(&mut base);
        staged.set(&[1, 2], b"b").unwrap();
        staged.delete(&[1, 3]).unwrap();
        staged.set(&[1, 5], b"E").unwrap();
        staged.set(&[2, 1], b"other2").unwrap();

        let entries = staged.iter_prefix(&[1]).unwrap();
        assert_eq!(
            entries,
            vec![
                (vec![1, 1], b"a".to_vec()),
                (vec![1, 2], b"b".to_vec()),
                (vec![1, 5], b"E".to_vec()),
            ]
        );
    }

    #[test]
    fn nested_staging_commits_into_parent_only() {
        let mut base = MapStore::default();
        let mut outer = StagedStore::new(&mut base);
        {
            let mut inner = StagedStore::new(&mut outer);
            inner.set(b"k", b"v").unwrap();
            inner.commit().unwrap();
        }
        assert_eq!(outer.get(b"k").unwrap(), Some(b"v".to_vec()));
        drop(outer);
        assert_eq!(base.get(b"k").unwrap(), None);
    }
}
