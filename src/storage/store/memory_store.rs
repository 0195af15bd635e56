//! An in-memory store.

use parking_lot::RwLock;

use std::collections::BTreeMap;

use crate::storage::{
    Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits, StorageError, StoreKey,
    StoreKeys, StoreKeysPrefixes, StorePrefix, WritableStorageTraits,
};

/// An in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data_map: RwLock<BTreeMap<StoreKey, Bytes>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        Ok(self.data_map.read().get(key).cloned())
    }

    fn size_key(&self, key: &StoreKey) -> Result<Option<u64>, StorageError> {
        Ok(self
            .data_map
            .read()
            .get(key)
            .map(|value| value.len() as u64))
    }
}

impl WritableStorageTraits for MemoryStore {
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        self.data_map.write().insert(key.clone(), value);
        Ok(())
    }

    fn erase(&self, key: &StoreKey) -> Result<(), StorageError> {
        self.data_map.write().remove(key);
        Ok(())
    }

    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError> {
        self.data_map.write().retain(|key, _| !key.has_prefix(prefix));
        Ok(())
    }
}

impl ListableStorageTraits for MemoryStore {
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        Ok(self
            .data_map
            .read()
            .keys()
            .filter(|key| key.has_prefix(prefix))
            .cloned()
            .collect())
    }

    fn list_dir(&self, prefix: &StorePrefix) -> Result<StoreKeysPrefixes, StorageError> {
        let mut keys: StoreKeys = vec![];
        let mut prefixes = std::collections::BTreeSet::new();
        for key in self.list_prefix(prefix)? {
            let relative = &key.as_str()[prefix.as_str().len()..];
            match relative.split_once('/') {
                Some((child, _)) => {
                    prefixes.insert(StorePrefix::new(format!("{}{child}/", prefix.as_str()))?);
                }
                None => keys.push(key),
            }
        }
        Ok(StoreKeysPrefixes::new(keys, prefixes.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn memory_write_read_list() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        store.set(&StoreKey::new("a/b/c")?, Bytes::from_static(&[1]))?;
        store.set(&StoreKey::new("a/d")?, Bytes::from_static(&[2, 3]))?;
        store.set(&StoreKey::new("e")?, Bytes::from_static(&[]))?;

        assert_eq!(store.size_key(&StoreKey::new("a/d")?)?, Some(2));
        let list_dir = store.list_dir(&StorePrefix::new("a/")?)?;
        assert_eq!(list_dir.keys(), &[StoreKey::new("a/d")?]);
        assert_eq!(list_dir.prefixes(), &[StorePrefix::new("a/b/")?]);

        store.erase_prefix(&StorePrefix::new("a/")?)?;
        assert_eq!(store.list()?, vec![StoreKey::new("e")?]);
        Ok(())
    }
}
