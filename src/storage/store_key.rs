use derive_more::{Display, From};
use thiserror::Error;

use super::StorePrefix;

/// A Zarr store key.
///
/// A key is a `/` separated path relative to the root of the store, such as `arrays/ints/int8/.zarray` or `scalars/pi/0`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct StoreKey(String);

/// An invalid store key.
#[derive(Debug, From, Error)]
#[error("invalid store key {0}")]
pub struct StoreKeyError(String);

/// A list of [`StoreKey`].
pub type StoreKeys = Vec<StoreKey>;

impl StoreKey {
    /// Create a new store key from `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreKeyError`] if `key` is not valid according to [`StoreKey::validate()`].
    pub fn new(key: impl Into<String>) -> Result<Self, StoreKeyError> {
        let key = key.into();
        if Self::validate(&key) {
            Ok(Self(key))
        } else {
            Err(StoreKeyError(key))
        }
    }

    /// Create a new store key from `key` without validation.
    ///
    /// # Safety
    ///
    /// `key` is not validated, so this can result in an invalid store key.
    #[must_use]
    pub unsafe fn new_unchecked(key: impl Into<String>) -> Self {
        let key = key.into();
        debug_assert!(Self::validate(&key));
        Self(key)
    }

    /// Extracts a string slice of the underlying key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a key.
    ///
    /// A key is not empty, does not start with `/`, and does not end with `/`.
    #[must_use]
    pub fn validate(key: &str) -> bool {
        !key.starts_with('/') && !key.ends_with('/') && !key.eq("")
    }

    /// Returns true if the key has prefix `prefix`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &StorePrefix) -> bool {
        self.0.starts_with(prefix.as_str())
    }

    /// The final `/` separated component of the key, e.g. `.zarray`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the parent of this key.
    #[must_use]
    pub fn parent(&self) -> StorePrefix {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => unsafe { StorePrefix::new_unchecked(format!("{parent}/")) },
            None => StorePrefix::root(),
        }
    }
}

impl TryFrom<&str> for StoreKey {
    type Error = StoreKeyError;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_key() {
        assert!(StoreKey::new("a").is_ok());
        assert_eq!(StoreKey::new("a").unwrap().to_string(), "a");
        assert!(StoreKey::new("a/").is_err());
        assert_eq!(
            StoreKey::new("a/").unwrap_err().to_string(),
            "invalid store key a/"
        );
        assert!(StoreKey::new("/a").is_err());
        assert!(StoreKey::new("").is_err());
    }

    #[test]
    fn store_key_parent() {
        let key = StoreKey::new("scalars/pi/.zarray").unwrap();
        assert_eq!(key.parent(), StorePrefix::new("scalars/pi/").unwrap());
        assert_eq!(key.file_name(), ".zarray");
        assert!(key.has_prefix(&StorePrefix::new("scalars/").unwrap()));
        assert_eq!(StoreKey::new(".zgroup").unwrap().parent(), StorePrefix::root());
    }
}
