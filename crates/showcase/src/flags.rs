#![forbid(unsafe_code)]

//! Persisted per-user tour markers.
//!
//! Two markers exist per `(user, tour)` pair:
//!
//! - `showcase:seen:<user>:<tour>`: the user has been shown the tour.
//! - `showcase:pending:<user>:<tour>`: the tour should start the next time
//!   its preconditions hold (set after signup, cleared when it starts).
//!
//! `%` and `:` inside user and tour ids are percent-escaped, so ids that
//! contain the separator never share a key with another `(user, tour)` pair.
//!
//! [`TourFlags`] is generic over a [`StorageBackend`] so the same logic runs
//! against browser local storage, a JSON file, or memory in tests.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::StorageError;

const SEEN_PREFIX: &str = "showcase:seen";
const PENDING_PREFIX: &str = "showcase:pending";
const MARKER: &str = "1";

fn key_part(id: &str) -> Cow<'_, str> {
    if !id.contains([':', '%']) {
        return Cow::Borrowed(id);
    }
    let mut out = String::with_capacity(id.len() + 4);
    for c in id.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// String key/value store.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(feature = "state-persistence")]
pub use file::FileStorage;

#[cfg(feature = "state-persistence")]
mod file {
    //! JSON file backend.
    //!
    //! # File Format
    //!
    //! ```json
    //! {
    //!   "version": 1,
    //!   "flags": { "showcase:seen:u1:welcome": "1" }
    //! }
    //! ```
    //!
    //! Writes go to `<path>.tmp` and are renamed over `path`, so a crash
    //! mid-write leaves the previous file intact.

    use std::borrow::Cow;
use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use serde::{Deserialize, Serialize};

    use super::StorageBackend;
    use crate::error::StorageError;

    const FORMAT_VERSION: u64 = 1;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct FlagFile {
        version: u64,
        flags: BTreeMap<String, String>,
    }

    /// Flags persisted to a JSON file.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Use `path`; the parent directory must exist.
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
            if !self.path.exists() {
                return Ok(BTreeMap::new());
            }
            let contents = std::fs::read_to_string(&self.path)?;
            let file: FlagFile = serde_json::from_str(&contents)
                .map_err(|e| StorageError::Corrupt(format!("failed to parse flag file: {e}")))?;
            if file.version != FORMAT_VERSION {
                return Err(StorageError::Corrupt(format!(
                    "unsupported flag file version: {} (expected {FORMAT_VERSION})",
                    file.version
                )));
            }
            Ok(file.flags)
        }

        fn save(&self, flags: BTreeMap<String, String>) -> Result<(), StorageError> {
            let file = FlagFile {
                version: FORMAT_VERSION,
                flags,
            };
            let json = serde_json::to_string_pretty(&file)
                .map_err(|e| StorageError::Corrupt(format!("failed to serialize flags: {e}")))?;
            let temp = self.path.with_extension("json.tmp");
            std::fs::write(&temp, json)?;
            std::fs::rename(&temp, &self.path)?;
            Ok(())
        }
    }

    impl StorageBackend for FileStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.load()?.remove(key))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut flags = self.load()?;
            flags.insert(key.to_owned(), value.to_owned());
            self.save(flags)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            let mut flags = self.load()?;
            if flags.remove(key).is_some() {
                self.save(flags)?;
            }
            Ok(())
        }
    }
}

/// "Seen" and "pending" markers over a storage backend.
#[derive(Debug, Clone, Default)]
pub struct TourFlags<B> {
    backend: B,
}

impl<B: StorageBackend> TourFlags<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn seen_key(user: &str, tour: &str) -> String {
        format!("{SEEN_PREFIX}:{}:{}", key_part(user), key_part(tour))
    }

    pub fn pending_key(user: &str, tour: &str) -> String {
        format!("{PENDING_PREFIX}:{}:{}", key_part(user), key_part(tour))
    }

    pub fn has_seen(&self, user: &str, tour: &str) -> Result<bool, StorageError> {
        Ok(self.backend.get(&Self::seen_key(user, tour))?.is_some())
    }

    pub fn mark_seen(&mut self, user: &str, tour: &str) -> Result<(), StorageError> {
        tracing::debug!(target: "showcase.flags", user, tour, "tour marked seen");
        self.backend.set(&Self::seen_key(user, tour), MARKER)
    }

    pub fn is_pending(&self, user: &str, tour: &str) -> Result<bool, StorageError> {
        Ok(self.backend.get(&Self::pending_key(user, tour))?.is_some())
    }

    pub fn set_pending(&mut self, user: &str, tour: &str) -> Result<(), StorageError> {
        tracing::debug!(target: "showcase.flags", user, tour, "tour marked pending");
        self.backend.set(&Self::pending_key(user, tour), MARKER)
    }

    pub fn clear_pending(&mut self, user: &str, tour: &str) -> Result<(), StorageError> {
        self.backend.remove(&Self::pending_key(user, tour))
    }

    /// Consume the pending marker.
    ///
    /// Returns `true` only if the tour was pending and not yet seen. The
    /// marker is removed whenever it was present: a pending marker on an
    /// already-seen tour is stale and is dropped with a `false` result.
    pub fn take_pending(&mut self, user: &str, tour: &str) -> Result<bool, StorageError> {
        if !self.is_pending(user, tour)? {
            return Ok(false);
        }
        let fresh = !self.has_seen(user, tour)?;
        self.clear_pending(user, tour)?;
        Ok(fresh)
    }

    /// Forget both markers, so the tour can be offered again.
    pub fn reset(&mut self, user: &str, tour: &str) -> Result<(), StorageError> {
        tracing::debug!(target: "showcase.flags", user, tour, "tour flags reset");
        self.backend.remove(&Self::seen_key(user, tour))?;
        self.backend.remove(&Self::pending_key(user, tour))
    }
}
