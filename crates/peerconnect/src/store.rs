//! The application store.
//!
//! [`Store`] owns the key-value [`Storage`] and a single in-memory copy of
//! the two persisted values: the user's profile and the connection request
//! set. Both are read once in [`Store::load`]; every mutation commits to
//! storage first and only then updates the cache, so a failed write leaves
//! the cache matching what is on disk.
//!
//! Views borrow the store rather than reaching for storage keys themselves.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::directory::StudentId;
use crate::error::{Error, Result};
use crate::profile::UserProfile;
use crate::storage::Storage;

/// Storage key for the user's profile.
pub const PROFILE_KEY: &str = "peerconnect_profile";

/// Storage key for the connection request set.
pub const REQUESTS_KEY: &str = "peerconnect_requests";

/// Student ids the user has sent connection requests to.
///
/// Kept in append order with no duplicates. Persisted as a plain JSON array
/// of integers. On load, entries that are not valid ids are skipped one by
/// one rather than discarding the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<StoredId>", into = "Vec<StudentId>")]
pub struct ConnectionRequests {
    ids: Vec<StudentId>,
}

impl ConnectionRequests {
    /// Whether `id` has been requested.
    #[must_use]
    pub fn contains(&self, id: StudentId) -> bool {
        self.ids.contains(&id)
    }

    /// Append `id` unless present. Returns `true` if it was added.
    pub fn insert(&mut self, id: StudentId) -> bool {
        if self.contains(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Remove `id`. Returns `true` if it was present.
    pub fn remove(&mut self, id: StudentId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&existing| existing != id);
        self.ids.len() != before
    }

    /// Requested ids in append order.
    #[must_use]
    pub fn ids(&self) -> &[StudentId] {
        &self.ids
    }

    /// Number of requested ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no ids are requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<StudentId>> for ConnectionRequests {
    fn from(ids: Vec<StudentId>) -> Self {
        // A hand-edited value may repeat ids; keep the first occurrence
        let mut requests = Self::default();
        for id in ids {
            requests.insert(id);
        }
        requests
    }
}

/// One element of a stored request array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredId {
    Valid(StudentId),
    Invalid(#[allow(dead_code)] IgnoredAny),
}

impl From<Vec<StoredId>> for ConnectionRequests {
    fn from(entries: Vec<StoredId>) -> Self {
        let mut skipped = 0usize;
        let ids = entries
            .into_iter()
            .filter_map(|entry| match entry {
                StoredId::Valid(id) => Some(id),
                StoredId::Invalid(_) => {
                    skipped += 1;
                    None
                }
            })
            .collect::<Vec<_>>();
        if skipped > 0 {
            warn!(skipped, "ignoring invalid stored connection ids");
        }
        Self::from(ids)
    }
}

impl From<ConnectionRequests> for Vec<StudentId> {
    fn from(requests: ConnectionRequests) -> Self {
        requests.ids
    }
}

/// Owned cache over the key-value store.
#[derive(Debug)]
pub struct Store {
    storage: Storage,
    profile: UserProfile,
    requests: ConnectionRequests,
}

impl Store {
    /// Read both persisted values once and take ownership of `storage`.
    ///
    /// Missing, empty or undecodable values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying storage cannot be queried.
    pub fn load(storage: Storage) -> Result<Self> {
        let profile = read_or_default(&storage, PROFILE_KEY)?;
        let requests = read_or_default(&storage, REQUESTS_KEY)?;
        Ok(Self {
            storage,
            profile,
            requests,
        })
    }

    /// Re-read both persisted values, replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying storage cannot be queried.
    pub fn reload(&mut self) -> Result<()> {
        self.profile = read_or_default(&self.storage, PROFILE_KEY)?;
        self.requests = read_or_default(&self.storage, REQUESTS_KEY)?;
        Ok(())
    }

    /// The underlying key-value store.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The cached profile.
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Overwrite the persisted profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the value cannot be written; the
    /// cached profile is left unchanged.
    pub fn save_profile(&mut self, profile: UserProfile) -> Result<()> {
        self.commit(PROFILE_KEY, &profile)?;
        info!(name = %profile.name, "profile saved");
        self.profile = profile;
        Ok(())
    }

    /// The cached request set.
    #[must_use]
    pub fn requests(&self) -> &ConnectionRequests {
        &self.requests
    }

    /// Add `id` to the request set and persist it.
    ///
    /// Returns `false` without writing if `id` is already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the value cannot be written.
    pub fn add_request(&mut self, id: StudentId) -> Result<bool> {
        if self.requests.contains(id) {
            debug!(%id, "request already present");
            return Ok(false);
        }
        let mut updated = self.requests.clone();
        updated.insert(id);
        self.commit(REQUESTS_KEY, &updated)?;
        info!(%id, "connection request added");
        self.requests = updated;
        Ok(true)
    }

    /// Remove `id` from the request set and persist the result.
    ///
    /// The set is written even when `id` was absent. Returns whether `id`
    /// was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the value cannot be written.
    pub fn remove_request(&mut self, id: StudentId) -> Result<bool> {
        let mut updated = self.requests.clone();
        let removed = updated.remove(id);
        self.commit(REQUESTS_KEY, &updated)?;
        if removed {
            info!(%id, "connection removed");
        }
        self.requests = updated;
        Ok(removed)
    }

    /// Remove every stored value and reset the cache to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the store cannot be cleared.
    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.storage.clear()?;
        self.profile = UserProfile::default();
        self.requests = ConnectionRequests::default();
        Ok(removed)
    }

    fn commit<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.storage.set_item(key, &json)
    }
}

fn read_or_default<T: DeserializeOwned + Default>(storage: &Storage, key: &str) -> Result<T> {
    match storage.get_item(key)? {
        Some(raw) if !raw.trim().is_empty() => match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(source) => {
                warn!("{}; using default", Error::corrupt_value(key, source));
                Ok(T::default())
            }
        },
        _ => Ok(T::default()),
    }
}
