//! Concurrent key-value registry: many readers, one writer.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Thread-safe map shared by cloning the handle.
///
/// Reads take the shared lock and may run in parallel; every mutation
/// takes the exclusive lock, so a reader sees either the old or the new
/// value for a key, never a partial write.
pub struct SessionStore<K, V> {
    entries: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for SessionStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for SessionStore<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K, V> SessionStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `key`.
    pub async fn set(&self, key: K, value: V) {
        self.entries.write().await.insert(key, value);
    }

    /// Insert only if `key` is absent. Returns true if inserted.
    pub async fn insert_new(&self, key: K, value: V) -> bool {
        let mut map = self.entries.write().await;
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, value);
        true
    }

    /// Current value for `key`, or `None` if absent or deleted.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.read().await.get(key).cloned()
    }

    /// Remove `key`, returning the value it held. No-op if absent.
    pub async fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.write().await.remove(key)
    }

    /// Keep only entries for which `keep` returns true. Returns how many
    /// entries were removed.
    pub async fn retain<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut map = self.entries.write().await;
        let before = map.len();
        map.retain(|k, v| keep(k, v));
        before - map.len()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
