//! Capacity-bounded cache with FIFO eviction and disposal.
//!
//! Eviction order follows insertion, not reads: the order log holds exactly
//! one record per cached key, placed when the key enters the cache. Writing
//! to a key that is already cached keeps its original position; a key that
//! was evicted or deleted re-enters at the back. Each evicted value goes
//! through the disposal hook exactly once and is then announced to eviction
//! listeners.

use std::borrow::Borrow;
use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use hashbrown::HashMap;

use crate::config::{CacheConfig, DisposalPolicy};
use crate::error::SpatialError;
use crate::events::Listeners;
use crate::ids::ListenerId;

/// Teardown for values leaving the cache. Errors are logged, never propagated.
pub type DisposeHook<K, V> = Box<dyn FnMut(&K, &mut V) -> anyhow::Result<()>>;

/// Payload of an eviction notification. The value has already been disposed.
#[derive(Clone, Debug, PartialEq)]
pub struct Evicted<K, V> {
    pub key: K,
    pub value: V,
}

pub struct BoundedCache<K, V> {
    capacity: usize,
    disposal: DisposalPolicy,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    dispose: DisposeHook<K, V>,
    evicted: Listeners<Evicted<K, V>>,
}

impl<K: fmt::Debug, V> fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("disposal", &self.disposal)
            .field("len", &self.entries.len())
            .field("order", &self.order)
            .finish()
    }
}

fn run_dispose<K: fmt::Debug, V>(
    hook: &mut DisposeHook<K, V>,
    key: &K,
    value: &mut V,
    reason: &str,
) {
    if let Err(err) = hook(key, value) {
        log::warn!("failed to dispose {reason} cache entry {key:?}: {err:#}");
    }
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Create a cache with the default disposal policy.
    pub fn new(
        capacity: usize,
        dispose: impl FnMut(&K, &mut V) -> anyhow::Result<()> + 'static,
    ) -> Result<Self, SpatialError> {
        Self::with_config(CacheConfig::new(capacity), dispose)
    }

    pub fn with_config(
        cfg: CacheConfig,
        dispose: impl FnMut(&K, &mut V) -> anyhow::Result<()> + 'static,
    ) -> Result<Self, SpatialError> {
        cfg.validate()?;
        Ok(Self {
            capacity: cfg.capacity,
            disposal: cfg.disposal,
            entries: HashMap::with_capacity(cfg.capacity),
            order: VecDeque::with_capacity(cfg.capacity),
            dispose: Box::new(dispose),
            evicted: Listeners::new(),
        })
    }

    /// Cache whose values need no teardown beyond `Drop`.
    pub fn without_disposal(capacity: usize) -> Result<Self, SpatialError> {
        Self::new(capacity, |_, _| Ok(()))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn disposal_policy(&self) -> DisposalPolicy {
        self.disposal
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite `key`, then evict the oldest entries until the
    /// cache is back within capacity. The key being set is never evicted by
    /// its own insertion.
    pub fn set(&mut self, key: K, value: V) {
        match self.entries.insert(key.clone(), value) {
            // already cached: keeps its order record
            Some(mut previous) => {
                if self.disposal == DisposalPolicy::Always {
                    run_dispose(&mut self.dispose, &key, &mut previous, "overwritten");
                }
            }
            None => self.order.push_back(key.clone()),
        }

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if oldest == key {
                continue;
            }
            let Some(mut value) = self.entries.remove(&oldest) else {
                continue;
            };
            log::debug!("evicting cache entry {oldest:?}");
            run_dispose(&mut self.dispose, &oldest, &mut value, "evicted");
            self.evicted.emit(&Evicted { key: oldest, value });
        }
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(key)
    }

    /// Remove `key` and hand its value back to the caller. Never disposes.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, value) = self.entries.remove_entry(key)?;
        self.order.retain(|k| <K as Borrow<Q>>::borrow(k) != key);
        Some(value)
    }

    /// Remove `key`, disposing its value unless the policy is
    /// `EvictionOnly`. Returns whether the key was present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some((k, mut value)) = self.entries.remove_entry(key) else {
            return false;
        };
        self.order.retain(|o| <K as Borrow<Q>>::borrow(o) != key);
        if self.disposal == DisposalPolicy::Always {
            run_dispose(&mut self.dispose, &k, &mut value, "deleted");
        }
        true
    }

    /// Drop every entry, disposing values unless the policy is `EvictionOnly`.
    pub fn clear(&mut self) {
        self.order.clear();
        let dispose = self.disposal == DisposalPolicy::Always;
        for (k, mut value) in self.entries.drain() {
            if dispose {
                run_dispose(&mut self.dispose, &k, &mut value, "cleared");
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter()
    }

    /// Subscribe to evictions caused by `set`.
    pub fn add_evicted_listener(
        &mut self,
        listener: impl FnMut(&Evicted<K, V>) + 'static,
    ) -> ListenerId {
        self.evicted.add(listener)
    }

    pub fn remove_evicted_listener(&mut self, id: ListenerId) -> bool {
        self.evicted.remove(id)
    }
}
