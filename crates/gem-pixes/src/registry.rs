//! Name bindings for frame stores.
//!
//! Stores live in an arena addressed by [`StoreId`]; a name map sits on top
//! so that nodes can find a store by the name its owner was created with.
//! Ids carry a generation, so an id kept past [`StoreRegistry::release`]
//! never resolves to a store created later in the same slot.

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::error::{PixError, PixResult};
use crate::frame_store::{FrameStore, DEFAULT_NUM_FRAMES};

/// A frame store shared between its owner and the nodes addressing it.
pub type SharedStore = Arc<Mutex<FrameStore>>;

/// Prefix of names generated for stores created without one.
pub const GENERATED_PREFIX: &str = "pix_buffer_";

/// Handle to a store in a [`StoreRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId {
    index: u32,
    generation: u32,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    entry: Option<(String, SharedStore)>,
}

#[derive(Default)]
struct Inner {
    slots: Vec<Slot>,
    free: Vec<u32>,
    names: HashMap<String, StoreId>,
    next_generated: u64,
}

impl Inner {
    fn generate_name(&mut self) -> String {
        loop {
            let name = format!("{GENERATED_PREFIX}{:06}", self.next_generated);
            self.next_generated += 1;
            if !self.names.contains_key(&name) {
                return name;
            }
        }
    }

    fn slot(&self, id: StoreId) -> Option<&(String, SharedStore)> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }
}

/// The set of named frame stores.
///
/// Cloning yields another handle to the same set.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    inner: Arc<RwLock<Inner>>,
}

static GLOBAL: OnceLock<StoreRegistry> = OnceLock::new();

/// Locks a store, recovering the data if a previous holder panicked.
pub fn lock(store: &SharedStore) -> MutexGuard<'_, FrameStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StoreRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static StoreRegistry {
        GLOBAL.get_or_init(StoreRegistry::new)
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a store and binds it under `name`.
    ///
    /// A missing or empty name gets a generated one. A negative capacity
    /// selects [`DEFAULT_NUM_FRAMES`].
    pub fn create(&self, name: Option<&str>, capacity: i64) -> PixResult<StoreId> {
        let mut inner = self.write();

        let name = match name.filter(|n| !n.is_empty()) {
            Some(n) if inner.names.contains_key(n) => {
                return Err(PixError::BindingConflict(n.to_string()));
            }
            Some(n) => n.to_string(),
            None => inner.generate_name(),
        };
        let capacity = usize::try_from(capacity).unwrap_or(DEFAULT_NUM_FRAMES);
        let store = Arc::new(Mutex::new(FrameStore::new(name.clone(), capacity)?));

        let index = match inner.free.pop() {
            Some(index) => index,
            None => {
                inner.slots.push(Slot::default());
                u32::try_from(inner.slots.len() - 1)
                    .map_err(|_| PixError::BindingConflict(name.clone()))?
            }
        };
        let slot = &mut inner.slots[index as usize];
        slot.entry = Some((name.clone(), store));
        let id = StoreId {
            index,
            generation: slot.generation,
        };
        inner.names.insert(name.clone(), id);

        log::info!("pix_buffer: created '{name}' with {capacity} frames");
        Ok(id)
    }

    /// Unbinds a store. Returns false if `id` was already released.
    ///
    /// Nodes still holding the store keep it alive, but it can no longer be
    /// found by name.
    pub fn release(&self, id: StoreId) -> bool {
        let mut inner = self.write();
        let Some(slot) = inner.slots.get_mut(id.index as usize) else {
            return false;
        };
        if slot.generation != id.generation {
            return false;
        }
        let Some((name, _)) = slot.entry.take() else {
            return false;
        };
        slot.generation = slot.generation.wrapping_add(1);
        inner.free.push(id.index);
        inner.names.remove(&name);
        log::info!("pix_buffer: released '{name}'");
        true
    }

    /// Finds a store by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<SharedStore> {
        let inner = self.read();
        let id = *inner.names.get(name)?;
        inner.slot(id).map(|(_, store)| Arc::clone(store))
    }

    /// Finds a store by id.
    #[must_use]
    pub fn resolve(&self, id: StoreId) -> Option<SharedStore> {
        self.read().slot(id).map(|(_, store)| Arc::clone(store))
    }

    /// Returns the name bound to `id`.
    #[must_use]
    pub fn name_of(&self, id: StoreId) -> Option<String> {
        self.read().slot(id).map(|(name, _)| name.clone())
    }

    /// Runs `f` with the named store locked.
    pub fn with_store<F, R>(&self, name: &str, f: F) -> PixResult<R>
    where
        F: FnOnce(&mut FrameStore) -> R,
    {
        let store = self
            .lookup(name)
            .ok_or_else(|| PixError::UnknownStore(name.to_string()))?;
        let mut guard = lock(&store);
        Ok(f(&mut guard))
    }

    /// Returns all bound names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of bound stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().names.len()
    }

    /// Returns true if no store is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_lookup() {
        let registry = StoreRegistry::new();
        let id = registry.create(Some("frames"), 8).unwrap();
        assert_eq!(registry.name_of(id).as_deref(), Some("frames"));
        let store = registry.lookup("frames").unwrap();
        assert_eq!(lock(&store).count(), 8);
        assert!(Arc::ptr_eq(&store, &registry.resolve(id).unwrap()));
    }

    #[test]
    fn negative_capacity_uses_default() {
        let registry = StoreRegistry::new();
        registry.create(Some("d"), -1).unwrap();
        let count = registry.with_store("d", |s| s.count()).unwrap();
        assert_eq!(count, DEFAULT_NUM_FRAMES);
    }

    #[test]
    fn conflicting_name_is_rejected() {
        let registry = StoreRegistry::new();
        registry.create(Some("dup"), 1).unwrap();
        assert!(matches!(
            registry.create(Some("dup"), 2),
            Err(PixError::BindingConflict(n)) if n == "dup"
        ));
        assert_eq!(registry.with_store("dup", |s| s.count()).unwrap(), 1);
    }

    #[test]
    fn generated_names_skip_bound_ones() {
        let registry = StoreRegistry::new();
        registry.create(Some("pix_buffer_000001"), 1).unwrap();
        let a = registry.create(None, 1).unwrap();
        let b = registry.create(Some(""), 1).unwrap();
        assert_eq!(registry.name_of(a).as_deref(), Some("pix_buffer_000000"));
        assert_eq!(registry.name_of(b).as_deref(), Some("pix_buffer_000002"));
    }

    #[test]
    fn release_unbinds_and_invalidates_id() {
        let registry = StoreRegistry::new();
        let id = registry.create(Some("gone"), 1).unwrap();
        assert!(registry.release(id));
        assert!(!registry.release(id));
        assert!(registry.lookup("gone").is_none());
        assert!(registry.resolve(id).is_none());

        // slot reuse must not revive the stale id
        let fresh = registry.create(Some("gone"), 3).unwrap();
        assert_ne!(id, fresh);
        assert!(registry.resolve(id).is_none());
        assert_eq!(registry.with_store("gone", |s| s.count()).unwrap(), 3);
    }

    #[test]
    fn unknown_store() {
        let registry = StoreRegistry::new();
        assert!(matches!(
            registry.with_store("nope", |_| ()),
            Err(PixError::UnknownStore(n)) if n == "nope"
        ));
    }

    #[test]
    fn clones_share_bindings() {
        let registry = StoreRegistry::new();
        let other = registry.clone();
        registry.create(Some("shared"), 1).unwrap();
        assert_eq!(other.names(), vec!["shared".to_string()]);
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn stores_are_usable_across_threads() {
        let registry = StoreRegistry::new();
        registry.create(Some("mt"), 4).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let img =
                        gem_core::PixelImage::blank(1, 1, gem_core::PixelFormat::Luminance)
                            .unwrap();
                    registry
                        .with_store("mt", |s| s.put(i, Some(&img)))
                        .unwrap()
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(registry.with_store("mt", |s| s.occupied()).unwrap(), 4);
    }
}
