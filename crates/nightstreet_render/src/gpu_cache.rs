//! GPU resource cache keyed by scene resource identity
//!
//! Each entry holds a weak reference to the scene-side resource it was built
//! from. Once the last strong reference in the scene is gone, [`ResourceCache::sweep`]
//! drops the GPU side as well.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use nightstreet_core::ResourceId;

struct Entry<S, G> {
    source: Weak<S>,
    value: G,
}

/// Map from scene resource to the GPU object built for it
pub struct ResourceCache<S, G> {
    entries: HashMap<ResourceId, Entry<S, G>>,
}

impl<S, G> Default for ResourceCache<S, G> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<S, G> ResourceCache<S, G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `id`, building it on first use
    pub fn get_or_insert_with(&mut self, id: ResourceId, source: &Rc<S>, build: impl FnOnce() -> G) -> &mut G {
        &mut self
            .entries
            .entry(id)
            .or_insert_with(|| Entry {
                source: Rc::downgrade(source),
                value: build(),
            })
            .value
    }

    pub fn get(&self, id: ResourceId) -> Option<&G> {
        self.entries.get(&id).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut G> {
        self.entries.get_mut(&id).map(|e| &mut e.value)
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drop entries whose scene resource no longer exists; returns how many
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.source.strong_count() > 0);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Source {
        id: ResourceId,
    }

    fn source() -> Rc<Source> {
        Rc::new(Source { id: ResourceId::next() })
    }

    #[test]
    fn test_builds_once() {
        let mut cache: ResourceCache<Source, u32> = ResourceCache::new();
        let s = source();
        let mut builds = 0;
        for _ in 0..3 {
            cache.get_or_insert_with(s.id, &s, || {
                builds += 1;
                7
            });
        }
        assert_eq!(builds, 1);
        assert_eq!(cache.get(s.id), Some(&7));
    }

    #[test]
    fn test_sweep_drops_released_resources() {
        let mut cache: ResourceCache<Source, &'static str> = ResourceCache::new();
        let kept = source();
        let dropped = source();
        let dropped_id = dropped.id;
        cache.get_or_insert_with(kept.id, &kept, || "kept");
        cache.get_or_insert_with(dropped_id, &dropped, || "dropped");

        assert_eq!(cache.sweep(), 0);
        drop(dropped);
        assert_eq!(cache.sweep(), 1);
        assert!(cache.contains(kept.id));
        assert!(!cache.contains(dropped_id));
    }

    #[test]
    fn test_shared_source_survives_until_last_clone() {
        let mut cache: ResourceCache<Source, ()> = ResourceCache::new();
        let s = source();
        let id = s.id;
        let clone = s.clone();
        cache.get_or_insert_with(id, &s, || ());
        drop(s);
        assert_eq!(cache.sweep(), 0);
        drop(clone);
        assert_eq!(cache.sweep(), 1);
        assert!(cache.is_empty());
    }
}
