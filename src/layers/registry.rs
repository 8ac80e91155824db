use crate::layers::base::Layer;
use std::sync::{Arc, Mutex, PoisonError};

/// An ordered, concurrently readable collection of layers.
///
/// Mutation is copy-on-write: `add` and `remove` build a new list and swap
/// it in under a short lock, so a [`snapshot`](LayerRegistry::snapshot)
/// obtained by the render worker is never invalidated by concurrent
/// changes. Callers need no synchronization of their own.
///
/// Layers are keyed by identity (`Arc::ptr_eq`), and insertion order is the
/// draw order.
pub struct LayerRegistry {
    inner: Mutex<Arc<Vec<Arc<dyn Layer>>>>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Arc::new(Vec::new())),
        }
    }

    /// Appends a layer at the end of the draw order
    pub fn add(&self, layer: Arc<dyn Layer>) {
        let mut guard = self.lock();
        let mut layers = guard.as_ref().clone();
        layers.push(layer);
        *guard = Arc::new(layers);
    }

    /// Removes a layer by identity. Returns true if it was registered.
    ///
    /// Snapshots handed out before the removal still contain the layer;
    /// the change takes effect from the next snapshot on.
    pub fn remove(&self, layer: &Arc<dyn Layer>) -> bool {
        let mut guard = self.lock();
        let mut layers = guard.as_ref().clone();
        let before = layers.len();
        layers.retain(|entry| !Arc::ptr_eq(entry, layer));
        let removed = layers.len() != before;
        if removed {
            *guard = Arc::new(layers);
        }
        removed
    }

    /// Returns the current layer list for iteration.
    ///
    /// The snapshot is immutable; concurrent `add`/`remove` calls replace
    /// the registry's list without touching snapshots already handed out.
    pub fn snapshot(&self) -> Arc<Vec<Arc<dyn Layer>>> {
        self.lock().clone()
    }

    /// Empties the registry and returns the removed layers in registration
    /// order. Used by the scheduler for one-time teardown.
    pub fn take_all(&self) -> Vec<Arc<dyn Layer>> {
        let mut guard = self.lock();
        let layers = std::mem::replace(&mut *guard, Arc::new(Vec::new()));
        layers.as_ref().clone()
    }

    /// Gets the number of registered layers
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Checks if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Arc<Vec<Arc<dyn Layer>>>> {
        // A poisoned lock only means another thread panicked mid-swap; the
        // list itself is always a complete Arc, so recover it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{BoundingBox, Point};
    use crate::render::canvas::Canvas;
    use crate::Result;

    struct NamedLayer(&'static str);

    impl Layer for NamedLayer {
        fn draw(
            &self,
            _bounds: &BoundingBox,
            _zoom: u8,
            _canvas: &mut dyn Canvas,
            _top_left: Point,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_add_preserves_order() {
        let registry = LayerRegistry::new();
        let a: Arc<dyn Layer> = Arc::new(NamedLayer("a"));
        let b: Arc<dyn Layer> = Arc::new(NamedLayer("b"));
        registry.add(a.clone());
        registry.add(b.clone());

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(Arc::ptr_eq(&snapshot[0], &a));
        assert!(Arc::ptr_eq(&snapshot[1], &b));
    }

    #[test]
    fn test_remove_by_identity() {
        let registry = LayerRegistry::new();
        let a: Arc<dyn Layer> = Arc::new(NamedLayer("a"));
        let other: Arc<dyn Layer> = Arc::new(NamedLayer("a"));
        registry.add(a.clone());

        // A different layer with equal content is not the same entry.
        assert!(!registry.remove(&other));
        assert!(registry.remove(&a));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_unaffected_by_later_mutation() {
        let registry = LayerRegistry::new();
        let a: Arc<dyn Layer> = Arc::new(NamedLayer("a"));
        let b: Arc<dyn Layer> = Arc::new(NamedLayer("b"));
        registry.add(a.clone());
        registry.add(b.clone());

        let snapshot = registry.snapshot();
        registry.remove(&b);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn test_take_all_drains_once() {
        let registry = LayerRegistry::new();
        registry.add(Arc::new(NamedLayer("a")));
        registry.add(Arc::new(NamedLayer("b")));

        assert_eq!(registry.take_all().len(), 2);
        assert!(registry.take_all().is_empty());
    }
}
