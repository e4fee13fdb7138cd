//! Process-wide owner of the shared map surface.
//!
//! The owner's lifecycle is independent of the guard's: a surface may be
//! installed after guards are constructed, replaced on re-initialisation, or
//! cleared during teardown. Guards therefore hold the owner only through the
//! [`MapProvider`] port and re-fetch the handle on every operation.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::domain::ports::MapProvider;
use crate::domain::{MapHandle, MapSurface};

/// Owns the currently installed map surface, if any.
#[derive(Default)]
pub struct MapOwner {
    current: RwLock<Option<MapHandle>>,
}

impl MapOwner {
    /// Create an owner with no surface installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the surface, returning its handle.
    ///
    /// Existing guards observe the replacement on their next operation;
    /// callers still holding the previous handle keep a detached surface.
    pub fn install(&self, surface: MapSurface) -> MapHandle {
        let handle: MapHandle = Arc::new(Mutex::new(surface));
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = Some(handle.clone());
        handle
    }

    /// Remove the installed surface; subsequent guard operations fail safe.
    pub fn clear(&self) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = None;
    }
}

impl MapProvider for MapOwner {
    fn current(&self) -> Option<MapHandle> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Layer, LayerId, LayerKind, MapAccess, MapUnavailable};

    fn layer(id: &str) -> Layer {
        Layer::new(LayerId::new(id).expect("valid id"), LayerKind::Marker)
    }

    #[test]
    fn guard_observes_late_installation() {
        let owner = Arc::new(MapOwner::new());
        let guard = MapAccess::new(owner.clone());

        assert_eq!(guard.add_layer(layer("inn")), Err(MapUnavailable));

        owner.install(MapSurface::new());
        assert!(guard.add_layer(layer("inn")).expect("map installed").occurred());
    }

    #[test]
    fn guard_observes_replacement() {
        let owner = Arc::new(MapOwner::new());
        let guard = MapAccess::new(owner.clone());

        owner.install(MapSurface::new());
        guard.add_layer(layer("inn")).expect("map installed");

        // A fresh surface starts empty; the old membership is gone.
        owner.install(MapSurface::new());
        let layers = guard.snapshot().expect("map installed");
        assert!(layers.is_empty());
    }

    #[test]
    fn clear_makes_operations_fail_safe() {
        let owner = Arc::new(MapOwner::new());
        let guard = MapAccess::new(owner.clone());

        owner.install(MapSurface::new());
        assert!(guard.is_available());

        owner.clear();
        assert!(!guard.is_available());
        assert_eq!(guard.snapshot(), Err(MapUnavailable));
    }
}
