//! Defensive access layer over the shared map surface.
//!
//! The map owner initialises, replaces, and tears down the surface on its
//! own schedule, so callers must never assume one is installed. [`MapAccess`]
//! mediates every read and write: it re-fetches the current handle from its
//! provider on each call (never memoising), fails safe with
//! [`MapUnavailable`] when none is installed, and logs a diagnostic so
//! operators can see suppressed operations. Faults raised *inside* a guarded
//! operation are deliberately not contained; the guard only protects against
//! a missing surface.

use std::sync::Arc;
use std::sync::PoisonError;

use tracing::debug;

use crate::domain::map::{Layer, LayerId, MapHandle, MapSurface};
use crate::domain::ports::MapProvider;

/// The shared map surface is not currently installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("map surface is not available")]
pub struct MapUnavailable;

/// Outcome of an idempotent add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerChange {
    /// The membership changed.
    Applied,
    /// The surface was already in the requested state.
    Unchanged,
}

impl LayerChange {
    /// Whether the operation mutated the surface.
    pub fn occurred(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Outcome of a toggle; exactly one of the two always happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerToggle {
    /// The layer was absent and has been added.
    Added,
    /// The layer was present and has been removed.
    Removed,
}

/// Guarded accessor for the shared map surface.
///
/// The provider capability is injected at construction, so the guard is
/// decoupled from any particular owner. Cloning is cheap; clones observe the
/// same provider.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::ports::FixtureMapProvider;
/// use backend::domain::{Layer, LayerId, LayerKind, MapAccess};
///
/// let guard = MapAccess::new(Arc::new(FixtureMapProvider::installed()));
/// let layer = Layer::new(LayerId::new("inn").unwrap(), LayerKind::Marker);
/// assert!(guard.add_layer(layer).unwrap().occurred());
/// ```
#[derive(Clone)]
pub struct MapAccess {
    provider: Arc<dyn MapProvider>,
}

impl MapAccess {
    /// Build a guard over the given provider capability.
    pub fn new(provider: Arc<dyn MapProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the current handle from the provider.
    ///
    /// Always re-fetches; the owner may have replaced the surface since the
    /// last call.
    pub fn handle(&self) -> Option<MapHandle> {
        self.provider.current()
    }

    /// Whether a surface is currently installed.
    pub fn is_available(&self) -> bool {
        self.handle().is_some()
    }

    /// Run `op` against the current surface.
    ///
    /// When no surface is installed, `context` is logged at debug level and
    /// `op` is never invoked. Panics inside `op` propagate to the caller
    /// unchanged; this guard contains only the missing-surface case.
    pub fn with_surface<T>(
        &self,
        context: &str,
        op: impl FnOnce(&mut MapSurface) -> T,
    ) -> Result<T, MapUnavailable> {
        let Some(handle) = self.handle() else {
            debug!(context, "map surface unavailable; operation skipped");
            return Err(MapUnavailable);
        };
        // A poisoned lock still holds a valid membership set; recover rather
        // than propagate the panic of an unrelated holder.
        let mut surface = handle.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(op(&mut surface))
    }

    /// Add `layer` unless a layer with its id is already composed.
    pub fn add_layer(&self, layer: Layer) -> Result<LayerChange, MapUnavailable> {
        self.with_surface("add layer", |surface| {
            if surface.insert(layer) {
                LayerChange::Applied
            } else {
                LayerChange::Unchanged
            }
        })
    }

    /// Remove the layer with this id if it is composed.
    pub fn remove_layer(&self, id: &LayerId) -> Result<LayerChange, MapUnavailable> {
        self.with_surface("remove layer", |surface| {
            if surface.remove(id) {
                LayerChange::Applied
            } else {
                LayerChange::Unchanged
            }
        })
    }

    /// Remove the layer if present, otherwise add it. Never both in one call.
    pub fn toggle_layer(&self, layer: Layer) -> Result<LayerToggle, MapUnavailable> {
        self.with_surface("toggle layer", |surface| {
            if surface.remove(layer.id()) {
                LayerToggle::Removed
            } else {
                surface.insert(layer);
                LayerToggle::Added
            }
        })
    }

    /// Snapshot of the composed layers, ordered by id.
    pub fn snapshot(&self) -> Result<Vec<Layer>, MapUnavailable> {
        self.with_surface("snapshot layers", |surface| surface.snapshot())
    }
}
