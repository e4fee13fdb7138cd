//! Driven port supplying the shared map handle.

use std::sync::{Arc, Mutex};

use crate::domain::map::{MapHandle, MapSurface};

/// Capability for fetching the current map handle.
///
/// Implementors own (or reach) the surface lifecycle; the guard calls
/// [`MapProvider::current`] on every operation so a replacement surface is
/// always observed. Returning `None` means no surface is installed right
/// now — an expected, transient condition.
#[cfg_attr(test, mockall::automock)]
pub trait MapProvider: Send + Sync {
    /// The currently installed handle, if any.
    fn current(&self) -> Option<MapHandle>;
}

/// Provider with a fixed installation state, for tests and examples.
pub struct FixtureMapProvider {
    handle: Option<MapHandle>,
}

impl FixtureMapProvider {
    /// A provider holding an empty installed surface.
    pub fn installed() -> Self {
        Self {
            handle: Some(Arc::new(Mutex::new(MapSurface::new()))),
        }
    }

    /// A provider with no surface installed.
    pub fn absent() -> Self {
        Self { handle: None }
    }
}

impl MapProvider for FixtureMapProvider {
    fn current(&self) -> Option<MapHandle> {
        self.handle.clone()
    }
}
