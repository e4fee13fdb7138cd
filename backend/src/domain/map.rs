//! Campaign map overlay model.
//!
//! The map surface tracks which overlays are composed onto the shared map.
//! Rendering data (coordinates, icons, curve geometry) stays with the
//! front-end rendering engine; the backend only owns overlay identity and
//! membership.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shared, mutable reference to the surface currently installed by the map
/// owner. Consumers must re-fetch it from the owner rather than caching it,
/// since the owner may replace the surface at any time.
pub type MapHandle = Arc<Mutex<MapSurface>>;

/// Validation errors returned by the overlay newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapValidationError {
    /// Layer identifier was missing or blank.
    EmptyLayerId,
    /// Layer identifier exceeds the allowed length.
    LayerIdTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Layer identifier is not a lowercase slug.
    LayerIdInvalidCharacters,
}

impl fmt::Display for MapValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLayerId => write!(f, "layer id must not be empty"),
            Self::LayerIdTooLong { max } => {
                write!(f, "layer id must be at most {max} characters")
            }
            Self::LayerIdInvalidCharacters => write!(
                f,
                "layer id must be a lowercase slug of letters, numbers, dashes, or underscores",
            ),
        }
    }
}

impl std::error::Error for MapValidationError {}

/// Maximum allowed length for a layer identifier.
pub const LAYER_ID_MAX: usize = 64;

static LAYER_ID_RE: OnceLock<Regex> = OnceLock::new();

fn layer_id_regex() -> &'static Regex {
    LAYER_ID_RE.get_or_init(|| {
        let pattern = "^[a-z0-9][a-z0-9_-]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("layer id regex failed to compile: {error}"))
    })
}

/// Stable identifier for an overlay, e.g. `kingdom-borders`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LayerId(String);

impl LayerId {
    /// Validate and construct a [`LayerId`].
    pub fn new(id: impl Into<String>) -> Result<Self, MapValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(MapValidationError::EmptyLayerId);
        }
        if id.chars().count() > LAYER_ID_MAX {
            return Err(MapValidationError::LayerIdTooLong { max: LAYER_ID_MAX });
        }
        if !layer_id_regex().is_match(&id) {
            return Err(MapValidationError::LayerIdInvalidCharacters);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for LayerId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LayerId> for String {
    fn from(value: LayerId) -> Self {
        value.0
    }
}

impl TryFrom<String> for LayerId {
    type Error = MapValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Kind of overlay composed onto the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    /// A georeferenced image draped over the base map.
    ImageOverlay,
    /// A curve tracing a journey between locations.
    JourneyPath,
    /// A point of interest.
    Marker,
}

/// A discrete overlay addable to or removable from the map surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[schema(value_type = String, example = "kingdom-borders")]
    id: LayerId,
    kind: LayerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Kingdom borders")]
    label: Option<String>,
}

impl Layer {
    /// Build a layer from a validated identifier and kind.
    pub fn new(id: LayerId, kind: LayerKind) -> Self {
        Self {
            id,
            kind,
            label: None,
        }
    }

    /// Attach a presentation label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Overlay identifier.
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    /// Overlay kind.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Presentation label, when set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Overlay membership of the shared map.
///
/// Mutations are idempotent: inserting a layer whose id is already present
/// or removing an absent one reports that nothing changed rather than
/// failing.
#[derive(Debug, Default)]
pub struct MapSurface {
    layers: BTreeMap<LayerId, Layer>,
}

impl MapSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a layer with this id is currently composed.
    pub fn contains(&self, id: &LayerId) -> bool {
        self.layers.contains_key(id)
    }

    /// Insert a layer; returns `false` when the id was already present (the
    /// existing layer is left untouched).
    pub fn insert(&mut self, layer: Layer) -> bool {
        if self.layers.contains_key(layer.id()) {
            return false;
        }
        self.layers.insert(layer.id().clone(), layer);
        true
    }

    /// Remove a layer; returns `false` when no layer with this id exists.
    pub fn remove(&mut self, id: &LayerId) -> bool {
        self.layers.remove(id).is_some()
    }

    /// Number of composed layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layers are composed.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Snapshot of the composed layers, ordered by id.
    pub fn snapshot(&self) -> Vec<Layer> {
        self.layers.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn layer(id: &str) -> Layer {
        Layer::new(LayerId::new(id).expect("valid id"), LayerKind::Marker)
    }

    #[rstest]
    #[case("kingdom-borders")]
    #[case("journey_07")]
    #[case("a")]
    fn layer_ids_accept_slugs(#[case] raw: &str) {
        assert!(LayerId::new(raw).is_ok());
    }

    #[rstest]
    #[case("", MapValidationError::EmptyLayerId)]
    #[case("Kingdom", MapValidationError::LayerIdInvalidCharacters)]
    #[case("-leading", MapValidationError::LayerIdInvalidCharacters)]
    #[case("has space", MapValidationError::LayerIdInvalidCharacters)]
    fn layer_ids_reject_invalid_input(#[case] raw: &str, #[case] expected: MapValidationError) {
        let err = LayerId::new(raw).expect_err("invalid id");
        assert_eq!(err, expected);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut surface = MapSurface::new();
        assert!(surface.insert(layer("inn")));
        assert!(!surface.insert(layer("inn")));
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn remove_reports_absence() {
        let mut surface = MapSurface::new();
        let id = LayerId::new("inn").expect("valid id");
        assert!(!surface.remove(&id));
        surface.insert(layer("inn"));
        assert!(surface.remove(&id));
        assert!(surface.is_empty());
    }

    #[test]
    fn snapshot_is_ordered_by_id() {
        let mut surface = MapSurface::new();
        surface.insert(layer("tavern"));
        surface.insert(layer("castle"));
        let ids: Vec<_> = surface
            .snapshot()
            .into_iter()
            .map(|layer| layer.id().to_string())
            .collect();
        assert_eq!(ids, vec!["castle", "tavern"]);
    }

    #[test]
    fn layer_serialises_kebab_case_kind() {
        let value = serde_json::to_value(layer("inn")).expect("serialise layer");
        assert_eq!(
            value,
            serde_json::json!({ "id": "inn", "kind": "marker" })
        );
    }
}
