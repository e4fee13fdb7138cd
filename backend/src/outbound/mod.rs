//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations; they contain no business logic.
//!
//! - **registry**: JSON-file-backed user directory.
//! - **map_owner**: process-wide owner of the shared map surface.

pub mod map_owner;
pub mod registry;

pub use map_owner::MapOwner;
pub use registry::{FileUserDirectory, RegistryError};
