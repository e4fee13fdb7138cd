//! Domain ports for the hexagonal boundary.

mod login_service;
mod map_provider;
mod user_directory;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use map_provider::MockMapProvider;
pub use map_provider::{FixtureMapProvider, MapProvider};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory};
