//! Facade crate for `CampusPark` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] to register feature slices; extend as new slices appear.

use cpark_database::Database;
pub use cpark_domain as domain;
use cpark_domain::config::ApiConfig;
use cpark_events::EventBus;
pub use cpark_kernel as kernel;

pub mod server {
    pub mod router {
        pub use cpark_accounts::auth_router;
        pub use cpark_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use cpark_accounts as accounts;

    /// Enabled feature slices.
    pub const ENABLED: &[&str] = &["accounts"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    database: &Database,
    events: &EventBus,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let mut slices = Vec::new();

    // Accounts (registration)
    slices.push(features::accounts::init(config, database, events)?);

    Ok(slices)
}
