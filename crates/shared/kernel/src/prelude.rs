//! Convenience re-exports for server-side crates.

pub use crate::config::{ConfigError, load_config};
pub use crate::safe_nanoid;
pub use crate::server::state::{ApiState, ApiStateError};
pub use cpark_domain::config::ApiConfig;
pub use cpark_domain::registry::{FeatureSlice, InitializedSlice};
