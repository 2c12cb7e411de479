//! Shared string constants used across slices and the OpenAPI surface.

/// OpenAPI tag for system endpoints (health, docs).
pub const SYSTEM_TAG: &str = "system";
/// OpenAPI tag for authentication/registration endpoints.
pub const AUTH_TAG: &str = "auth";
