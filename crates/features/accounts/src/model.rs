use cpark_domain::role::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Incoming registration request body.
///
/// Field names follow the SPA's camelCase contract. Unknown extra fields are
/// tolerated; the front end sends a few presentational ones.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Required fields default to empty so an absent key reports the same
    /// validation error as a blank value.
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// School/student identifier, stored verbatim as the contact id.
    #[serde(default)]
    pub student_id: String,
    /// Requested role selector; unrecognized values map to `student`.
    #[serde(default)]
    pub role: Option<String>,
    /// Required only when requesting the admin role.
    #[serde(default)]
    pub secret_code: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
}

/// The outcome of a successful registration, as seen by the HTTP layer.
///
/// The verification link is always produced here (the mail dispatcher needs
/// it); whether it is echoed to the caller is an operating-mode decision.
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub verification_link: String,
}

/// Event handed to the mail-dispatch queue after the account row exists.
#[derive(Debug, Clone)]
pub struct AccountRegistered {
    pub account_id: String,
    pub email: String,
    pub name: String,
    pub verification_link: String,
}
