//! Accounts feature slice: registration with email verification.
//!
//! The slice owns the full `POST /api/auth/register` flow: fail-fast
//! validation, duplicate-email handling backed by the store's UNIQUE index,
//! Argon2id password hashing, verification-token generation, the single row
//! insert, and the queued verification email.

mod dispatch;
mod error;
mod model;
mod password;
mod routes;
mod service;
mod validate;

pub use crate::dispatch::spawn_mail_dispatcher;
pub use crate::error::AccountsError;
pub use crate::model::{AccountRegistered, RegisterRequest, RegisteredAccount};
pub use crate::password::verify as verify_password;
pub use crate::routes::auth_router;
pub use crate::service::RegistrationService;

use cpark_database::Database;
use cpark_domain::config::ApiConfig;
use cpark_domain::registry::{FeatureSlice, InitializedSlice};
use cpark_events::EventBus;
use std::ops::Deref;
use std::sync::Arc;

/// Accounts feature state.
#[derive(Debug, Clone)]
pub struct AccountsInner {
    pub service: RegistrationService,
}

/// Shared handle registered in the API state.
#[derive(Debug, Clone)]
pub struct Accounts {
    inner: Arc<AccountsInner>,
}

impl Accounts {
    pub fn new(inner: AccountsInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for Accounts {
    type Target = AccountsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FeatureSlice for Accounts {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Initialize the accounts feature.
///
/// The registration service is constructed with its configuration injected
/// here; nothing in the request path reads the environment.
///
/// # Errors
/// Currently infallible, but kept fallible to match the slice contract.
pub fn init(
    config: &ApiConfig,
    db: &Database,
    events: &EventBus,
) -> Result<InitializedSlice, AccountsError> {
    let service =
        RegistrationService::new(config.registration.clone(), db.clone(), events.clone());

    tracing::info!("Accounts server slice initialized");

    let slice = Accounts::new(AccountsInner { service });

    Ok(InitializedSlice::new(slice))
}
