use crate::error::AccountsError;
use crate::model::{AccountRegistered, RegisterRequest, RegisteredAccount};
use crate::password;
use crate::validate::{normalize_email, validate};
use cpark_database::{Database, is_index_conflict};
use cpark_domain::config::RegistrationConfig;
use cpark_domain::role::Role;
use cpark_events::EventBus;
use cpark_kernel::safe_nanoid;
use tracing::{error, instrument, warn};

/// The registration service: validates, enforces uniqueness, persists the
/// account, and hands the verification email to the dispatch queue.
///
/// All configuration is injected at construction; there are no ambient
/// environment lookups in the request path.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    config: RegistrationConfig,
    db: Database,
    events: EventBus,
}

impl RegistrationService {
    #[must_use]
    pub fn new(config: RegistrationConfig, db: Database, events: EventBus) -> Self {
        Self { config, db, events }
    }

    /// Registers a new account.
    ///
    /// Either the account is durably created (and the verification email
    /// queued), or nothing is persisted. Queue or delivery failures never
    /// reverse a created account.
    ///
    /// # Errors
    /// * [`AccountsError::Validation`] for missing/malformed input.
    /// * [`AccountsError::Authorization`] for a bad admin secret.
    /// * [`AccountsError::Conflict`] when the normalized email already exists.
    /// * [`AccountsError::Infrastructure`] when the store fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<RegisteredAccount, AccountsError> {
        validate(&request, &self.config)?;

        let email = normalize_email(&request.email);

        // Friendly fast path; the UNIQUE index below is the authority.
        if self.email_taken(&email).await? {
            return Err(AccountsError::Conflict { message: "Email already registered".into() });
        }

        let id = safe_nanoid!();
        let password_hash = password::hash(&request.password)?;
        let verification_token = generate_token()?;
        let role = request.role.as_deref().map_or(Role::Student, Role::from);
        let name = format!("{} {}", request.first_name.trim(), request.last_name.trim());
        let department = request
            .department
            .clone()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| request.course.clone().filter(|c| !c.trim().is_empty()));

        self.insert_account(InsertAccount {
            id: &id,
            email: &email,
            password_hash: &password_hash,
            name: &name,
            role,
            contact_id: request.student_id.clone(),
            department,
            verification_token: &verification_token,
        })
        .await?;

        let verification_link = format!(
            "{}/verify-email/{verification_token}",
            self.config.frontend_url.trim_end_matches('/')
        );

        // Fire-and-forget: the account exists, so a full queue only costs the
        // email, never the registration.
        let event = AccountRegistered {
            account_id: id.clone(),
            email: email.clone(),
            name: name.clone(),
            verification_link: verification_link.clone(),
        };
        if let Err(err) = self.events.publish_queue(event) {
            warn!(error = %err, %email, "Verification email could not be queued");
        }

        Ok(RegisteredAccount { id, email, name, role, verification_link })
    }

    async fn email_taken(&self, email: &str) -> Result<bool, AccountsError> {
        let taken = self
            .db
            .query("!(SELECT VALUE id FROM account WHERE email = $email).is_empty()")
            .bind(("email", email.to_owned()))
            .await
            .map_err(|e| store_failure("Duplicate pre-check failed", &e))?
            .take::<Option<bool>>(0)
            .map_err(|e| store_failure("Duplicate pre-check failed", &e))?;

        Ok(taken.unwrap_or_default())
    }

    async fn insert_account(&self, account: InsertAccount<'_>) -> Result<(), AccountsError> {
        self.db
            .query(
                "CREATE type::thing('account', $id) CONTENT {
                    email: $email,
                    password_hash: $password_hash,
                    name: $name,
                    role: $role,
                    contact_id: $contact_id,
                    department: $department,
                    email_verified: false,
                    verification_token: $verification_token,
                    is_active: true,
                    created_at: time::now()
                }",
            )
            .bind(("id", account.id.to_owned()))
            .bind(("email", account.email.to_owned()))
            .bind(("password_hash", account.password_hash.to_owned()))
            .bind(("name", account.name.to_owned()))
            .bind(("role", account.role.as_str()))
            .bind(("contact_id", account.contact_id))
            .bind(("department", account.department))
            .bind(("verification_token", account.verification_token.to_owned()))
            .await
            .map_err(|e| store_failure("Account insert failed", &e))?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(|e| {
                // A racing registration can slip past the pre-check; the
                // index violation is the authoritative conflict signal.
                if is_index_conflict(&e) {
                    AccountsError::Conflict { message: "Email already registered".into() }
                } else {
                    store_failure("Account insert failed", &e)
                }
            })?;

        Ok(())
    }
}

/// Borrow-friendly bundle for the single insert statement.
struct InsertAccount<'a> {
    id: &'a str,
    email: &'a str,
    password_hash: &'a str,
    name: &'a str,
    role: Role,
    contact_id: String,
    department: Option<String>,
    verification_token: &'a str,
}

/// Logs store detail server-side and returns the opaque infrastructure error.
fn store_failure(context: &'static str, err: &surrealdb::Error) -> AccountsError {
    error!(error = %err, context, "Account store failure");
    AccountsError::infrastructure(context)
}

fn generate_token() -> Result<String, AccountsError> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes).map_err(AccountsError::infrastructure)?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars_and_unique() {
        let a = generate_token().unwrap();
        let b = generate_token().unwrap();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
