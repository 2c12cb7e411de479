use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub mailer: MailerConfig,
    pub registration: RegistrationConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
    /// SPA origin allowed to call the API with credentials, if any.
    pub cors_origin: Option<String>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// `SurrealDB` connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub credentials: Option<DatabaseCredentials>,
}

/// `SurrealDB` root credentials (optional when using unauthenticated engines like mem://).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

/// Outbound SMTP configuration for the notification sender.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// `From` mailbox, e.g. `CampusPark <no-reply@campus-park.app>`.
    pub sender: String,
    /// Upper bound for a single delivery attempt.
    pub send_timeout_secs: u64,
    /// Bound on the in-process dispatch queue.
    pub queue_capacity: usize,
}

/// Registration slice configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Shared secret required to self-register with the admin role.
    pub admin_secret: String,
    /// Base URL of the front end, used to build verification links.
    pub frontend_url: String,
    /// Echo the verification link in the 201 body (never enable in production).
    pub expose_verification_link: bool,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4590,
            ssl: None,
            cors_origin: None,
        }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mem://".to_owned(),
            namespace: "cpark".to_owned(),
            database: "core".to_owned(),
            credentials: Some(DatabaseCredentials::default()),
        }
    }
}

impl Default for DatabaseCredentials {
    fn default() -> Self {
        Self { username: "root".to_owned(), password: "root".to_owned() }
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 587,
            username: String::new(),
            password: String::new(),
            sender: "CampusPark <no-reply@campus-park.app>".to_owned(),
            send_timeout_secs: 10,
            queue_capacity: 128,
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            admin_secret: "dev-only-change-me".to_owned(),
            frontend_url: "http://localhost:3000".to_owned(),
            expose_verification_link: false,
        }
    }
}
