use cpark_domain::config::{ApiConfig, DatabaseConfig, MailerConfig, RegistrationConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4590);
    assert!(server.ssl.is_none());
    assert!(server.cors_origin.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "cpark");
    assert_eq!(db.database, "core");
    assert!(db.credentials.is_some());

    let mailer = MailerConfig::default();
    assert_eq!(mailer.port, 587);
    assert_eq!(mailer.send_timeout_secs, 10);

    let registration = RegistrationConfig::default();
    assert!(!registration.expose_verification_link);
    assert_eq!(registration.frontend_url, "http://localhost:3000");
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080, "cors_origin": "http://localhost:5173" },
        "database": { "url": "mem://", "namespace": "n", "database": "d", "credentials": null },
        "registration": {
            "admin_secret": "s3cret",
            "frontend_url": "https://parking.campus.edu",
            "expose_verification_link": true
        }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.cors_origin.as_deref(), Some("http://localhost:5173"));
    assert_eq!(cfg.database.namespace, "n");
    assert!(cfg.database.credentials.is_none());
    assert_eq!(cfg.registration.admin_secret, "s3cret");
    assert!(cfg.registration.expose_verification_link);
    // Unspecified sections fall back to defaults.
    assert_eq!(cfg.mailer.port, 587);
}
