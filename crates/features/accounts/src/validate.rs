use crate::error::AccountsError;
use crate::model::RegisterRequest;
use cpark_domain::config::RegistrationConfig;

const MIN_PASSWORD_LEN: usize = 6;

/// Fail-fast request validation, in contract order:
/// required fields, email shape, password strength, admin secret.
///
/// Nothing is mutated before this returns `Ok`.
pub(crate) fn validate(
    request: &RegisterRequest,
    config: &RegistrationConfig,
) -> Result<(), AccountsError> {
    let required = [
        &request.first_name,
        &request.last_name,
        &request.email,
        &request.password,
        &request.student_id,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(AccountsError::Validation {
            message: "Please provide all required fields".into(),
        });
    }

    if !email_shape_ok(&request.email) {
        return Err(AccountsError::Validation {
            message: "Please provide a valid email address".into(),
        });
    }

    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AccountsError::Validation {
            message: "Password must be at least 6 characters long".into(),
        });
    }

    // Role gating happens on the raw selector string; only the exact value
    // "admin" requests elevation.
    if request.role.as_deref() == Some("admin")
        && request.secret_code.as_deref() != Some(config.admin_secret.as_str())
    {
        return Err(AccountsError::Authorization { message: "Invalid admin secret code".into() });
    }

    Ok(())
}

/// Checks the `local@domain.tld` shape: a non-space run, `@`, a non-space run
/// containing an interior dot. The check is a containment test, matching the
/// SPA's client-side rule.
pub(crate) fn email_shape_ok(email: &str) -> bool {
    let chars: Vec<char> = email.chars().collect();
    (1..chars.len()).any(|at| {
        if chars[at] != '@' || chars[at - 1].is_whitespace() {
            return false;
        }
        let run: Vec<char> =
            chars[at + 1..].iter().copied().take_while(|c| !c.is_whitespace()).collect();
        run.iter().enumerate().any(|(i, &c)| c == '.' && i >= 1 && i + 1 < run.len())
    })
}

/// Lower-cases and trims an email for lookup, storage, and response use.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            email: "jane@example.com".to_owned(),
            password: "abcdef".to_owned(),
            student_id: "04-2324-0001".to_owned(),
            role: Some("student".to_owned()),
            secret_code: None,
            department: None,
            course: None,
        }
    }

    fn config() -> RegistrationConfig {
        RegistrationConfig { admin_secret: "topsecret".to_owned(), ..Default::default() }
    }

    #[test]
    fn accepts_a_complete_request() {
        assert!(validate(&request(), &config()).is_ok());
    }

    #[test]
    fn rejects_blank_required_fields() {
        let mutations: [fn(&mut RegisterRequest); 5] = [
            |r| r.first_name = "  ".to_owned(),
            |r| r.last_name = String::new(),
            |r| r.email = String::new(),
            |r| r.password = String::new(),
            |r| r.student_id = "\t".to_owned(),
        ];

        for mutate in mutations {
            let mut req = request();
            mutate(&mut req);
            let err = validate(&req, &config()).unwrap_err();
            assert!(matches!(err, AccountsError::Validation { .. }), "{req:?}");
        }
    }

    #[test]
    fn rejects_short_password() {
        let mut req = request();
        req.password = "abcde".to_owned();
        assert!(matches!(
            validate(&req, &config()).unwrap_err(),
            AccountsError::Validation { .. }
        ));
    }

    #[test]
    fn admin_role_requires_matching_secret() {
        let mut req = request();
        req.role = Some("admin".to_owned());
        req.secret_code = Some("wrong".to_owned());
        assert!(matches!(
            validate(&req, &config()).unwrap_err(),
            AccountsError::Authorization { .. }
        ));

        req.secret_code = None;
        assert!(matches!(
            validate(&req, &config()).unwrap_err(),
            AccountsError::Authorization { .. }
        ));

        req.secret_code = Some("topsecret".to_owned());
        assert!(validate(&req, &config()).is_ok());
    }

    #[test]
    fn non_admin_roles_ignore_the_secret() {
        let mut req = request();
        req.role = Some("faculty".to_owned());
        req.secret_code = Some("wrong".to_owned());
        assert!(validate(&req, &config()).is_ok());

        // Case-sensitive: "Admin" is not an elevation request.
        req.role = Some("Admin".to_owned());
        req.secret_code = None;
        assert!(validate(&req, &config()).is_ok());
    }

    #[test]
    fn email_shapes() {
        assert!(email_shape_ok("jane@example.com"));
        assert!(email_shape_ok("a@b.c"));
        assert!(!email_shape_ok("plainaddress"));
        assert!(!email_shape_ok("missing@tld"));
        assert!(!email_shape_ok("@example.com"));
        assert!(!email_shape_ok("jane@example."));
        assert!(!email_shape_ok("jane @example.com"));
    }

    #[test]
    fn normalization_lowercases_and_trims() {
        assert_eq!(normalize_email("  JANE@EXAMPLE.com "), "jane@example.com");
    }

    proptest! {
        /// Anything without an '@' can never pass the shape check.
        #[test]
        fn no_at_sign_never_validates(s in "[^@]*") {
            prop_assert!(!email_shape_ok(&s));
        }

        /// A well-formed local@domain.tld always passes.
        #[test]
        fn simple_addresses_validate(local in "[a-z0-9]{1,16}", host in "[a-z0-9]{1,16}", tld in "[a-z]{2,6}") {
            let email = format!("{local}@{host}.{tld}");
            prop_assert!(email_shape_ok(&email));
        }
    }
}
