use crate::error::AccountsError;
use crate::model::AccountRegistered;
use cpark_events::EventBus;
use cpark_mailer::{Email, Mailer};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Builds the verification email for a freshly registered account.
fn verification_email(event: &AccountRegistered) -> Email {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px;">
    <h2>Welcome to CampusPark!</h2>
    <p>Hello {name},</p>
    <p>Thank you for registering. Please verify your email address by clicking the link below:</p>
    <a href="{link}" style="display: inline-block; padding: 10px 20px; background-color: #007bff; color: white; text-decoration: none; border-radius: 5px;">Verify Email</a>
    <p>Or copy and paste this link into your browser:</p>
    <p>{link}</p>
    <p>This link will expire in 24 hours.</p>
    <p>If you didn't create this account, please ignore this email.</p>
    <br>
    <p>Best regards,<br>The CampusPark Team</p>
</div>"#,
        name = event.name,
        link = event.verification_link,
    );

    Email { to: event.email.clone(), subject: "Verify Your CampusPark Account".to_owned(), html }
}

/// Spawns the background worker that drains [`AccountRegistered`] events and
/// delivers verification emails.
///
/// Delivery is decoupled from the request/response lifecycle: one attempt per
/// event, bounded by `send_timeout`; failures are logged and dropped. The
/// worker exits when the bus shuts down.
///
/// # Errors
/// Returns [`AccountsError::Infrastructure`] if the queue consumer was
/// already claimed.
pub fn spawn_mail_dispatcher<M>(
    events: &EventBus,
    mailer: M,
    send_timeout: Duration,
    queue_capacity: usize,
) -> Result<JoinHandle<()>, AccountsError>
where
    M: Mailer + Send + Sync + 'static,
{
    let mut rx = events
        .subscribe_queue::<AccountRegistered>(queue_capacity)
        .map_err(AccountsError::infrastructure)?;

    Ok(tokio::spawn(async move {
        info!("Mail dispatcher started");
        while let Some(event) = rx.recv().await {
            let email = verification_email(&event);
            match tokio::time::timeout(send_timeout, mailer.send(email)).await {
                Ok(Ok(())) => {
                    debug!(account_id = %event.account_id, "Verification email delivered");
                },
                Ok(Err(err)) => {
                    error!(error = %err, email = %event.email, "Verification email delivery failed");
                },
                Err(_) => {
                    error!(email = %event.email, timeout = ?send_timeout, "Verification email delivery timed out");
                },
            }
        }
        info!("Mail dispatcher stopped");
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_embeds_name_and_link() {
        let event = AccountRegistered {
            account_id: "a1".to_owned(),
            email: "jane@example.com".to_owned(),
            name: "Jane Doe".to_owned(),
            verification_link: "http://localhost:3000/verify-email/abc123".to_owned(),
        };

        let email = verification_email(&event);
        assert_eq!(email.to, "jane@example.com");
        assert_eq!(email.subject, "Verify Your CampusPark Account");
        assert!(email.html.contains("Hello Jane Doe,"));
        assert!(email.html.contains("http://localhost:3000/verify-email/abc123"));
    }
}
