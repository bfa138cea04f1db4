//! Outbound transactional email
//!
//! `Mailer` is the seam the reminder sweep and the password reset flow send
//! through. `SmtpMailer` relays via SMTP; `LogMailer` only logs and is used
//! when no SMTP relay is configured.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::environment::SmtpConfig;
use crate::utils::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AppError::Email(format!("Invalid SMTP relay '{}': {}", config.host, e)))?
            .credentials(credentials)
            .build();
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("Invalid sender '{}': {}", config.from, e)))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("Invalid recipient '{}': {}", email.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)
            .map_err(|e| AppError::Email(format!("Error building message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(format!("Error sending to '{}': {}", email.to, e)))?;

        Ok(())
    }
}

/// Development mailer: writes the message to the log instead of sending it
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        info!(
            "📧 [no SMTP configured] to={} subject={:?}\n{}",
            email.to, email.subject, email.html
        );
        Ok(())
    }
}

pub fn service_reminder_email(
    to: &str,
    vehicle_name: &str,
    registration_number: &str,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> OutgoingEmail {
    let due_label = due.format("%a %b %d %Y");
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; background-color: #f4f4f4;">
  <h2 style="color: #4CAF50;">🚨 Service Reminder Alert!</h2>
  <p>
    Dear User,<br/><br/>
    This is a friendly reminder that your vehicle <strong>{vehicle_name}</strong>
    (Registration No: <strong>{registration_number}</strong>) is due for its next service on:
  </p>
  <h3 style="color: #2196F3;">{due_label}</h3>
  <p>
    Regular maintenance helps keep your car running smoothly and reliably.<br/>
    Please ensure your vehicle is serviced on or before the due date.
  </p>
  <hr style="border: 0; height: 1px; background-color: #ddd;">
  <p style="font-size: 12px; color: #aaa;">© {year} VehicleVault. All rights reserved.</p>
</div>"#,
        vehicle_name = html_escape(vehicle_name),
        registration_number = html_escape(registration_number),
        due_label = due_label,
        year = now.year(),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: "🚗 Upcoming Vehicle Service Reminder".to_string(),
        html,
    }
}

pub fn password_reset_email(to: &str, reset_url: &str) -> OutgoingEmail {
    let html = format!(
        r#"<p>You requested a password reset for your VehicleVault account.</p>
<p>Click the link below to reset your password. This link is valid for 1 hour.</p>
<a href="{url}">{url}</a>
<p>If you did not request this, you can ignore this email.</p>"#,
        url = html_escape(reset_url),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        html,
    }
}

fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reminder_email_mentions_vehicle_and_due_date() {
        let due = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 6, 0, 0).unwrap();
        let email = service_reminder_email("owner@example.com", "Civic", "AB-123-CD", due, now);

        assert_eq!(email.to, "owner@example.com");
        assert!(email.html.contains("Civic"));
        assert!(email.html.contains("AB-123-CD"));
        assert!(email.html.contains("Thu Feb 15 2024"));
        assert!(email.html.contains("© 2024"));
    }

    #[test]
    fn test_reminder_email_escapes_user_text() {
        let due = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap();
        let email = service_reminder_email("o@example.com", "<b>Van</b>", "X&Y", due, due);

        assert!(email.html.contains("&lt;b&gt;Van&lt;/b&gt;"));
        assert!(email.html.contains("X&amp;Y"));
    }

    #[test]
    fn test_password_reset_email_contains_link() {
        let email = password_reset_email("u@example.com", "http://app/reset-password/tok");
        assert_eq!(email.subject, "Password Reset Request");
        assert!(email.html.contains("href=\"http://app/reset-password/tok\""));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let email = password_reset_email("u@example.com", "http://app/reset-password/tok");
        assert!(LogMailer.send(email).await.is_ok());
    }
}
