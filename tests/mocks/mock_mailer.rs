use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use vehicle_vault::services::email_service::{Mailer, OutgoingEmail};
use vehicle_vault::utils::errors::AppError;

/// Records every message; recipients in `failing` get an SMTP-style error.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

#[allow(dead_code)]
impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent().into_iter().map(|e| e.to).collect()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        if self.failing.lock().unwrap().contains(&email.to) {
            return Err(AppError::Email(format!("Error sending to '{}'", email.to)));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}
