pub mod mock_mailer;
pub mod mock_reminder_store;

pub use mock_mailer::MockMailer;
pub use mock_reminder_store::MockReminderStore;
