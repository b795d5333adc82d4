//! `billgen-generator`
//!
//! **Responsibility:** drive bill generation from an editable bill request.
//!
//! This crate provides:
//! - The per-form generation session and its attempt tokens (`session`)
//! - The submit-then-poll loop (`poller`)
//! - User-facing notifications (`notify`)
//! - The editable bill form that ties them together (`form`)

pub mod form;
pub mod notify;
pub mod poller;
pub mod session;

pub use form::{BillForm, GenerationTask};
pub use notify::{LogNotifier, Notification, NotificationLevel, NotificationLog, Notifier};
pub use poller::{GenerationOutcome, GenerationPoller, PollConfig};
pub use session::{AttemptToken, GenerationSession, PollPhase, PollState};

#[cfg(test)]
mod testing;
