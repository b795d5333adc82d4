//! Generation state of one bill form.
//!
//! Every generation attempt gets an [`AttemptToken`]. Only the holder of the
//! current token may move the state; a poll chain whose token went stale
//! (newer attempt, or the request was edited) becomes a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use billgen_core::BillId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptToken(u64);

impl AttemptToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for AttemptToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollState {
    /// No outstanding request.
    #[default]
    Idle,
    Submitting,
    Polling { bill_id: BillId },
    /// Generation finished; `download` is the relative PDF reference.
    Ready { bill_id: BillId, download: String },
    Failed { bill_id: Option<BillId>, reason: String },
}

/// `PollState` without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollPhase {
    Idle,
    Submitting,
    Polling,
    Ready,
    Failed,
}

impl PollPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollPhase::Idle => "Idle",
            PollPhase::Submitting => "Submitting",
            PollPhase::Polling => "Polling",
            PollPhase::Ready => "Ready",
            PollPhase::Failed => "Failed",
        }
    }
}

impl PollState {
    pub fn phase(&self) -> PollPhase {
        match self {
            PollState::Idle => PollPhase::Idle,
            PollState::Submitting => PollPhase::Submitting,
            PollState::Polling { .. } => PollPhase::Polling,
            PollState::Ready { .. } => PollPhase::Ready,
            PollState::Failed { .. } => PollPhase::Failed,
        }
    }

    pub fn bill_id(&self) -> Option<BillId> {
        match self {
            PollState::Polling { bill_id } | PollState::Ready { bill_id, .. } => Some(*bill_id),
            PollState::Failed { bill_id, .. } => *bill_id,
            PollState::Idle | PollState::Submitting => None,
        }
    }

    /// States whose result depends on the request content at submit time.
    fn tracks_request(&self) -> bool {
        matches!(
            self,
            PollState::Submitting | PollState::Polling { .. } | PollState::Ready { .. }
        )
    }
}

/// Result of a guarded state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// Token is current but the state was already `next`.
    Unchanged,
    /// Token is no longer current; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
struct Inner {
    attempt: u64,
    state: PollState,
}

/// Shared handle to a form's generation state. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct GenerationSession {
    inner: Arc<Mutex<Inner>>,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> PollState {
        self.lock().state.clone()
    }

    /// Download reference when the current attempt is `Ready`.
    pub fn download(&self) -> Option<String> {
        match &self.lock().state {
            PollState::Ready { download, .. } => Some(download.clone()),
            _ => None,
        }
    }

    /// Start a new attempt. Any earlier attempt becomes stale.
    pub fn begin(&self) -> AttemptToken {
        let mut inner = self.lock();
        inner.attempt += 1;
        inner.state = PollState::Submitting;
        AttemptToken(inner.attempt)
    }

    pub fn is_current(&self, token: AttemptToken) -> bool {
        self.lock().attempt == token.0
    }

    /// Move to `next` if `token` is still the current attempt.
    pub fn transition(&self, token: AttemptToken, next: PollState) -> Transition {
        let mut inner = self.lock();
        if inner.attempt != token.0 {
            return Transition::Stale;
        }
        if inner.state == next {
            return Transition::Unchanged;
        }
        inner.state = next;
        Transition::Applied
    }

    /// The request changed: drop any in-flight or finished result.
    ///
    /// Returns `true` if something was discarded.
    pub fn invalidate(&self) -> bool {
        let mut inner = self.lock();
        if !inner.state.tracks_request() {
            return false;
        }
        inner.attempt += 1;
        inner.state = PollState::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let session = GenerationSession::new();
        assert_eq!(session.state(), PollState::Idle);
        assert_eq!(session.download(), None);
    }

    #[test]
    fn begin_supersedes_previous_attempt() {
        let session = GenerationSession::new();
        let first = session.begin();
        let second = session.begin();

        assert!(!session.is_current(first));
        assert!(session.is_current(second));
        assert_eq!(
            session.transition(first, PollState::Polling { bill_id: BillId::new(1) }),
            Transition::Stale
        );
        assert_eq!(session.state(), PollState::Submitting);
    }

    #[test]
    fn transition_reports_unchanged() {
        let session = GenerationSession::new();
        let token = session.begin();
        let polling = PollState::Polling { bill_id: BillId::new(1) };
        assert_eq!(session.transition(token, polling.clone()), Transition::Applied);
        assert_eq!(session.transition(token, polling), Transition::Unchanged);
    }

    #[test]
    fn invalidate_discards_ready_result() {
        let session = GenerationSession::new();
        let token = session.begin();
        let ready = PollState::Ready {
            bill_id: BillId::new(42),
            download: "/api/bills/42/download".to_string(),
        };
        session.transition(token, ready);
        assert_eq!(session.download().as_deref(), Some("/api/bills/42/download"));

        assert!(session.invalidate());
        assert_eq!(session.state(), PollState::Idle);
        assert_eq!(session.state().bill_id(), None);
        assert!(!session.is_current(token));
    }

    #[test]
    fn invalidate_leaves_idle_and_failed_alone() {
        let session = GenerationSession::new();
        assert!(!session.invalidate());

        let token = session.begin();
        let failed = PollState::Failed {
            bill_id: Some(BillId::new(3)),
            reason: "render failed".to_string(),
        };
        session.transition(token, failed.clone());
        assert!(!session.invalidate());
        assert_eq!(session.state(), failed);
        assert!(session.is_current(token));
    }

    #[test]
    fn phases_and_ids() {
        let state = PollState::Polling { bill_id: BillId::new(9) };
        assert_eq!(state.phase(), PollPhase::Polling);
        assert_eq!(state.phase().as_str(), "Polling");
        assert_eq!(state.bill_id(), Some(BillId::new(9)));
        assert_eq!(PollState::Submitting.bill_id(), None);
    }
}
