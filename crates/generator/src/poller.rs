//! Submit a bill request, then poll the bill until it is ready or failed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use billgen_billing::BillStatus;
use billgen_client::settings::env_or;
use billgen_client::{BillApi, BillRequestDto, download_path};
use billgen_core::BillId;

use crate::notify::{Notification, Notifier};
use crate::session::{AttemptToken, GenerationSession, PollState, Transition};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// About ten minutes at the default interval.
pub const DEFAULT_MAX_CHECKS: u32 = 1200;

/// Poll loop configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two status checks of the same bill.
    pub interval: Duration,
    /// Give up after this many checks; `None` polls until a terminal state.
    pub max_checks: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_checks: Some(DEFAULT_MAX_CHECKS),
        }
    }
}

impl PollConfig {
    /// `BILLGEN_POLL_INTERVAL_MS`, `BILLGEN_POLL_MAX_CHECKS` (`0` = unbounded).
    pub fn from_env() -> Self {
        let interval = env_or("BILLGEN_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL.as_millis() as u64);
        let max_checks = env_or("BILLGEN_POLL_MAX_CHECKS", DEFAULT_MAX_CHECKS);

        Self {
            interval: Duration::from_millis(interval),
            max_checks: (max_checks > 0).then_some(max_checks),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_checks(mut self, max_checks: Option<u32>) -> Self {
        self.max_checks = max_checks;
        self
    }
}

/// How one generation attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Ready { bill_id: BillId, download: String },
    Failed { reason: String },
    /// A newer attempt started or the request changed; results were dropped.
    Superseded,
}

/// Drives `Idle → Submitting → Polling → {Ready, Failed}` for one session.
pub struct GenerationPoller<A: ?Sized, N: ?Sized> {
    api: Arc<A>,
    notifier: Arc<N>,
    session: GenerationSession,
    config: PollConfig,
}

impl<A: ?Sized, N: ?Sized> Clone for GenerationPoller<A, N> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            notifier: Arc::clone(&self.notifier),
            session: self.session.clone(),
            config: self.config.clone(),
        }
    }
}

impl<A, N> GenerationPoller<A, N>
where
    A: BillApi + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(api: Arc<A>, notifier: Arc<N>, session: GenerationSession, config: PollConfig) -> Self {
        Self {
            api,
            notifier,
            session,
            config,
        }
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Start a new attempt and run it to completion.
    pub async fn generate(&self, request: BillRequestDto) -> GenerationOutcome {
        let token = self.session.begin();
        self.run(token, request).await
    }

    /// Run an attempt previously started with [`GenerationSession::begin`].
    pub async fn run(&self, token: AttemptToken, request: BillRequestDto) -> GenerationOutcome {
        if !self.session.is_current(token) {
            return GenerationOutcome::Superseded;
        }
        self.notifier.state_changed(&PollState::Submitting);
        info!(attempt = %token, user = %request.user, "submitting bill");

        let submitted = self.api.submit_bill(&request).await;
        if !self.session.is_current(token) {
            debug!(attempt = %token, "submission result dropped; attempt superseded");
            return GenerationOutcome::Superseded;
        }

        let bill_id = match submitted {
            Ok(id) => id,
            Err(err) => {
                warn!(attempt = %token, error = %err, "bill submission failed");
                let reason = err.user_message();
                let failed = PollState::Failed {
                    bill_id: None,
                    reason: reason.clone(),
                };
                if !self.enter(token, failed) || !self.enter(token, PollState::Idle) {
                    return GenerationOutcome::Superseded;
                }
                self.notifier.notify(Notification::error(reason.clone()));
                return GenerationOutcome::Failed { reason };
            }
        };

        if !self.enter(token, PollState::Polling { bill_id }) {
            return GenerationOutcome::Superseded;
        }
        info!(attempt = %token, %bill_id, "bill accepted; polling");

        let mut checks: u32 = 0;
        loop {
            if self.config.max_checks.is_some_and(|max| checks >= max) {
                return self.fail(token, bill_id, format!("timed out waiting for bill {bill_id}"));
            }
            checks += 1;
            debug!(attempt = %token, %bill_id, checks, "checking bill status");

            let fetched = self.api.get_bill(bill_id).await;
            if !self.session.is_current(token) {
                debug!(attempt = %token, %bill_id, "status dropped; attempt superseded");
                return GenerationOutcome::Superseded;
            }

            match fetched {
                Err(err) => {
                    warn!(attempt = %token, %bill_id, error = %err, "bill status check failed");
                    return self.fail(token, bill_id, err.user_message());
                }
                Ok(bill) => match bill.status() {
                    BillStatus::Failed(message) => {
                        let reason = if message.is_empty() {
                            "Bill generation failed".to_string()
                        } else {
                            message
                        };
                        return self.fail(token, bill_id, reason);
                    }
                    BillStatus::Available => return self.ready(token, bill_id),
                    BillStatus::Pending => {}
                },
            }

            tokio::time::sleep(self.config.interval).await;
            if !self.session.is_current(token) {
                return GenerationOutcome::Superseded;
            }
        }
    }

    /// Apply a guarded transition; `false` when the attempt went stale.
    fn enter(&self, token: AttemptToken, next: PollState) -> bool {
        match self.session.transition(token, next.clone()) {
            Transition::Applied => {
                self.notifier.state_changed(&next);
                true
            }
            Transition::Unchanged => true,
            Transition::Stale => false,
        }
    }

    fn ready(&self, token: AttemptToken, bill_id: BillId) -> GenerationOutcome {
        let download = download_path(bill_id);
        let ready = PollState::Ready {
            bill_id,
            download: download.clone(),
        };
        if !self.enter(token, ready) {
            return GenerationOutcome::Superseded;
        }

        info!(attempt = %token, %bill_id, "bill ready");
        self.notifier.notify(Notification::success("Bill generated successfully"));
        GenerationOutcome::Ready { bill_id, download }
    }

    fn fail(&self, token: AttemptToken, bill_id: BillId, reason: String) -> GenerationOutcome {
        let failed = PollState::Failed {
            bill_id: Some(bill_id),
            reason: reason.clone(),
        };
        if !self.enter(token, failed) {
            return GenerationOutcome::Superseded;
        }

        warn!(attempt = %token, %bill_id, %reason, "bill generation failed");
        self.notifier.notify(Notification::error(reason.clone()));
        GenerationOutcome::Failed { reason }
    }
}
