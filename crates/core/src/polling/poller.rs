//! Eventually-consistent poller
//!
//! A session's prompt is generated by the backend after the session is
//! created, so the first read may miss it. The poller performs an immediate
//! read and, while it fails, retries after a fixed delay until the attempt
//! budget is spent. Exhaustion is a state, not an error.
//!
//! Each [`Poller::start`] begins a new generation. Pending timers of older
//! generations are cancelled, and reads that were already in flight are
//! allowed to finish but can no longer publish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use carelink_domain::constants::{POLL_DELAY_MS, POLL_MAX_ATTEMPTS};
use carelink_domain::{CareLinkError, PollingSettings, Result, SituationalSession};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::care::ports::SessionApi;

/// A resource that can be read by id and may not be complete yet.
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// Single-shot read.
    async fn fetch(&self, id: &str) -> Result<Self::Output>;

    /// Whether a successfully read value is complete. Incomplete values count
    /// as failed attempts.
    fn is_ready(&self, _value: &Self::Output) -> bool {
        true
    }
}

/// Reads a session until its generated prompt is present.
pub struct SessionPromptTarget {
    api: Arc<dyn SessionApi>,
}

impl SessionPromptTarget {
    /// Target reading sessions through `api`.
    pub fn new(api: Arc<dyn SessionApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PollTarget for SessionPromptTarget {
    type Output = SituationalSession;

    async fn fetch(&self, id: &str) -> Result<SituationalSession> {
        self.api.get(id).await
    }

    fn is_ready(&self, session: &SituationalSession) -> bool {
        session.has_prompt()
    }
}

/// Poller over situational session prompts
pub type PromptPoller = Poller<SessionPromptTarget>;

/// Attempt budget and delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Total attempts including the immediate one. Values below 1 act as 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { max_attempts: POLL_MAX_ATTEMPTS, delay: Duration::from_millis(POLL_DELAY_MS) }
    }
}

impl From<&PollingSettings> for PollerConfig {
    fn from(settings: &PollingSettings) -> Self {
        Self { max_attempts: settings.max_attempts, delay: settings.delay() }
    }
}

/// Progress of the current poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Idle,
    /// First read in flight.
    Loading,
    Ready,
    /// A read failed and another one is scheduled.
    Retrying,
    /// The attempt budget is spent.
    Exhausted,
    /// The backend rejected the read for good (credential or request); never
    /// retried.
    Failed,
}

impl PollState {
    /// `Ready`, `Exhausted` and `Failed` end a poll.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Exhausted | Self::Failed)
    }
}

/// Value published to poll observers
#[derive(Debug, Clone, PartialEq)]
pub struct PollSnapshot<T> {
    /// Resource being polled. `None` when idle.
    pub id: Option<String>,
    /// Failed attempts so far. Reset to 0 on success.
    pub attempts: u32,
    pub state: PollState,
    /// Latest value read, complete when `Ready`, partial otherwise.
    pub value: Option<T>,
    /// Error from the latest failed read.
    pub error: Option<CareLinkError>,
}

impl<T> Default for PollSnapshot<T> {
    fn default() -> Self {
        Self { id: None, attempts: 0, state: PollState::Idle, value: None, error: None }
    }
}

impl<T> PollSnapshot<T> {
    fn loading(id: &str) -> Self {
        Self { id: Some(id.to_string()), state: PollState::Loading, ..Self::default() }
    }

    /// Outcome of a finished poll; `None` while still in progress.
    pub fn into_result(self) -> Option<Result<T>> {
        match self.state {
            PollState::Ready => Some(
                self.value
                    .ok_or_else(|| CareLinkError::Internal("ready poll without value".into())),
            ),
            PollState::Exhausted => {
                Some(Err(CareLinkError::ExhaustedRetry { attempts: self.attempts }))
            }
            PollState::Failed => Some(Err(self.error.unwrap_or_else(|| {
                CareLinkError::Internal("failed poll without error".into())
            }))),
            PollState::Idle | PollState::Loading | PollState::Retrying => None,
        }
    }
}

struct Shared<P: PollTarget> {
    target: P,
    config: PollerConfig,
    state: watch::Sender<PollSnapshot<P::Output>>,
    generation: AtomicU64,
}

impl<P: PollTarget> Shared<P> {
    /// Publish only while `generation` is still the current one.
    fn publish(&self, generation: u64, snapshot: PollSnapshot<P::Output>) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::Acquire) != generation {
                return false;
            }
            *current = snapshot;
            true
        })
    }
}

struct ActivePoll {
    id: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Bounded-retry poller with observable progress
pub struct Poller<P: PollTarget> {
    shared: Arc<Shared<P>>,
    active: Mutex<Option<ActivePoll>>,
}

impl<P: PollTarget> Poller<P> {
    /// Idle poller for `target`.
    pub fn new(target: P, config: PollerConfig) -> Self {
        let (state, _) = watch::channel(PollSnapshot::default());
        Self {
            shared: Arc::new(Shared { target, config, state, generation: AtomicU64::new(0) }),
            active: Mutex::new(None),
        }
    }

    /// Receive every progress update.
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot<P::Output>> {
        self.shared.state.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> PollSnapshot<P::Output> {
        self.shared.state.borrow().clone()
    }

    /// Attempt budget and delay.
    pub fn config(&self) -> PollerConfig {
        self.shared.config
    }

    /// Id of the resource currently or last polled.
    pub fn current_id(&self) -> Option<String> {
        self.active.lock().as_ref().map(|active| active.id.clone())
    }

    /// Start polling `id`, cancelling any poll in progress.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self, id), fields(id = tracing::field::Empty))]
    pub fn start(&self, id: impl Into<String>) {
        let id = id.into();
        tracing::Span::current().record("id", id.as_str());

        let mut active = self.active.lock();
        if let Some(previous) = active.take() {
            previous.cancel.cancel();
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.shared.state.send_replace(PollSnapshot::loading(&id));

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            Arc::clone(&self.shared),
            id.clone(),
            generation,
            cancel.clone(),
        ));
        debug!(generation, "poll started");
        *active = Some(ActivePoll { id, cancel, handle });
    }

    /// Restart the current poll with a fresh attempt budget.
    ///
    /// Returns `false` when nothing has been polled yet.
    pub fn retry(&self) -> bool {
        match self.current_id() {
            Some(id) => {
                self.start(id);
                true
            }
            None => false,
        }
    }

    /// Cancel the current poll and return to `Idle`.
    pub fn stop(&self) {
        if let Some(active) = self.active.lock().take() {
            active.cancel.cancel();
            debug!(id = %active.id, "poll stopped");
        }
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
        self.shared.state.send_replace(PollSnapshot::default());
    }

    /// Whether the background task for the current poll is still running.
    pub fn is_running(&self) -> bool {
        self.active.lock().as_ref().is_some_and(|active| !active.handle.is_finished())
    }
}

impl<P: PollTarget> Drop for Poller<P> {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            active.cancel.cancel();
        }
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
    }
}

async fn run<P: PollTarget>(
    shared: Arc<Shared<P>>,
    id: String,
    generation: u64,
    cancel: CancellationToken,
) {
    let max_attempts = shared.config.max_attempts.max(1);
    let mut failures: u32 = 0;

    loop {
        let outcome = shared.target.fetch(&id).await;
        if cancel.is_cancelled() {
            debug!(%id, "discarding read from cancelled poll");
            return;
        }

        let (value, error) = match outcome {
            Ok(value) if shared.target.is_ready(&value) => {
                info!(%id, "polled resource ready");
                shared.publish(
                    generation,
                    PollSnapshot {
                        id: Some(id),
                        attempts: 0,
                        state: PollState::Ready,
                        value: Some(value),
                        error: None,
                    },
                );
                return;
            }
            Ok(partial) => (Some(partial), None),
            Err(err) if !err.is_retryable() => {
                warn!(%id, error = %err, kind = err.label(), "poll rejected by backend");
                shared.publish(
                    generation,
                    PollSnapshot {
                        id: Some(id),
                        attempts: failures + 1,
                        state: PollState::Failed,
                        value: None,
                        error: Some(err),
                    },
                );
                return;
            }
            Err(err) => (None, Some(err)),
        };

        failures += 1;
        let exhausted = failures >= max_attempts;
        let state = if exhausted { PollState::Exhausted } else { PollState::Retrying };
        debug!(%id, attempt = failures, max_attempts, ?state, "poll attempt failed");
        shared.publish(
            generation,
            PollSnapshot { id: Some(id.clone()), attempts: failures, state, value, error },
        );
        if exhausted {
            info!(%id, attempts = failures, "poll exhausted");
            return;
        }

        tokio::select! {
            () = cancel.cancelled() => {
                debug!(%id, "poll cancelled while waiting");
                return;
            }
            () = tokio::time::sleep(shared.config.delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_result_maps_terminal_states() {
        let ready = PollSnapshot {
            id: Some("s1".into()),
            attempts: 0,
            state: PollState::Ready,
            value: Some(7),
            error: None,
        };
        assert_eq!(ready.into_result(), Some(Ok(7)));

        let exhausted: PollSnapshot<u32> =
            PollSnapshot { attempts: 3, state: PollState::Exhausted, ..PollSnapshot::default() };
        assert_eq!(exhausted.into_result(), Some(Err(CareLinkError::ExhaustedRetry { attempts: 3 })));

        let retrying: PollSnapshot<u32> =
            PollSnapshot { attempts: 1, state: PollState::Retrying, ..PollSnapshot::default() };
        assert_eq!(retrying.into_result(), None);
    }

    #[test]
    fn config_defaults_to_three_attempts_four_seconds_apart() {
        let config = PollerConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.delay, Duration::from_millis(4_000));
    }
}
