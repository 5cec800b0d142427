//! Serialized, cooldown-spaced request queue
//!
//! Every call to a capacity-constrained remote service is submitted here as a
//! job. Jobs run one at a time, in submission order, and consecutive job
//! starts are at least `cooldown` apart. The spacing is measured between
//! start times, so a slow job does not delay the next start beyond its own
//! completion.
//!
//! The queue never times out, cancels or retries a job. An operation that
//! never settles stalls every job behind it, so operations must bound their
//! own duration (the HTTP clients in this crate use a request timeout).

use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_error};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

/// Jikan publishes a limit of 3 requests per second; 500ms keeps well under it.
pub const JIKAN_COOLDOWN_MS: u64 = 500;

type JobRun = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct QueuedJob {
    seq: u64,
    run: JobRun,
}

/// Whether a drain loop is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    Draining,
}

#[derive(Default)]
struct DrainState {
    pending: VecDeque<QueuedJob>,
    processing: bool,
    last_start: Option<Instant>,
    next_seq: u64,
}

struct QueueInner {
    name: String,
    cooldown: Duration,
    state: Mutex<DrainState>,
}

impl QueueInner {
    // The guard is never held across an await point.
    fn lock(&self) -> MutexGuard<'_, DrainState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// FIFO executor that serializes jobs and spaces their starts by a cooldown.
///
/// Cloning yields another handle to the same queue. Create one queue per
/// rate-limited dependency; never share one across services with different
/// limits.
#[derive(Clone)]
pub struct RateLimitedQueue {
    inner: Arc<QueueInner>,
}

impl RateLimitedQueue {
    pub fn new(name: &str, cooldown: Duration) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                name: name.to_string(),
                cooldown,
                state: Mutex::new(DrainState::default()),
            }),
        }
    }

    /// Queue tuned for the Jikan API
    pub fn for_jikan() -> Self {
        Self::new("Jikan", Duration::from_millis(JIKAN_COOLDOWN_MS))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn cooldown(&self) -> Duration {
        self.inner.cooldown
    }

    pub fn state(&self) -> QueueState {
        if self.inner.lock().processing {
            QueueState::Draining
        } else {
            QueueState::Idle
        }
    }

    /// Enqueue `operation` and return a handle that resolves with its outcome.
    ///
    /// Enqueueing never blocks and never runs the operation inline. The drain
    /// task is spawned on the current Tokio runtime when the queue was idle.
    /// Outside a runtime the job is not queued and the handle resolves to an
    /// [`AppError::InternalError`].
    ///
    /// A panic inside the operation is reported to this caller only, as an
    /// [`AppError::InternalError`]; the queue keeps draining. Dropping the
    /// returned handle does not cancel the job.
    pub fn submit<F, Fut, T>(&self, operation: F) -> Submission<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let name = self.inner.name.clone();

        let mut state = self.inner.lock();
        let seq = state.next_seq;
        state.next_seq += 1;

        let Ok(runtime) = Handle::try_current() else {
            drop(state);
            log_error!("{} job #{} submitted outside a Tokio runtime", name, seq);
            let _ = tx.send(Err(AppError::InternalError(format!(
                "{} queue needs a Tokio runtime to run request #{}",
                name, seq
            ))));
            return Submission { seq, receiver: rx };
        };

        let run: JobRun = Box::new(move || {
            async move {
                let outcome = AssertUnwindSafe(async move { operation().await })
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        log_error!("{} job #{} panicked while running", name, seq);
                        Err(AppError::InternalError(format!(
                            "{} request #{} panicked",
                            name, seq
                        )))
                    });

                if tx.send(outcome).is_err() {
                    log_debug!("{} job #{} settled after its caller went away", name, seq);
                }
            }
            .boxed()
        });

        state.pending.push_back(QueuedJob { seq, run });
        let start_drain = !state.processing;
        state.processing = true;
        let queued = state.pending.len();
        drop(state);

        log_debug!(
            "{} job #{} queued ({} pending)",
            self.inner.name,
            seq,
            queued
        );

        if start_drain {
            runtime.spawn(Self::drain(Arc::clone(&self.inner)));
        }

        Submission { seq, receiver: rx }
    }

    async fn drain(inner: Arc<QueueInner>) {
        log_debug!("{} queue draining", inner.name);

        loop {
            let (job, wait) = {
                let mut state = inner.lock();
                let Some(job) = state.pending.pop_front() else {
                    // Cleared under the same lock `submit` checks, so no wakeup is lost.
                    state.processing = false;
                    log_debug!("{} queue idle", inner.name);
                    return;
                };
                let wait = state
                    .last_start
                    .map(|last| (last + inner.cooldown).saturating_duration_since(Instant::now()))
                    .unwrap_or(Duration::ZERO);
                (job, wait)
            };

            if !wait.is_zero() {
                log::trace!(
                    "{} job #{} waiting {:?} for cooldown",
                    inner.name,
                    job.seq,
                    wait
                );
                sleep(wait).await;
            }

            inner.lock().last_start = Some(Instant::now());
            log::trace!("{} job #{} started", inner.name, job.seq);
            (job.run)().await;
        }
    }
}

impl std::fmt::Debug for RateLimitedQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedQueue")
            .field("name", &self.inner.name)
            .field("cooldown", &self.inner.cooldown)
            .field("state", &self.state())
            .finish()
    }
}

/// Pending outcome of a submitted job
#[must_use = "a submission resolves to the job's outcome"]
pub struct Submission<T> {
    seq: u64,
    receiver: oneshot::Receiver<AppResult<T>>,
}

impl<T> Submission<T> {
    /// Position of the job in submission order (starts at 0)
    pub fn sequence(&self) -> u64 {
        self.seq
    }
}

impl<T> Future for Submission<T> {
    type Output = AppResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(AppError::InternalError(
                    "request queue dropped the job before it settled".to_string(),
                ))
            })
        })
    }
}
