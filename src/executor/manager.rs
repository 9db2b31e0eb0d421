//! Worker pool running resolvers and value completions.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread,
    time::Duration,
};

use crossbeam_channel::{
    bounded, select, Receiver, SendTimeoutError, Sender, TryRecvError, TrySendError,
};
use tracing::{debug, trace, warn};

use crate::executor::FieldError;

/// Tuning of a [`ResolveManager`].
#[derive(Clone, Debug)]
pub struct ResolveManagerConfig {
    /// Capacity of each of the two job queues.
    pub queue_capacity: usize,
    /// Number of permanent workers; twice the queue capacity when unset.
    pub workers: Option<usize>,
    /// How long a submission waits on a full queue before starting another
    /// spillover worker.
    pub submit_delay: Duration,
}

impl Default for ResolveManagerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 50,
            workers: None,
            submit_delay: Duration::from_micros(500),
        }
    }
}

impl ResolveManagerConfig {
    fn worker_count(&self) -> usize {
        self.workers.unwrap_or(2 * self.queue_capacity)
    }
}

/// Queue a job is submitted to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JobKind {
    /// Calls a field resolver.
    Resolve,
    /// Completes a list element.
    Complete,
}

type Job = Box<dyn FnOnce() + Send>;

struct Queue {
    tx: Sender<Job>,
    rx: Receiver<Job>,
}

impl Queue {
    fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }
}

struct Queues {
    resolve: Queue,
    complete: Queue,
    submit_delay: Duration,
}

impl Queues {
    fn queue(&self, kind: JobKind) -> &Queue {
        match kind {
            JobKind::Resolve => &self.resolve,
            JobKind::Complete => &self.complete,
        }
    }

    /// Runs a single queued job on the calling thread, if any is waiting.
    fn run_one(&self) -> bool {
        match self
            .resolve
            .rx
            .try_recv()
            .or_else(|_| self.complete.rx.try_recv())
        {
            Ok(job) => {
                job();
                true
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }
}

/// Bounded pool of worker threads executing resolver and completion jobs
///
/// Each submission first tries the bounded queue of its kind. When the queue
/// is full the submitter starts a short-lived spillover worker, which drains
/// both queues and exits once they are empty, and keeps retrying. A thread
/// waiting on a [`Pending`] result runs queued jobs itself in the meantime,
/// so nested fan-out makes progress even when every worker is blocked.
///
/// Permanent workers only hold the receiving ends of the queues: they stop
/// once every clone of the manager is dropped.
#[derive(Clone)]
pub struct ResolveManager {
    queues: Arc<Queues>,
}

impl ResolveManager {
    /// Creates the queues and starts the permanent workers.
    pub fn start(config: ResolveManagerConfig) -> Self {
        let queues = Arc::new(Queues {
            resolve: Queue::new(config.queue_capacity),
            complete: Queue::new(config.queue_capacity),
            submit_delay: config.submit_delay,
        });

        let workers = config.worker_count();
        for id in 0..workers {
            let resolve = queues.resolve.rx.clone();
            let complete = queues.complete.rx.clone();
            let spawned = thread::Builder::new()
                .name(format!("resolve-worker-{id}"))
                .spawn(move || worker_loop(&resolve, &complete));
            if let Err(e) = spawned {
                warn!(error = %e, started = id, "failed to start resolve worker");
                break;
            }
        }
        debug!(
            workers,
            queue_capacity = config.queue_capacity,
            "started resolve manager",
        );

        Self { queues }
    }

    /// Submits `f` to the pool and returns a handle to its result.
    pub(crate) fn spawn<R, F>(&self, kind: JobKind, f: F) -> Pending<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let job: Job = Box::new(move || {
            // The waiting side may have given up already.
            _ = tx.send(run_catching(f));
        });
        self.submit(kind, job);

        Pending {
            rx,
            queues: self.queues.clone(),
        }
    }

    fn submit(&self, kind: JobKind, job: Job) {
        let queue = self.queues.queue(kind);
        trace!(?kind, "submitting job");

        let mut job = match queue.tx.try_send(job) {
            Ok(()) => return,
            Err(TrySendError::Full(job)) => job,
            Err(TrySendError::Disconnected(job)) => return job(),
        };
        loop {
            self.spawn_spillover();
            match queue.tx.send_timeout(job, self.queues.submit_delay) {
                Ok(()) => return,
                Err(SendTimeoutError::Timeout(j)) => job = j,
                Err(SendTimeoutError::Disconnected(j)) => return j(),
            }
        }
    }

    fn spawn_spillover(&self) {
        let queues = self.queues.clone();
        let spawned = thread::Builder::new()
            .name("resolve-spillover".into())
            .spawn(move || while queues.run_one() {});
        match spawned {
            Ok(_) => trace!("started spillover worker"),
            Err(e) => {
                warn!(error = %e, "failed to start spillover worker, draining inline");
                self.queues.run_one();
            }
        }
    }
}

impl std::fmt::Debug for ResolveManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveManager")
            .field("resolve_queued", &self.queues.resolve.rx.len())
            .field("complete_queued", &self.queues.complete.rx.len())
            .finish()
    }
}

fn worker_loop(resolve: &Receiver<Job>, complete: &Receiver<Job>) {
    loop {
        let job = select! {
            recv(resolve) -> job => job,
            recv(complete) -> job => job,
        };
        match job {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
    trace!("resolve worker stopped");
}

/// Runs `f` on the calling thread, turning a panic into a [`FieldError`].
pub(crate) fn run_catching<R, F: FnOnce() -> R>(f: F) -> Result<R, FieldError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        warn!(%message, "recovered from panic in resolver job");
        FieldError::from(message)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "resolver panicked".into())
}

/// Result of a job submitted to a [`ResolveManager`].
pub(crate) struct Pending<R> {
    rx: Receiver<Result<R, FieldError>>,
    queues: Arc<Queues>,
}

impl<R> Pending<R> {
    /// Blocks until the job finished, running queued jobs while waiting.
    pub(crate) fn wait(self) -> Result<R, FieldError> {
        loop {
            select! {
                recv(self.rx) -> result => {
                    return result.unwrap_or_else(|_| {
                        Err(FieldError::from("Resolver job was dropped before it ran"))
                    });
                }
                recv(self.queues.resolve.rx) -> job => {
                    if let Ok(job) = job {
                        job();
                    }
                }
                recv(self.queues.complete.rx) -> job => {
                    if let Ok(job) = job {
                        job();
                    }
                }
            }
        }
    }
}
