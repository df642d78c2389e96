//! Single-worker event queue.
//!
//! Provides:
//! - `EventQueue` -- bounded sender side, fed by the backend stream
//! - `EventWorker` -- owns the `Dispatcher` and drains the queue in order
//! - `pump_events()` -- forwards a backend `EventStream` into the queue
//! - `serve()` -- wires the three together until the stream ends or shutdown
//!
//! Events are handled strictly one at a time, so commands never run
//! concurrently and may read-modify-write session state without locking.

use chatgate_types::error::BackendError;
use chatgate_types::event::InboundEvent;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::EventStream;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::session::SessionRepository;

/// Default bound on queued, not yet dispatched events.
pub const QUEUE_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker has stopped and dropped its receiver.
    #[error("event queue closed")]
    QueueClosed,
}

// ---------------------------------------------------------------------------
// EventQueue
// ---------------------------------------------------------------------------

/// Sending half of the worker queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: mpsc::Sender<InboundEvent>,
}

impl EventQueue {
    /// Enqueue an event, waiting while the queue is full.
    pub async fn push(&self, event: InboundEvent) -> Result<(), WorkerError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| WorkerError::QueueClosed)
    }
}

// ---------------------------------------------------------------------------
// WorkerStats
// ---------------------------------------------------------------------------

/// Counters reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub received: usize,
    pub executed: usize,
    pub failed: usize,
    pub not_found: usize,
    pub ignored: usize,
    /// Routed messages whose session state failed to save.
    pub persist_failures: usize,
}

impl WorkerStats {
    fn record(&mut self, outcome: &DispatchOutcome) {
        self.received += 1;
        match outcome {
            DispatchOutcome::Executed { .. } | DispatchOutcome::AdminText { handled: true } => {
                self.executed += 1
            }
            DispatchOutcome::Failed { .. } => self.failed += 1,
            DispatchOutcome::NotFound { .. } => self.not_found += 1,
            DispatchOutcome::NotAMessage
            | DispatchOutcome::SelfMessage
            | DispatchOutcome::Ignored
            | DispatchOutcome::AdminText { handled: false } => self.ignored += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// EventWorker
// ---------------------------------------------------------------------------

/// Receiving half of the queue; owns the dispatcher.
pub struct EventWorker<R> {
    dispatcher: Dispatcher<R>,
    rx: mpsc::Receiver<InboundEvent>,
    cancel: CancellationToken,
}

impl<R: SessionRepository> EventWorker<R> {
    /// Create a worker and its queue.
    pub fn new(
        dispatcher: Dispatcher<R>,
        capacity: usize,
        cancel: CancellationToken,
    ) -> (EventQueue, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = Self {
            dispatcher,
            rx,
            cancel,
        };
        (EventQueue { tx }, worker)
    }

    /// Drain the queue until every sender is dropped or `cancel` fires.
    ///
    /// Returns the dispatcher so callers can inspect final state.
    pub async fn run(mut self) -> (WorkerStats, Dispatcher<R>) {
        let mut stats = WorkerStats::default();

        loop {
            let next = tokio::select! {
                biased;
                () = self.cancel.cancelled() => None,
                event = self.rx.recv() => event,
            };
            let Some(event) = next else {
                if self.cancel.is_cancelled() {
                    info!(pending = self.rx.len(), "worker cancelled");
                } else {
                    debug!("event queue closed");
                }
                break;
            };

            let outcome = self.dispatcher.handle(&event).await;
            stats.record(&outcome);
        }
        stats.persist_failures = self.dispatcher.persist_failures();

        info!(
            received = stats.received,
            executed = stats.executed,
            failed = stats.failed,
            persist_failures = stats.persist_failures,
            "worker stopped"
        );
        (stats, self.dispatcher)
    }
}

impl<R> std::fmt::Debug for EventWorker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventWorker")
            .field("dispatcher", &self.dispatcher)
            .field("queued", &self.rx.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Stream plumbing
// ---------------------------------------------------------------------------

/// Forward backend events into `queue` until the stream ends, the backend
/// disconnects, the queue closes or `cancel` fires.
///
/// Listen errors are logged and skipped. Returns the number forwarded.
pub async fn pump_events(
    mut events: EventStream,
    queue: EventQueue,
    cancel: CancellationToken,
) -> usize {
    let mut forwarded = 0;

    loop {
        let item = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            item = events.next() => item,
        };

        match item {
            Some(Ok(event)) => {
                if queue.push(event).await.is_err() {
                    debug!("worker gone, stopping event pump");
                    break;
                }
                forwarded += 1;
            }
            Some(Err(BackendError::Disconnected)) => {
                info!("backend disconnected");
                break;
            }
            Some(Err(e)) => warn!(error = %e, "backend listen error, continuing"),
            None => {
                debug!("backend event stream ended");
                break;
            }
        }
    }

    forwarded
}

/// Run the gateway loop over one backend event stream.
pub async fn serve<R>(
    events: EventStream,
    dispatcher: Dispatcher<R>,
    cancel: CancellationToken,
) -> (WorkerStats, Dispatcher<R>)
where
    R: SessionRepository,
{
    let (queue, worker) = EventWorker::new(dispatcher, QUEUE_CAPACITY, cancel.clone());
    let pump = tokio::spawn(pump_events(events, queue, cancel));

    let result = worker.run().await;

    // The worker dropped its receiver, so a blocked pump returns promptly.
    match pump.await {
        Ok(forwarded) => debug!(forwarded, "event pump finished"),
        Err(e) => warn!(error = %e, "event pump task failed"),
    }
    result
}
