//! [`MemoCell`]: one value, computed at most once, shared by every concurrent caller.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tracing::{debug, warn};

use super::CacheState;

/// In-flight computation. Resolves to `None` when the compute function panicked.
type SharedCompute<V, E> = Shared<BoxFuture<'static, Option<Result<V, E>>>>;

enum Slot<V, E> {
    Empty,
    Pending {
        generation: u64,
        started: Instant,
        future: SharedCompute<V, E>,
    },
    Populated(V),
}

impl<V, E> Slot<V, E> {
    fn state(&self) -> CacheState {
        match self {
            Slot::Empty => CacheState::Empty,
            Slot::Pending { .. } => CacheState::Pending,
            Slot::Populated(_) => CacheState::Populated,
        }
    }
}

struct Inner<V, E> {
    slot: Slot<V, E>,
    /// Tags each computation so a late result never lands in a slot that was reset.
    next_generation: u64,
}

/// Memoizes the result of one expensive async computation.
///
/// * Populated: [`get_or_compute`](Self::get_or_compute) returns a clone of the held value
///   without suspending.
/// * Pending: the caller attaches to the in-flight computation and receives its outcome.
///   Every attached caller sees the same value or a clone of the same error.
/// * Empty: the compute function is invoked once. Success populates the cell; failure
///   leaves it empty so the next call retries.
///
/// The state lives behind a short synchronous lock that is never held across an `.await`,
/// so the `Empty -> Pending` transition is atomic on any tokio runtime flavour.
///
/// There is no timeout: if the compute future never resolves, attached callers wait forever.
/// Wrap the call in `tokio::time::timeout` when bounded latency matters.
///
/// # Example
///
/// ```rust,ignore
/// use vibe::cache::MemoCell;
///
/// let cell: MemoCell<u32, String> = MemoCell::new();
/// let v = cell.get_or_compute(|| async { Ok(42) }).await?;
/// assert_eq!(v, 42);
/// ```
pub struct MemoCell<V, E> {
    inner: Mutex<Inner<V, E>>,
}

impl<V, E> MemoCell<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates an empty cell.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                slot: Slot::Empty,
                next_generation: 0,
            }),
        }
    }

    /// Returns the held value, or runs `compute` (at most once across concurrent callers)
    /// and returns its outcome.
    ///
    /// `compute` is only called when the cell is empty; otherwise it is dropped unused. It
    /// first runs when the shared future is polled, outside the cell's lock, so it may itself
    /// call [`state`](Self::state), [`get`](Self::get) or [`reset`](Self::reset).
    /// Dropping the caller that started the computation does not cancel it: the shared
    /// future keeps being driven by any other attached caller, or by the next one to arrive.
    ///
    /// # Panics
    ///
    /// Panics if the compute function panicked. The cell is reset to empty first, so the
    /// next call retries.
    pub async fn get_or_compute<F, Fut>(&self, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let (generation, future) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            match &inner.slot {
                Slot::Populated(value) => return Ok(value.clone()),
                Slot::Pending {
                    generation, future, ..
                } => {
                    debug!(generation, "attaching to in-flight computation");
                    (*generation, future.clone())
                }
                Slot::Empty => {
                    let generation = inner.next_generation;
                    inner.next_generation += 1;
                    debug!(generation, "cache empty, starting computation");
                    let future = AssertUnwindSafe(async move { compute().await })
                        .catch_unwind()
                        .map(Result::ok)
                        .boxed()
                        .shared();
                    inner.slot = Slot::Pending {
                        generation,
                        started: Instant::now(),
                        future: future.clone(),
                    };
                    (generation, future)
                }
            }
        };

        let outcome = future.await;
        self.settle(generation, outcome.as_ref());
        match outcome {
            Some(result) => result,
            None => panic!("MemoCell: compute function panicked (generation {generation})"),
        }
    }

    /// Returns the held value without computing or waiting.
    pub fn get(&self) -> Option<V> {
        match &self.lock().slot {
            Slot::Populated(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Current state of the cell.
    pub fn state(&self) -> CacheState {
        self.lock().slot.state()
    }

    /// Forces the cell back to empty.
    ///
    /// Callers already attached to an in-flight computation still receive its outcome,
    /// but that outcome is not stored. The next call starts a fresh computation.
    pub fn reset(&self) {
        let mut guard = self.lock();
        let previous = guard.slot.state();
        guard.slot = Slot::Empty;
        debug!(%previous, "cache reset");
    }

    /// Applies the outcome of computation `generation`, unless the slot has since moved on
    /// (another attached caller already settled it, or it was reset).
    fn settle(&self, generation: u64, outcome: Option<&Result<V, E>>) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let started = match &inner.slot {
            Slot::Pending {
                generation: current,
                started,
                ..
            } if *current == generation => *started,
            _ => return,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        inner.slot = match outcome {
            Some(Ok(value)) => {
                debug!(generation, elapsed_ms, "computation finished, cache populated");
                Slot::Populated(value.clone())
            }
            Some(Err(_)) => {
                warn!(generation, elapsed_ms, "computation failed, cache back to empty");
                Slot::Empty
            }
            None => {
                warn!(generation, elapsed_ms, "computation panicked, cache back to empty");
                Slot::Empty
            }
        };
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V, E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V, E> Default for MemoCell<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> std::fmt::Debug for MemoCell<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCell")
            .field("state", &self.state())
            .finish()
    }
}
