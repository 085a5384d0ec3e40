//! Pool with a hard ceiling on live objects

use crate::config::{CreateFn, PoolConfiguration, ReleaseFn, ValidateFn};
use crate::errors::{PoolError, PoolResult};
use crate::pool::{Checkout, Hooks, Pool};
use crate::queue::IdleQueue;
use crate::status::PoolStatus;

use crossbeam::channel::RecvTimeoutError;
use parking_lot::Mutex;
use std::time::Duration;

/// Allocation bookkeeping guarded by the pool lock
struct Allocation {
    /// Slots granted so far. Never exceeds `max`.
    live: usize,
    max: usize,
}

/// Thread-safe pool that never has more than `max_size` objects alive.
///
/// Acquiring from an exhausted pool blocks until another caller releases an
/// object or the pool is closed.
///
/// # Examples
///
/// ```
/// use esox_mpool::{BoundedPool, Pool, PoolConfiguration};
///
/// let pool = BoundedPool::new(
///     PoolConfiguration::new()
///         .with_initial_size(1)
///         .with_max_size(2)
///         .with_factory(|| Vec::<u8>::with_capacity(64)),
/// )
/// .unwrap();
///
/// let mut buf = pool.acquire().unwrap();
/// buf.extend_from_slice(b"payload");
/// buf.clear();
/// pool.release(buf);
///
/// pool.close();
/// assert!(pool.acquire().is_none());
/// ```
pub struct BoundedPool<T: Send> {
    queue: IdleQueue<T>,
    hooks: Hooks<T>,
    state: Mutex<Allocation>,
}

impl<T: Send> BoundedPool<T> {
    /// Create a pool from a configuration, pre-creating `initial_size` objects.
    ///
    /// Fails with [`PoolError::InvalidParameters`] when `max_size` is zero,
    /// `initial_size` exceeds `max_size`, or no factory is set.
    pub fn new(config: PoolConfiguration<T>) -> PoolResult<Self> {
        let (initial, max, hooks) = config.into_parts(false)?;

        let pool = Self {
            queue: IdleQueue::new(max),
            hooks,
            state: Mutex::new(Allocation { live: initial, max }),
        };

        for _ in 0..initial {
            if let Err(item) = pool.queue.try_push(pool.hooks.create()) {
                pool.hooks.discard(item);
            }
        }

        tracing::debug!(initial, max, "created bounded pool");
        Ok(pool)
    }

    /// Create a pool from positional arguments.
    pub fn from_callbacks(
        initial: usize,
        max: usize,
        create: CreateFn<T>,
        release: Option<ReleaseFn<T>>,
        validate: Option<ValidateFn<T>>,
    ) -> PoolResult<Self> {
        Self::new(PoolConfiguration {
            initial_size: initial,
            max_size: max,
            factory: Some(create),
            release_hook: release,
            validation_function: validate,
        })
    }

    /// Acquire without waiting. `None` if the pool is closed or exhausted.
    pub fn try_acquire(&self) -> Option<T> {
        match self.checkout() {
            Checkout::Ready(item) => Some(item),
            Checkout::Exhausted | Checkout::Closed => None,
        }
    }

    /// Acquire, waiting at most `timeout` for a release when the pool is exhausted.
    pub fn acquire_timeout(&self, timeout: Duration) -> PoolResult<T> {
        match self.checkout() {
            Checkout::Ready(item) => Ok(item),
            Checkout::Closed => Err(PoolError::Closed),
            Checkout::Exhausted => {
                tracing::trace!(?timeout, "bounded pool exhausted, waiting for a release");
                self.queue.pop_timeout(timeout).map_err(|err| match err {
                    RecvTimeoutError::Timeout => PoolError::Timeout(timeout),
                    RecvTimeoutError::Disconnected => PoolError::Closed,
                })
            }
        }
    }

    /// Acquire asynchronously, polling until an object frees up or `timeout` passes.
    pub async fn acquire_async(&self, timeout: Duration) -> PoolResult<T> {
        tokio::time::timeout(timeout, async {
            loop {
                match self.checkout() {
                    Checkout::Ready(item) => return Ok(item),
                    Checkout::Closed => return Err(PoolError::Closed),
                    Checkout::Exhausted => {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        })
        .await
        .map_err(|_| PoolError::Timeout(timeout))?
    }

    /// Get the current occupancy
    pub fn status(&self) -> PoolStatus {
        let state = self.state.lock();
        PoolStatus {
            idle_objects: self.queue.len(),
            live_objects: Some(state.live),
            max_size: state.max,
            closed: self.queue.is_closed(),
        }
    }

    /// Cached object first, then a new one if a slot is free.
    fn checkout(&self) -> Checkout<T> {
        if self.queue.is_closed() {
            return Checkout::Closed;
        }

        if let Some(item) = self.queue.try_pop() {
            // A replacement takes over the discarded object's slot.
            return Checkout::Ready(self.hooks.revalidate(item));
        }

        if self.reserve_slot() {
            tracing::trace!("idle queue empty, creating object");
            return Checkout::Ready(self.hooks.create());
        }

        Checkout::Exhausted
    }

    fn reserve_slot(&self) -> bool {
        let mut state = self.state.lock();
        if state.live < state.max {
            state.live += 1;
            true
        } else {
            false
        }
    }
}

impl<T: Send> Pool<T> for BoundedPool<T> {
    fn acquire(&self) -> Option<T> {
        match self.checkout() {
            Checkout::Ready(item) => Some(item),
            Checkout::Closed => None,
            Checkout::Exhausted => {
                tracing::trace!("bounded pool exhausted, waiting for a release");
                // Handed over as released; waiters skip validation.
                self.queue.pop()
            }
        }
    }

    fn release(&self, item: T) {
        if let Err(item) = self.queue.try_push(item) {
            tracing::trace!("idle queue full or closed, discarding object");
            // The live count keeps the slot; it tracks slots granted, not objects cached.
            self.hooks.discard(item);
        }
    }

    fn close(&self) {
        let mut state = self.state.lock();
        if !self.queue.close() {
            return;
        }

        let cached = self.queue.drain();
        let released = cached.len();
        for item in cached {
            self.hooks.discard(item);
        }

        state.live = 0;
        state.max = 0;
        tracing::debug!(released, "closed bounded pool");
    }

    fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}

impl<T: Send> Drop for BoundedPool<T> {
    fn drop(&mut self) {
        self.close();
    }
}
