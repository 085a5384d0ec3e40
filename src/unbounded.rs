//! Pool that caps only its idle cache

use crate::config::{CreateFn, PoolConfiguration, ReleaseFn, ValidateFn};
use crate::errors::{PoolError, PoolResult};
use crate::pool::{Checkout, Hooks, Pool};
use crate::queue::IdleQueue;
use crate::status::PoolStatus;

use parking_lot::Mutex;
use std::time::Duration;

/// Thread-safe pool that caches up to `max_size` idle objects and creates a
/// fresh one whenever the cache is empty. Acquire never blocks.
///
/// A `max_size` of zero caches nothing: every acquire creates and every
/// release goes straight to the release hook.
///
/// # Examples
///
/// ```
/// use esox_mpool::{Pool, PoolConfiguration, UnboundedPool};
///
/// let pool = UnboundedPool::new(
///     PoolConfiguration::new()
///         .with_max_size(1)
///         .with_factory(|| String::with_capacity(32)),
/// )
/// .unwrap();
///
/// let a = pool.acquire().unwrap();
/// let b = pool.acquire().unwrap();
/// pool.release(a);
/// pool.release(b); // cache already full, handed to the release hook
/// assert_eq!(pool.status().idle_objects, 1);
/// ```
pub struct UnboundedPool<T: Send> {
    queue: IdleQueue<T>,
    hooks: Hooks<T>,
    /// Serializes teardown
    teardown: Mutex<()>,
}

impl<T: Send> UnboundedPool<T> {
    /// Create a pool from a configuration, pre-creating `initial_size` objects.
    ///
    /// Fails with [`PoolError::InvalidParameters`] when `initial_size` exceeds
    /// `max_size` or no factory is set.
    pub fn new(config: PoolConfiguration<T>) -> PoolResult<Self> {
        let (initial, max, hooks) = config.into_parts(true)?;

        let pool = Self {
            queue: IdleQueue::new(max),
            hooks,
            teardown: Mutex::new(()),
        };

        for _ in 0..initial {
            if let Err(item) = pool.queue.try_push(pool.hooks.create()) {
                pool.hooks.discard(item);
            }
        }

        tracing::debug!(initial, max, "created unbounded pool");
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

    /// Same as [`Pool::acquire`]; never waits.
    pub fn try_acquire(&self) -> Option<T> {
        self.acquire()
    }

    /// Counterpart of the bounded pool's method. Only fails once closed.
    ///
    /// `_timeout` is ignored: acquiring from this pool never waits.
    pub async fn acquire_async(&self, _timeout: Duration) -> PoolResult<T> {
        self.acquire().ok_or(PoolError::Closed)
    }

    /// Get the current occupancy
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            idle_objects: self.queue.len(),
            live_objects: None,
            max_size: self.queue.capacity(),
            closed: self.queue.is_closed(),
        }
    }

    fn checkout(&self) -> Checkout<T> {
        if self.queue.is_closed() {
            return Checkout::Closed;
        }

        match self.queue.try_pop() {
            Some(item) => Checkout::Ready(self.hooks.revalidate(item)),
            None => {
                tracing::trace!("idle queue empty, creating object");
                Checkout::Ready(self.hooks.create())
            }
        }
    }
}

impl<T: Send> Pool<T> for UnboundedPool<T> {
    fn acquire(&self) -> Option<T> {
        match self.checkout() {
            Checkout::Ready(item) => Some(item),
            Checkout::Exhausted | Checkout::Closed => None,
        }
    }

    fn release(&self, item: T) {
        if let Err(item) = self.queue.try_push(item) {
            tracing::trace!("idle queue full or closed, discarding object");
            self.hooks.discard(item);
        }
    }

    fn close(&self) {
        let _guard = self.teardown.lock();
        if !self.queue.close() {
            return;
        }

        let cached = self.queue.drain();
        let released = cached.len();
        for item in cached {
            self.hooks.discard(item);
        }
        tracing::debug!(released, "closed unbounded pool");
    }

    fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}

impl<T: Send> Drop for UnboundedPool<T> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        value: i32,
    }

    fn counting_config(
        created: &Arc<AtomicUsize>,
        released: &Arc<StdMutex<Vec<i32>>>,
    ) -> PoolConfiguration<Item> {
        let created = Arc::clone(created);
        let released = Arc::clone(released);
        PoolConfiguration::new()
            .with_factory(move || Item {
                value: created.fetch_add(1, Ordering::SeqCst) as i32 + 1,
            })
            .with_release(move |item: Item| released.lock().unwrap().push(item.value))
    }

    #[test]
    fn test_empty_cache_always_creates() {
        let created = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(StdMutex::new(Vec::new()));
        let pool = UnboundedPool::new(counting_config(&created, &released).with_max_size(2)).unwrap();

        let items: Vec<_> = (0..10).map(|_| pool.acquire().unwrap()).collect();
        assert_eq!(items.len(), 10);
        assert_eq!(created.load(Ordering::SeqCst), 10);
        assert_eq!(pool.status().live_objects, None);
    }

    #[test]
    fn test_release_caches_up_to_max() {
        let created = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(StdMutex::new(Vec::new()));
        let pool = UnboundedPool::new(counting_config(&created, &released).with_max_size(2)).unwrap();

        let items: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();
        for item in items {
            pool.release(item);
        }

        assert_eq!(pool.status().idle_objects, 2);
        assert_eq!(*released.lock().unwrap(), vec![3]);

        assert_eq!(pool.acquire(), Some(Item { value: 1 }));
        assert_eq!(pool.acquire(), Some(Item { value: 2 }));
        assert_eq!(created.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_zero_max_caches_nothing() {
        let created = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(StdMutex::new(Vec::new()));
        let pool = UnboundedPool::new(counting_config(&created, &released).with_max_size(0)).unwrap();

        let item = pool.acquire().unwrap();
        pool.release(item);
        assert_eq!(*released.lock().unwrap(), vec![1]);

        assert_eq!(pool.acquire(), Some(Item { value: 2 }));
    }

    #[test]
    fn test_invalid_cached_item_is_replaced() {
        let created = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(StdMutex::new(Vec::new()));
        let pool = UnboundedPool::new(
            counting_config(&created, &released)
                .with_initial_size(1)
                .with_max_size(1)
                .with_validation(|item: &Item| item.value % 2 == 0),
        )
        .unwrap();

        assert_eq!(pool.acquire(), Some(Item { value: 2 }));
        assert_eq!(*released.lock().unwrap(), vec![1]);
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_close_is_idempotent() {
        let created = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(StdMutex::new(Vec::new()));
        let pool = UnboundedPool::new(
            counting_config(&created, &released)
                .with_initial_size(3)
                .with_max_size(3),
        )
        .unwrap();

        assert_eq!(pool.status().idle_objects, 3);
        assert!(released.lock().unwrap().is_empty());

        pool.close();
        pool.close();
        assert_eq!(released.lock().unwrap().len(), 3);
        assert!(pool.is_closed());
        assert!(pool.acquire().is_none());

        drop(pool);
        assert_eq!(released.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_construction_errors() {
        let created = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(StdMutex::new(Vec::new()));
        assert!(matches!(
            UnboundedPool::new(
                counting_config(&created, &released)
                    .with_initial_size(2)
                    .with_max_size(1)
            ),
            Err(PoolError::InvalidParameters(_))
        ));
        assert!(matches!(
            UnboundedPool::<Item>::new(PoolConfiguration::new().with_max_size(1)),
            Err(PoolError::InvalidParameters(_))
        ));
        assert_eq!(created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_released_item_returned_unchanged() {
        let pool = UnboundedPool::from_callbacks(0, 1, Arc::new(|| Item { value: 0 }), None, None).unwrap();
        pool.release(Item { value: 42 });
        assert_eq!(pool.acquire(), Some(Item { value: 42 }));
    }

    #[tokio::test]
    async fn test_async_acquire_never_waits() {
        let pool = UnboundedPool::from_callbacks(0, 0, Arc::new(|| 7u8), None, None).unwrap();
        assert_eq!(pool.acquire_async(Duration::from_millis(1)).await, Ok(7));
        pool.close();
        assert_eq!(
            pool.acquire_async(Duration::from_millis(1)).await,
            Err(PoolError::Closed)
        );
    }
}
