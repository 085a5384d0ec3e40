//! Point-in-time pool status

/// Snapshot of a pool's occupancy
///
/// # Examples
///
/// ```
/// use esox_mpool::{BoundedPool, PoolConfiguration};
///
/// let pool = BoundedPool::new(
///     PoolConfiguration::new()
///         .with_initial_size(2)
///         .with_max_size(4)
///         .with_factory(|| 0u64),
/// )
/// .unwrap();
///
/// let status = pool.status();
/// assert_eq!(status.idle_objects, 2);
/// assert_eq!(status.live_objects, Some(2));
/// assert!(!status.is_exhausted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoolStatus {
    /// Objects currently cached in the idle queue
    pub idle_objects: usize,

    /// Allocation slots granted, for pools that enforce a ceiling
    pub live_objects: Option<usize>,

    /// Idle queue capacity (and live ceiling for bounded pools). Zero once closed.
    pub max_size: usize,

    /// Whether the pool has been torn down
    pub closed: bool,
}

impl PoolStatus {
    /// True when an acquire would have to wait: nothing cached and every slot granted.
    pub fn is_exhausted(&self) -> bool {
        !self.closed
            && self.idle_objects == 0
            && self.live_objects.is_some_and(|live| live >= self.max_size)
    }
}
