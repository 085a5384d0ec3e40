//! Pool configuration options

use crate::errors::{PoolError, PoolResult};
use crate::pool::Hooks;

use std::fmt;
use std::sync::Arc;

/// Manufactures a new pooled object.
pub type CreateFn<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Disposes of an object the pool is discarding.
pub type ReleaseFn<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Decides whether a cached object may still be handed out.
pub type ValidateFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Configuration for pool construction
///
/// # Examples
///
/// ```
/// use esox_mpool::PoolConfiguration;
///
/// let config = PoolConfiguration::<Vec<u8>>::new()
///     .with_initial_size(2)
///     .with_max_size(8)
///     .with_factory(|| Vec::with_capacity(1024))
///     .with_validation(|buf| buf.capacity() >= 1024);
///
/// assert_eq!(config.initial_size, 2);
/// assert_eq!(config.max_size, 8);
/// assert!(config.factory.is_some());
/// assert!(config.release_hook.is_none());
/// ```
pub struct PoolConfiguration<T> {
    /// Number of objects created eagerly during construction
    pub initial_size: usize,

    /// Idle queue capacity. For bounded pools this is also the live object ceiling.
    pub max_size: usize,

    /// Object factory, required
    pub factory: Option<CreateFn<T>>,

    /// Called once for every object the pool discards
    pub release_hook: Option<ReleaseFn<T>>,

    /// Checked against cached objects before they are handed out
    pub validation_function: Option<ValidateFn<T>>,
}

impl<T> Default for PoolConfiguration<T> {
    fn default() -> Self {
        Self {
            initial_size: 0,
            max_size: 100,
            factory: None,
            release_hook: None,
            validation_function: None,
        }
    }
}

impl<T> Clone for PoolConfiguration<T> {
    fn clone(&self) -> Self {
        Self {
            initial_size: self.initial_size,
            max_size: self.max_size,
            factory: self.factory.clone(),
            release_hook: self.release_hook.clone(),
            validation_function: self.validation_function.clone(),
        }
    }
}

impl<T> fmt::Debug for PoolConfiguration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfiguration")
            .field("initial_size", &self.initial_size)
            .field("max_size", &self.max_size)
            .field("factory", &self.factory.is_some())
            .field("release_hook", &self.release_hook.is_some())
            .field("validation_function", &self.validation_function.is_some())
            .finish()
    }
}

impl<T> PoolConfiguration<T> {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of objects to pre-create
    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.initial_size = size;
        self
    }

    /// Set the maximum pool size
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_mpool::PoolConfiguration;
    ///
    /// let config = PoolConfiguration::<i32>::new()
    ///     .with_max_size(50);
    ///
    /// assert_eq!(config.max_size, 50);
    /// ```
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Set the object factory
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Set the hook that disposes of discarded objects
    pub fn with_release<F>(mut self, release: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.release_hook = Some(Arc::new(release));
        self
    }

    /// Enable validation of cached objects on acquire
    pub fn with_validation<F>(mut self, validate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.validation_function = Some(Arc::new(validate));
        self
    }

    /// Check the construction rules and split the configuration into
    /// `(initial_size, max_size, hooks)`.
    ///
    /// `allow_zero_max` is true for pools where `max_size` only bounds the
    /// idle cache.
    pub(crate) fn into_parts(self, allow_zero_max: bool) -> PoolResult<(usize, usize, Hooks<T>)> {
        if !allow_zero_max && self.max_size == 0 {
            return Err(PoolError::InvalidParameters("max_size must be greater than zero"));
        }
        if self.initial_size > self.max_size {
            return Err(PoolError::InvalidParameters(
                "initial_size must not exceed max_size",
            ));
        }
        let Some(create) = self.factory else {
            return Err(PoolError::InvalidParameters("a factory is required"));
        };

        let hooks = Hooks::new(create, self.release_hook, self.validation_function);
        Ok((self.initial_size, self.max_size, hooks))
    }
}
