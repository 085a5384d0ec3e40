//! Pool capability shared by the bounded and unbounded variants

use crate::config::{CreateFn, ReleaseFn, ValidateFn};

use std::ops::{Deref, DerefMut};

/// A pool of reusable objects.
///
/// Ownership of an object moves to the caller on [`acquire`](Pool::acquire)
/// and back to the pool on [`release`](Pool::release). Callback panics are not
/// caught; they surface from whichever pool method invoked the callback.
pub trait Pool<T> {
    /// Hand out an object. `None` means the pool has been closed.
    fn acquire(&self) -> Option<T>;

    /// Give an object back. If it cannot be cached it is passed to the
    /// release hook instead.
    fn release(&self, item: T);

    /// Tear the pool down, releasing every cached object. Idempotent.
    fn close(&self);

    fn is_closed(&self) -> bool;

    /// Acquire an object wrapped in a guard that releases it back on drop.
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_mpool::{Pool, PoolConfiguration, UnboundedPool};
    ///
    /// let pool = UnboundedPool::new(
    ///     PoolConfiguration::new().with_max_size(4).with_factory(|| String::from("conn")),
    /// )
    /// .unwrap();
    ///
    /// {
    ///     let conn = pool.acquire_guard().unwrap();
    ///     assert_eq!(conn.as_str(), "conn");
    /// }
    /// assert_eq!(pool.status().idle_objects, 1);
    /// ```
    fn acquire_guard(&self) -> Option<PooledObject<'_, T>>
    where
        Self: Sized,
    {
        self.acquire().map(|value| PooledObject::new(value, self))
    }
}

/// A pooled object that is released back to its pool when dropped
pub struct PooledObject<'a, T> {
    value: Option<T>,
    pool: &'a dyn Pool<T>,
}

impl<'a, T> PooledObject<'a, T> {
    fn new(value: T, pool: &'a dyn Pool<T>) -> Self {
        Self {
            value: Some(value),
            pool,
        }
    }

    /// Detach the object so it is not released back to the pool
    pub fn into_inner(mut self) -> T {
        self.value.take().expect("Value already taken")
    }
}

impl<T> Deref for PooledObject<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value.as_ref().expect("Value already taken")
    }
}

impl<T> DerefMut for PooledObject<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value.as_mut().expect("Value already taken")
    }
}

impl<T> Drop for PooledObject<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.release(value);
        }
    }
}

/// Outcome of the non-blocking part of an acquire
pub(crate) enum Checkout<T> {
    Ready(T),
    /// Nothing cached and no capacity left to create; the caller may wait.
    Exhausted,
    Closed,
}

/// The caller-supplied lifecycle callbacks
pub(crate) struct Hooks<T> {
    create: CreateFn<T>,
    release: Option<ReleaseFn<T>>,
    validate: Option<ValidateFn<T>>,
}

impl<T> Hooks<T> {
    pub fn new(
        create: CreateFn<T>,
        release: Option<ReleaseFn<T>>,
        validate: Option<ValidateFn<T>>,
    ) -> Self {
        Self {
            create,
            release,
            validate,
        }
    }

    pub fn create(&self) -> T {
        (self.create)()
    }

    /// Run the release hook, or just drop the object when there is none.
    pub fn discard(&self, item: T) {
        if let Some(ref release) = self.release {
            release(item);
        }
    }

    /// Vet an object taken from the idle queue, swapping it for a fresh one
    /// if validation fails.
    pub fn revalidate(&self, item: T) -> T {
        match self.validate {
            Some(ref validate) if !validate(&item) => {
                tracing::trace!("cached object failed validation, replacing it");
                self.discard(item);
                self.create()
            }
            _ => item,
        }
    }
}
