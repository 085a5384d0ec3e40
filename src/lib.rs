//! # esox_mpool
//!
//! Thread-safe object pools driven by caller-supplied lifecycle callbacks.
//!
//! ## Features
//!
//! - [`BoundedPool`]: hard ceiling on live objects, acquire blocks when exhausted
//! - [`UnboundedPool`]: caps only the idle cache, acquire never blocks
//! - `create` / `release` / `validate` hooks for every object
//! - Pre-population on construction
//! - Explicit, idempotent teardown that releases every cached object
//!   (also run on drop)
//! - RAII guards via [`Pool::acquire_guard`]
//! - Timed and async acquire
//!
//! ## Quick Start
//!
//! ```rust
//! use esox_mpool::{BoundedPool, Pool, PoolConfiguration};
//!
//! let pool = BoundedPool::new(
//!     PoolConfiguration::new()
//!         .with_initial_size(2)
//!         .with_max_size(5)
//!         .with_factory(|| Vec::<u8>::with_capacity(4096))
//!         .with_validation(|buf| buf.is_empty()),
//! )
//! .unwrap();
//!
//! {
//!     let mut buf = pool.acquire_guard().unwrap();
//!     buf.extend_from_slice(b"scratch");
//!     buf.clear();
//!     // Buffer released back to the pool when `buf` goes out of scope
//! }
//!
//! pool.close();
//! ```

mod bounded;
mod config;
mod errors;
mod pool;
mod queue;
mod status;
mod unbounded;

pub use bounded::BoundedPool;
pub use config::{CreateFn, PoolConfiguration, ReleaseFn, ValidateFn};
pub use errors::{PoolError, PoolResult};
pub use pool::{Pool, PooledObject};
pub use status::PoolStatus;
pub use unbounded::UnboundedPool;
