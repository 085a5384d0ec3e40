//! Basic usage examples for BoundedPool and UnboundedPool

use esox_mpool::{BoundedPool, Pool, PoolConfiguration, UnboundedPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct Connection {
    id: usize,
    open: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== esox_mpool - Basic Examples ===\n");

    // Example 1: Bounded pool with lifecycle hooks
    bounded_pool();

    // Example 2: Waiting on an exhausted pool
    exhausted_pool();

    // Example 3: Unbounded pool
    unbounded_pool();
}

fn connection_config() -> PoolConfiguration<Connection> {
    let next_id = Arc::new(AtomicUsize::new(1));
    PoolConfiguration::new()
        .with_factory(move || {
            let id = next_id.fetch_add(1, Ordering::Relaxed);
            println!("   Opened connection {id}");
            Connection { id, open: true }
        })
        .with_validation(|conn: &Connection| conn.open)
        .with_release(|conn: Connection| println!("   Closed connection {}", conn.id))
}

fn bounded_pool() {
    println!("1. Bounded Pool:");
    let pool = BoundedPool::new(connection_config().with_initial_size(2).with_max_size(5)).unwrap();

    {
        let conn = pool.acquire_guard().unwrap();
        println!("   Using connection {}", conn.id);
        // Connection automatically released back when dropped
    }

    let mut conn = pool.acquire().unwrap();
    conn.open = false;
    pool.release(conn);

    // The broken connection fails validation and gets replaced.
    let conn = pool.acquire().unwrap();
    println!("   Got connection {} (open: {})", conn.id, conn.open);
    pool.release(conn);

    println!("   Status: {:?}", pool.status());
    pool.close();
    println!();
}

fn exhausted_pool() {
    println!("2. Exhausted Pool:");
    let pool = BoundedPool::new(connection_config().with_max_size(1)).unwrap();
    let held = pool.acquire().unwrap();

    println!("   try_acquire while exhausted: {:?}", pool.try_acquire().map(|c| c.id));

    thread::scope(|s| {
        let waiter = s.spawn(|| pool.acquire());
        thread::sleep(Duration::from_millis(20));
        pool.release(held);
        let conn = waiter.join().unwrap();
        println!("   Waiter received connection {:?}", conn.map(|c| c.id));
    });

    pool.close();
    println!();
}

fn unbounded_pool() {
    println!("3. Unbounded Pool:");
    let pool = UnboundedPool::new(connection_config().with_max_size(1)).unwrap();

    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    pool.release(a);
    pool.release(b);

    println!("   Idle after release: {}", pool.status().idle_objects);
    // Remaining idle connection is closed on drop
}
