//! Fixed-capacity idle queue shared by both pool variants

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use std::time::Duration;

/// FIFO buffer of cached objects that doubles as the wait primitive for
/// exhausted pools.
///
/// Closing drops the only sender, so blocked poppers wake as soon as the
/// queue runs empty. Pushes hold the sender read lock for the whole
/// `try_send`, which means nothing can slip in after `close` returns.
pub(crate) struct IdleQueue<T> {
    sender: RwLock<Option<Sender<T>>>,
    receiver: Receiver<T>,
    capacity: usize,
}

impl<T> IdleQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        Self {
            sender: RwLock::new(Some(sender)),
            receiver,
            capacity,
        }
    }

    /// Cache `item` without blocking. Hands it back if the queue is full or closed.
    pub fn try_push(&self, item: T) -> Result<(), T> {
        match self.sender.read().as_ref() {
            Some(sender) => sender.try_send(item).map_err(|err| err.into_inner()),
            None => Err(item),
        }
    }

    pub fn try_pop(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Wait for an item. `None` once the queue is closed and empty.
    pub fn pop(&self) -> Option<T> {
        self.receiver.recv().ok()
    }

    pub fn pop_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Refuse further pushes. Returns false if the queue was already closed.
    pub fn close(&self) -> bool {
        self.sender.write().take().is_some()
    }

    /// Take every item still cached.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_push_pop_fifo() {
        let queue = IdleQueue::new(2);
        assert!(queue.try_push(1).is_ok());
        assert!(queue.try_push(2).is_ok());
        assert_eq!(queue.try_push(3), Err(3));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.try_pop(), Some(1));
        assert_eq!(queue.try_pop(), Some(2));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_zero_capacity_caches_nothing() {
        let queue = IdleQueue::new(0);
        assert_eq!(queue.try_push(7), Err(7));
        assert_eq!(queue.try_pop(), None);
        assert_eq!(queue.capacity(), 0);
    }

    #[test]
    fn test_close_is_one_shot_and_refuses_pushes() {
        let queue = IdleQueue::new(4);
        queue.try_push(1).unwrap();
        queue.try_push(2).unwrap();

        assert!(queue.close());
        assert!(!queue.close());
        assert!(queue.is_closed());
        assert_eq!(queue.try_push(3), Err(3));
        assert_eq!(queue.drain(), vec![1, 2]);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_close_wakes_blocked_pop() {
        let queue = IdleQueue::<u32>::new(1);
        thread::scope(|s| {
            let waiter = s.spawn(|| queue.pop());
            thread::sleep(Duration::from_millis(50));
            queue.close();
            assert_eq!(waiter.join().unwrap(), None);
        });
    }

    #[test]
    fn test_pop_timeout_expires() {
        let queue = IdleQueue::<u32>::new(1);
        assert_eq!(
            queue.pop_timeout(Duration::from_millis(20)),
            Err(RecvTimeoutError::Timeout)
        );
        queue.close();
        assert_eq!(
            queue.pop_timeout(Duration::from_millis(20)),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
