use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use crossbeam_utils::CachePadded;
use std::mem::MaybeUninit;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

/// Shared by `MsQueue` and the batch variants: a singly linked list with
/// a permanent sentinel at the front. The sentinel's `data` is never
/// read.
pub(crate) struct Node<T> {
    data: MaybeUninit<T>,
    pub(crate) next: Atomic<Node<T>>,
}

impl<T> Node<T> {
    pub(crate) fn sentinel() -> Node<T> {
        Node {
            data: MaybeUninit::uninit(),
            next: Atomic::null(),
        }
    }

    pub(crate) fn with_value(value: T) -> Node<T> {
        Node {
            data: MaybeUninit::new(value),
            next: Atomic::null(),
        }
    }
}

/// Michael & Scott's lock-free queue (PODC 1996). `tail` may lag one
/// node behind the true last node; any operation that notices this
/// helps swing it forward. Retired nodes go through `crossbeam_epoch`
/// instead of a tracing collector.
pub struct MsQueue<T> {
    pub(crate) head: CachePadded<Atomic<Node<T>>>,
    pub(crate) tail: CachePadded<Atomic<Node<T>>>,
}

// `T` is never observed by more than one thread at a time (ownership
// moves through the queue), so `Sync` only requires `T: Send`.
unsafe impl<T: Send> Send for MsQueue<T> {}
unsafe impl<T: Send> Sync for MsQueue<T> {}

impl<T> Default for MsQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MsQueue<T> {
    pub fn new() -> MsQueue<T> {
        let queue = MsQueue {
            head: CachePadded::new(Atomic::null()),
            tail: CachePadded::new(Atomic::null()),
        };
        let guard = &epoch::pin();
        let sentinel = Owned::new(Node::sentinel()).into_shared(guard);
        queue.head.store(sentinel, Relaxed);
        queue.tail.store(sentinel, Relaxed);
        queue
    }

    pub fn enqueue(&self, value: T) {
        let guard = &epoch::pin();
        let new = Owned::new(Node::with_value(value)).into_shared(guard);
        splice_chain(&self.tail, new, new, guard, || {});
    }

    /// `None` if the queue was observed empty at the linearisation
    /// point; a concurrent `enqueue` may make a retry succeed.
    pub fn dequeue(&self) -> Option<T> {
        let guard = &epoch::pin();
        shared_dequeue(&self.head, &self.tail, guard, || false)
    }
}

/// Links the chain `[first..=last]` onto `tail` in a single CAS, helping
/// a lagging tail forward first if needed. Used for a lone node
/// (`first == last`) and for publishing a whole batch at once.
///
/// `on_contention_failure` fires only on a lost link CAS against another
/// direct enqueuer, not while merely helping a lagging tail along.
pub(crate) fn splice_chain<T>(
    tail: &CachePadded<Atomic<Node<T>>>,
    first: Shared<'_, Node<T>>,
    last: Shared<'_, Node<T>>,
    guard: &Guard,
    mut on_contention_failure: impl FnMut(),
) {
    loop {
        let t = tail.load(Acquire, guard);
        // SAFETY: tail is never null once the queue is constructed.
        let t_ref = unsafe { t.deref() };
        let next = t_ref.next.load(Acquire, guard);

        match unsafe { next.as_ref() } {
            Some(_) => {
                // `tail` is lagging; help it catch up and retry.
                let _ = tail.compare_exchange(t, next, Release, Relaxed, guard);
            }
            None => {
                if t_ref
                    .next
                    .compare_exchange(Shared::null(), first, Release, Relaxed, guard)
                    .is_ok()
                {
                    // Best-effort: if this fails, a later operation
                    // (enqueue or dequeue) will swing `tail` forward.
                    let _ = tail.compare_exchange(t, last, Release, Relaxed, guard);
                    return;
                }
                on_contention_failure();
            }
        }
    }
}

/// The Michael-Scott dequeue loop, shared by every list-based variant.
///
/// `try_splice_local` runs only when the shared list looks empty; it
/// lets the batch variants publish a pending local batch before
/// reporting absence. Return `true` if it published something (the loop
/// restarts), `false` if there was nothing to publish.
pub(crate) fn shared_dequeue<T>(
    head: &CachePadded<Atomic<Node<T>>>,
    tail: &CachePadded<Atomic<Node<T>>>,
    guard: &Guard,
    mut try_splice_local: impl FnMut() -> bool,
) -> Option<T> {
    loop {
        let h = head.load(Acquire, guard);
        let t = tail.load(Acquire, guard);
        // SAFETY: head is always non-null (permanent sentinel).
        let h_ref = unsafe { h.deref() };
        let next = h_ref.next.load(Acquire, guard);

        if h == t {
            match unsafe { next.as_ref() } {
                None => {
                    if try_splice_local() {
                        continue;
                    }
                    return None;
                }
                Some(_) => {
                    // tail is lagging behind an already-linked node; help.
                    let _ = tail.compare_exchange(t, next, Release, Relaxed, guard);
                    continue;
                }
            }
        }

        let next_ref = match unsafe { next.as_ref() } {
            Some(n) => n,
            // Another thread already advanced head past this node;
            // restart and re-read.
            None => continue,
        };

        if head.compare_exchange(h, next, Release, Relaxed, guard).is_ok() {
            // `next` becomes the new sentinel and is never retired, so
            // reading its data after the CAS is fine too.
            let value = unsafe { next_ref.data.assume_init_read() };
            // SAFETY: `h` was just unlinked by the CAS above and is
            // unreachable from any future traversal.
            unsafe {
                guard.defer_destroy(h);
            }
            return Some(value);
        }
    }
}

impl<T> Drop for MsQueue<T> {
    fn drop(&mut self) {
        // No concurrent access is possible once we have `&mut self`, so
        // an unprotected guard is sound and avoids registering with the
        // global epoch just to tear down.
        unsafe {
            let guard = &epoch::unprotected();
            // `head` is always the already-consumed sentinel; every node
            // reachable from it afterwards, including the last, still
            // holds a live value that was never dequeued.
            let mut cur = self.head.load(Relaxed, guard);
            let mut is_sentinel = true;
            while !cur.is_null() {
                let next = cur.deref().next.load(Relaxed, guard);
                let mut owned = cur.into_owned();
                if !is_sentinel {
                    owned.data.assume_init_drop();
                }
                drop(owned);
                is_sentinel = false;
                cur = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn s1_spsc_preserves_fifo_order() {
        let queue = MsQueue::new();
        for i in 1..=5 {
            queue.enqueue(i);
        }
        let drained: Vec<_> = std::iter::from_fn(|| queue.dequeue()).collect();
        assert_eq!(drained, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn dequeue_on_empty_queue_returns_none() {
        let queue: MsQueue<i32> = MsQueue::new();
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn s6_concurrent_single_enqueue_never_duplicated() {
        for _ in 0..2000 {
            let queue = Arc::new(MsQueue::new());
            let q = Arc::clone(&queue);
            let producer = thread::spawn(move || q.enqueue(42));

            let mut seen = None;
            while seen.is_none() {
                seen = queue.dequeue();
            }
            producer.join().unwrap();
            assert_eq!(seen, Some(42));
            assert_eq!(queue.dequeue(), None);
        }
    }

    #[test]
    fn s2_multi_producer_multi_consumer_no_loss_no_duplication() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Mutex;

        const TOTAL: usize = 40_000;
        let queue = Arc::new(MsQueue::new());
        let collected = Arc::new(Mutex::new(Vec::with_capacity(TOTAL)));
        let remaining = Arc::new(AtomicUsize::new(TOTAL));

        let producers: Vec<_> = (0..4i32)
            .map(|p| {
                let q = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..10_000i32 {
                        q.enqueue(p * 10_000 + i);
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let q = Arc::clone(&queue);
                let collected = Arc::clone(&collected);
                let remaining = Arc::clone(&remaining);
                thread::spawn(move || {
                    while remaining.load(Ordering::Relaxed) > 0 {
                        if let Some(v) = q.dequeue() {
                            collected.lock().unwrap().push(v);
                            remaining.fetch_sub(1, Ordering::Relaxed);
                        } else {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        for p in producers {
            p.join().unwrap();
        }
        for c in consumers {
            c.join().unwrap();
        }

        let seen: HashSet<_> = collected.lock().unwrap().iter().copied().collect();
        assert_eq!(collected.lock().unwrap().len(), TOTAL, "no duplication");
        let expected: HashSet<_> = (0..TOTAL as i32).collect();
        assert_eq!(seen, expected, "no loss");
    }
}
