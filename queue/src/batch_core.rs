use crate::ms_queue::{shared_dequeue, splice_chain, Node};
use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use crossbeam_utils::CachePadded;
use std::cell::Cell;
use std::sync::atomic::Ordering::Relaxed;
use thread_local::ThreadLocal;

pub(crate) const DEFAULT_BATCH_THRESHOLD: usize = 16;
pub(crate) const MIN_BATCH_THRESHOLD: usize = 2;

/// A per-thread staging buffer, never observed by any thread but its
/// owner. Node pointers are kept as `usize` addresses (raw pointers
/// aren't `Send`); `0` stands for "no node".
#[derive(Default)]
pub(crate) struct LocalBuf {
    first: Cell<usize>,
    last: Cell<usize>,
    size: Cell<usize>,
}

impl LocalBuf {
    fn is_empty(&self) -> bool {
        self.size.get() == 0
    }
}

/// State shared by [`BatchQueue`](crate::BatchQueue) and
/// [`BackoffBatchQueue`](crate::BackoffBatchQueue): the
/// [`MsQueue`](crate::MsQueue) list layout plus a thread-local staging
/// buffer and a batch-size tunable. The two queue types differ only in
/// what they do when the splice CAS loses to a direct enqueuer.
pub(crate) struct BatchCore<T> {
    pub(crate) head: CachePadded<Atomic<Node<T>>>,
    pub(crate) tail: CachePadded<Atomic<Node<T>>>,
    pub(crate) batch_threshold: usize,
    local: ThreadLocal<LocalBuf>,
}

unsafe impl<T: Send> Send for BatchCore<T> {}
unsafe impl<T: Send> Sync for BatchCore<T> {}

impl<T> BatchCore<T> {
    pub(crate) fn new(batch_threshold: usize) -> Self {
        let core = BatchCore {
            head: CachePadded::new(Atomic::null()),
            tail: CachePadded::new(Atomic::null()),
            batch_threshold: batch_threshold.max(MIN_BATCH_THRESHOLD),
            local: ThreadLocal::new(),
        };
        let guard = &epoch::pin();
        let sentinel = Owned::new(Node::sentinel()).into_shared(guard);
        core.head.store(sentinel, Relaxed);
        core.tail.store(sentinel, Relaxed);
        core
    }

    /// Appends `value` to this thread's local buffer, splicing the
    /// whole buffer onto the shared list once it reaches
    /// `batch_threshold`. No empty-buffer fast path: see DESIGN.md
    /// resolution 4 for why every item stages here rather than
    /// publishing directly when the buffer happens to be empty.
    pub(crate) fn enqueue(&self, value: T, on_contention_failure: impl FnMut()) {
        let guard = &epoch::pin();
        let buf = self.local.get_or(LocalBuf::default);
        let new = Owned::new(Node::with_value(value)).into_shared(guard);
        let new_addr = new.as_raw() as usize;

        if buf.is_empty() {
            buf.first.set(new_addr);
        } else {
            let last_addr = buf.last.get();
            // SAFETY: `last_addr` was allocated by this same thread in a
            // previous call and is reachable only through this buffer
            // until the splice below publishes it.
            let last: Shared<'_, Node<T>> = Shared::from(last_addr as *const Node<T>);
            unsafe {
                last.deref().next.store(new, Relaxed);
            }
        }
        buf.last.set(new_addr);
        buf.size.set(buf.size.get() + 1);

        if buf.size.get() >= self.batch_threshold {
            self.splice_buf(buf, guard, on_contention_failure);
        }
    }

    pub(crate) fn dequeue(&self) -> Option<T> {
        let guard = &epoch::pin();
        shared_dequeue(&self.head, &self.tail, guard, || match self.local.get() {
            Some(buf) if !buf.is_empty() => {
                self.splice_buf(buf, guard, || {});
                true
            }
            _ => false,
        })
    }

    pub(crate) fn flush_local(&self) {
        let guard = &epoch::pin();
        if let Some(buf) = self.local.get() {
            if !buf.is_empty() {
                self.splice_buf(buf, guard, || {});
            }
        }
    }

    fn splice_buf(&self, buf: &LocalBuf, guard: &Guard, on_contention_failure: impl FnMut()) {
        let first: Shared<'_, Node<T>> = Shared::from(buf.first.get() as *const Node<T>);
        let last: Shared<'_, Node<T>> = Shared::from(buf.last.get() as *const Node<T>);
        splice_chain(&self.tail, first, last, guard, on_contention_failure);
        buf.first.set(0);
        buf.last.set(0);
        buf.size.set(0);
    }
}

impl<T> Drop for BatchCore<T> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` means no other thread can be operating on
        // this queue; an unprotected guard is sound for teardown.
        unsafe {
            let guard = &epoch::unprotected();

            // Every node reachable from `head` except `head` itself
            // holds a live, un-dequeued value (`head` is always the
            // already-consumed sentinel).
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

            // Any thread's unspliced local batch also holds live values,
            // and every node in it (including the first) is real data.
            for buf in self.local.iter_mut() {
                let mut cur_addr = buf.first.get();
                while cur_addr != 0 {
                    let cur: Shared<'_, Node<T>> = Shared::from(cur_addr as *const Node<T>);
                    let next_addr = cur.deref().next.load(Relaxed, guard).as_raw() as usize;
                    let mut owned = cur.into_owned();
                    owned.data.assume_init_drop();
                    drop(owned);
                    cur_addr = next_addr;
                }
            }
        }
    }
}
