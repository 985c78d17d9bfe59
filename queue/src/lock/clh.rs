use super::SpinLock;
use crate::loom_shim::{spin_loop_hint, AtomicBool, AtomicPtr, Ordering};
use crossbeam_utils::CachePadded;
use std::cell::Cell;
use std::ptr;
use thread_local::ThreadLocal;

struct ClhNode {
    locked: AtomicBool,
}

impl ClhNode {
    fn new(locked: bool) -> *mut ClhNode {
        Box::into_raw(Box::new(ClhNode {
            locked: AtomicBool::new(locked),
        }))
    }
}

/// Fair, FIFO, local-spin queue-lock (Craig, Landin & Hagersten).
///
/// Each waiter spins on a field reachable only through its own
/// predecessor node, unlike [`TasLock`](super::TasLock)'s single shared
/// flag. Node pointers are stored as `usize` inside `ThreadLocal` cells
/// (raw pointers aren't `Send`); a node is recycled into the thread's
/// "current node" slot on release instead of freed.
pub struct ClhLock {
    tail: CachePadded<AtomicPtr<ClhNode>>,
    my_node: ThreadLocal<Cell<usize>>,
    my_pred: ThreadLocal<Cell<usize>>,
}

impl Default for ClhLock {
    fn default() -> Self {
        let sentinel = ClhNode::new(false);
        ClhLock {
            tail: CachePadded::new(AtomicPtr::new(sentinel)),
            my_node: ThreadLocal::new(),
            my_pred: ThreadLocal::new(),
        }
    }
}

impl SpinLock for ClhLock {
    fn acquire(&self) {
        let node_cell = self
            .my_node
            .get_or(|| Cell::new(ClhNode::new(true) as usize));
        let node = node_cell.get() as *mut ClhNode;
        // SAFETY: `node` was allocated by `ClhNode::new` and is owned
        // exclusively by this thread until it is published below.
        unsafe {
            (*node).locked.store(true, Ordering::Relaxed);
        }

        let pred = self.tail.swap(node, Ordering::AcqRel);
        // SAFETY: `pred` was the tail at some prior acquire (or the
        // permanent sentinel) and is never freed, only recycled, so the
        // pointer stays valid for the program's lifetime.
        unsafe {
            while (*pred).locked.load(Ordering::Acquire) {
                spin_loop_hint();
            }
        }

        self.my_pred
            .get_or(|| Cell::new(ptr::null_mut::<ClhNode>() as usize))
            .set(pred as usize);
    }

    fn release(&self) {
        let node_cell = self.my_node.get().expect("release without acquire");
        let node = node_cell.get() as *mut ClhNode;
        // SAFETY: this thread installed `node` as `tail` in `acquire` and
        // is its sole writer until the next `acquire` call.
        unsafe {
            (*node).locked.store(false, Ordering::Release);
        }

        // recycle pred as this thread's node for the next round
        let pred = self.my_pred.get().expect("release without acquire").get();
        node_cell.set(pred);
    }
}

// ThreadLocal<Cell<usize>> is Sync whenever Cell<usize>: Send, which it
// is; raw ClhNode pointers never cross threads except through the
// AtomicPtr swap, which is the synchronization point.
unsafe impl Send for ClhLock {}
unsafe impl Sync for ClhLock {}
