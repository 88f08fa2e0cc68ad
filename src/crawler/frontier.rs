//! Frontier and dedup store
//!
//! This module owns the two pieces of shared mutable crawl state:
//! - The set of every URL ever enqueued (never shrinks during a run)
//! - The FIFO queue of pending `(url, depth)` work items
//!
//! Both live behind a single mutex so that the membership test and the
//! insert happen atomically for concurrent producers, and so that FIFO order
//! holds across workers. The frontier also tracks how many dequeued items are
//! still being processed: an empty queue only means "no more work" once no
//! worker can produce new items.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use url::Url;

/// A URL waiting to be rendered, with its distance from the start URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    /// The URL to render
    pub url: Url,

    /// Link distance from the start URL (the seed is depth 0)
    pub depth: u32,
}

impl FrontierItem {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    /// The start URL at depth 0
    pub fn seed(url: Url) -> Self {
        Self::new(url, 0)
    }

    /// An item discovered on this item's page, one level deeper
    pub fn child(&self, url: Url) -> Self {
        Self::new(url, self.depth.saturating_add(1))
    }
}

#[derive(Debug, Default)]
struct FrontierState {
    seen: HashSet<String>,
    queue: VecDeque<FrontierItem>,
    in_flight: usize,
    closed: bool,
}

/// Breadth-first crawl frontier with atomic dedup
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    changed: Notify,
    max_depth: u32,
}

/// A dequeued item that is still being processed
///
/// While a claim is alive the frontier counts its item as in flight, so
/// other workers keep waiting for the links it may produce. Dropping the
/// claim marks the item as done.
#[derive(Debug)]
pub struct Claim<'a> {
    frontier: &'a Frontier,
    item: FrontierItem,
}

impl Claim<'_> {
    pub fn item(&self) -> &FrontierItem {
        &self.item
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.frontier.complete();
    }
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Deepest level that may be rendered (0 = unlimited)
    pub fn new(max_depth: u32) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            changed: Notify::new(),
            max_depth,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues `item` unless its URL has been seen before
    ///
    /// This is the single point guarding against duplicate crawling: the
    /// membership check and the insert happen under one lock.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and the item is now queued
    /// * `false` - The URL was already seen (or the frontier is closed)
    pub fn try_enqueue(&self, item: FrontierItem) -> bool {
        {
            let mut state = self.lock();
            if state.closed || !state.seen.insert(item.url.as_str().to_owned()) {
                return false;
            }
            state.queue.push_back(item);
        }
        self.changed.notify_waiters();
        true
    }

    /// Returns true if `url` has already been enqueued at some point
    pub fn is_seen(&self, url: &Url) -> bool {
        self.lock().seen.contains(url.as_str())
    }

    /// Takes the next item in FIFO order
    ///
    /// Waits while the queue is empty but other items are still in flight,
    /// since those may enqueue more links.
    ///
    /// # Returns
    ///
    /// * `Some(Claim)` - The next item; drop the claim once it is processed
    /// * `None` - Nothing is queued or in flight, or the frontier was closed
    pub async fn dequeue(&self) -> Option<Claim<'_>> {
        loop {
            let changed = {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }
                if let Some(item) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Some(Claim {
                        frontier: self,
                        item,
                    });
                }
                if state.in_flight == 0 {
                    return None;
                }
                // Registered before the lock is released, so a wakeup sent
                // after our check cannot be missed.
                self.changed.notified()
            };
            changed.await;
        }
    }

    fn complete(&self) {
        {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.changed.notify_waiters();
    }

    /// Stops the frontier: pending and future dequeues return `None` and
    /// nothing more is accepted
    pub fn close(&self) {
        self.lock().closed = true;
        self.changed.notify_waiters();
    }

    /// Returns true iff items at `depth` may be rendered
    pub fn depth_allowed(&self, depth: u32) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }

    /// Number of items waiting in the queue
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Number of distinct URLs ever enqueued
    pub fn seen_count(&self) -> usize {
        self.lock().seen.len()
    }

    /// Number of dequeued items still being processed
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }
}
