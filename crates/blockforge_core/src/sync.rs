//! # Mesh Handoff Channel
//!
//! Ordered, bounded handoff between the edit/simulation thread and the
//! GPU upload worker.
//!
//! ## Architecture
//!
//! ```text
//!   edit thread                               GPU upload worker
//!   ───────────                               ─────────────────
//!   publish(mesh) ──> [ bounded FIFO ] ──> try_consume() -> mesh
//!                          │
//!                 mesh_ready_generation
//!                 (monotone timeline counter)
//! ```
//!
//! ## Thread Safety
//!
//! - Single producer (edit thread), single consumer (upload worker)
//! - The FIFO never reorders items
//! - `generation()` advances once per published item; the consumer
//!   records `last_consumed_generation()` to know how far behind it is

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Ordered, bounded handoff FIFO with a mesh-ready timeline counter.
///
/// Cloning shares the underlying channel and counters; hand one clone to
/// the upload worker and keep one on the edit thread.
pub struct MeshHandoff<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    published: Arc<AtomicU64>,
    consumed: Arc<AtomicU64>,
}

impl<T> Clone for MeshHandoff<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
            published: Arc::clone(&self.published),
            consumed: Arc::clone(&self.consumed),
        }
    }
}

impl<T> MeshHandoff<T> {
    /// Creates a handoff bounded to `capacity` in-flight items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero - a zero-capacity handoff would make
    /// every publish a rendezvous and stall the edit thread.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "mesh handoff capacity must be non-zero");
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        Self {
            tx,
            rx,
            published: Arc::new(AtomicU64::new(0)),
            consumed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publishes one item, returning the generation it was stamped with.
    ///
    /// # Errors
    ///
    /// Returns the item back when the FIFO is full; the caller decides
    /// whether to retry next frame or drop the update.
    pub fn publish(&self, item: T) -> Result<u64, T> {
        match self.tx.try_send(item) {
            Ok(()) => Ok(self.published.fetch_add(1, Ordering::AcqRel) + 1),
            Err(err) => Err(err.into_inner()),
        }
    }

    /// Consumes the oldest pending item, if any.
    pub fn try_consume(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => {
                self.consumed.fetch_add(1, Ordering::AcqRel);
                Some(item)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Returns the mesh-ready generation: total items ever published.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }

    /// Returns the generation of the last consumed item.
    #[inline]
    #[must_use]
    pub fn last_consumed_generation(&self) -> u64 {
        self.consumed.load(Ordering::Acquire)
    }

    /// Returns the number of items currently waiting in the FIFO.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Returns true if nothing is waiting.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
