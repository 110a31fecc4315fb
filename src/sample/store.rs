//! Bounded sample ring buffer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Sample;

/// Fixed-capacity FIFO of samples. Appending past capacity evicts the oldest.
///
/// Each entry carries label, value and flag together, so the three logical
/// sequences can never differ in length.
#[derive(Debug, Clone)]
pub struct SampleStore {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleStore {
    /// Creates an empty store. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest one when full.
    /// Returns the evicted sample, if any.
    pub fn append(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Copies the buffered samples, oldest first.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Store shared between the bus delivery thread (writer) and the UI thread
/// (reader). Every append and every snapshot holds the lock for the whole
/// operation, so readers never see a partially written sample.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<SampleStore>>,
}

impl SharedStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SampleStore::new(capacity))),
        }
    }

    pub fn append(&self, sample: Sample) -> Option<Sample> {
        self.lock().append(sample)
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.lock().snapshot()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // A panic while holding the lock cannot leave a half-appended sample
    // behind (push/pop are the only mutations), so a poisoned store is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, SampleStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
