//! Bounded histories of the simulated state
//!
//! All buffers are FIFO with a fixed capacity: pushing onto a full buffer
//! evicts the oldest entry, and iteration is always oldest first.

use std::collections::VecDeque;

pub mod time_series;
pub mod trajectory;

pub use time_series::{TimeSeriesBuffer, TimeSeriesSample};
pub use trajectory::{Plane, ProjectionBuffers, TrajectoryBuffer, TrajectoryPoint};

/// Default number of points kept for the trajectory and its projections
pub const TRAJECTORY_CAPACITY: usize = 1000;

/// Default number of samples kept for the time-series plots
pub const TIME_SERIES_CAPACITY: usize = 200;

/// Fixed-capacity FIFO
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedBuffer<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    /// A capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `entry`, returning the evicted oldest entry if the buffer was full
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Entries oldest first
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a BoundedBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
