//! Per-component state history for time plots

use super::{BoundedBuffer, TIME_SERIES_CAPACITY};
use crate::physics::math::Scalar;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesSample {
    pub time: Scalar,
    pub components: Vec<Scalar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBuffer {
    samples: BoundedBuffer<TimeSeriesSample>,
}

impl Default for TimeSeriesBuffer {
    fn default() -> Self {
        Self::new(TIME_SERIES_CAPACITY)
    }
}

impl TimeSeriesBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: BoundedBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, time: Scalar, components: &[Scalar]) {
        self.samples.push(TimeSeriesSample {
            time,
            components: components.to_vec(),
        });
    }

    pub fn snapshot(&self) -> Vec<TimeSeriesSample> {
        self.samples.snapshot()
    }

    /// `(time, value)` pairs for one state component, oldest first
    ///
    /// Samples too short to have `component` are skipped.
    pub fn series(&self, component: usize) -> Vec<(Scalar, Scalar)> {
        self.samples
            .iter()
            .filter_map(|sample| sample.components.get(component).map(|&v| (sample.time, v)))
            .collect()
    }

    pub fn latest(&self) -> Option<&TimeSeriesSample> {
        self.samples.latest()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.samples.capacity()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
