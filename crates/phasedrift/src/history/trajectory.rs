//! Coloured trajectory and its planar projections

use super::{BoundedBuffer, TRAJECTORY_CAPACITY};
use crate::physics::math::Vector;
use crate::utils::color::Rgb;
use bevy::math::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub position: Vector,
    pub color: Rgb,
}

/// Recent positions of the system, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryBuffer {
    points: BoundedBuffer<TrajectoryPoint>,
}

impl Default for TrajectoryBuffer {
    fn default() -> Self {
        Self::new(TRAJECTORY_CAPACITY)
    }
}

impl TrajectoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: BoundedBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, position: Vector, color: Rgb) {
        self.points.push(TrajectoryPoint { position, color });
    }

    pub fn snapshot(&self) -> Vec<TrajectoryPoint> {
        self.points.snapshot()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TrajectoryPoint> + ExactSizeIterator {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&TrajectoryPoint> {
        self.points.latest()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Coordinate plane a 3D position is projected onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Xy, Plane::Xz, Plane::Yz];

    pub fn project(self, position: Vector) -> DVec2 {
        match self {
            Plane::Xy => DVec2::new(position.x, position.y),
            Plane::Xz => DVec2::new(position.x, position.z),
            Plane::Yz => DVec2::new(position.y, position.z),
        }
    }
}

/// One bounded 2D history per coordinate plane, all sharing a capacity
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionBuffers {
    xy: BoundedBuffer<DVec2>,
    xz: BoundedBuffer<DVec2>,
    yz: BoundedBuffer<DVec2>,
}

impl Default for ProjectionBuffers {
    fn default() -> Self {
        Self::new(TRAJECTORY_CAPACITY)
    }
}

impl ProjectionBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            xy: BoundedBuffer::new(capacity),
            xz: BoundedBuffer::new(capacity),
            yz: BoundedBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, position: Vector) {
        for plane in Plane::ALL {
            self.plane_mut(plane).push(plane.project(position));
        }
    }

    pub fn plane(&self, plane: Plane) -> &BoundedBuffer<DVec2> {
        match plane {
            Plane::Xy => &self.xy,
            Plane::Xz => &self.xz,
            Plane::Yz => &self.yz,
        }
    }

    fn plane_mut(&mut self, plane: Plane) -> &mut BoundedBuffer<DVec2> {
        match plane {
            Plane::Xy => &mut self.xy,
            Plane::Xz => &mut self.xz,
            Plane::Yz => &mut self.yz,
        }
    }

    pub fn snapshot(&self, plane: Plane) -> Vec<DVec2> {
        self.plane(plane).snapshot()
    }

    pub fn len(&self) -> usize {
        self.xy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xy.is_empty()
    }

    pub fn clear(&mut self) {
        for plane in Plane::ALL {
            self.plane_mut(plane).clear();
        }
    }
}
