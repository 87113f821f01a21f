//! Numerical core: state vectors, vector fields, integrators and the
//! catalogue of dynamical systems

pub mod integrators;
pub mod math;
pub mod systems;
