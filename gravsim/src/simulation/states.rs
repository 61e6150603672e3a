//! Core state types for the 2D n-body simulation
//!
//! - `Body`   a single point mass using `NVec2`
//! - `System` the list of bodies plus the current simulation time `t`
//!
//! Bodies keep their index for the whole run; nothing is inserted or removed
//! once a `System` is built.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: Option<String>, // label from the scenario, if any
    pub x: NVec2, // position [m]
    pub v: NVec2, // velocity [m/s]
    pub m: f64, // mass [kg], 0 marks a massless tracer
}

impl Body {
    pub fn new(m: f64, x: NVec2, v: NVec2) -> Self {
        Self { name: None, x, v, m }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Tracers feel gravity but are never a source of it
    pub fn is_massless(&self) -> bool {
        self.m == 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies
    pub t: f64, // simulated time [s]
}

impl System {
    /// Initial state at t = 0
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn masses(&self) -> Vec<f64> {
        self.bodies.iter().map(|b| b.m).collect()
    }

    pub fn positions(&self) -> Vec<NVec2> {
        self.bodies.iter().map(|b| b.x).collect()
    }

    pub fn velocities(&self) -> Vec<NVec2> {
        self.bodies.iter().map(|b| b.v).collect()
    }
}
