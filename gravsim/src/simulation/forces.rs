//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait, the set that sums contributions, and
//! direct Newtonian gravity with massless tracer support

use rayon::prelude::*;

use crate::error::{SimError, SimResult};
use crate::simulation::states::{System, NVec2};

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations at time `t` for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, t: f64, sys: &System, out: &mut [NVec2]) -> SimResult<()> {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(t, sys, out)?;
        }
        Ok(())
    }
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec2]) -> SimResult<()>;
}

/// Direct O(N^2) Newtonian gravity
///
/// For body `i` the sum runs over every other body `j` with non-zero mass:
/// `a_i += G * m_j * r / |r|^3` with `r = x_j - x_i`. Massless bodies are
/// skipped as sources but still receive acceleration.
///
/// With `eps2 == 0` two coincident bodies produce [`SimError::Singularity`].
/// A positive `eps2` uses `|r|^2 + eps2` in place of `|r|^2`.
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitional constant
    pub eps2: f64, // softening
    pub parallel: bool, // evaluate bodies on the rayon pool
}

impl NewtonianGravity {
    /// Acceleration on body `i` from every massive body `j != i`
    pub fn acceleration_on(&self, i: usize, sys: &System) -> SimResult<NVec2> {
        let xi = sys.bodies[i].x;
        let mut a = NVec2::zeros();

        for (j, bj) in sys.bodies.iter().enumerate() {
            if j == i || bj.is_massless() {
                continue;
            }

            // displacement from i to j, i is pulled along +r
            let r = bj.x - xi;
            let d2 = r.dot(&r) + self.eps2;
            if d2 == 0.0 {
                return Err(SimError::Singularity { t: sys.t, i, j });
            }

            let inv_r = d2.sqrt().recip();
            let inv_r3 = inv_r * inv_r * inv_r;
            a += (self.G * bj.m * inv_r3) * r;
        }

        Ok(a)
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec2]) -> SimResult<()> {
        if sys.is_empty() { // No bodies, return
            return Ok(());
        }

        if self.parallel {
            out.par_iter_mut().enumerate().try_for_each(|(i, a)| -> SimResult<()> {
                *a += self.acceleration_on(i, sys)?;
                Ok(())
            })
        } else {
            for (i, a) in out.iter_mut().enumerate() {
                *a += self.acceleration_on(i, sys)?;
            }
            Ok(())
        }
    }
}
