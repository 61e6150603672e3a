//! Frame sampling
//!
//! Decides which samples become animation frames and fixes everything a frame
//! needs that does not change over the run: per-body radii from the initial
//! masses and the symmetric plot boundary from the initial positions.

use crate::configuration::config::RenderConfig;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, System, NVec2};

/// Min-max scale masses into `[min, max]`
///
/// Massless bodies and sets where every mass is equal get `min`.
pub fn scale_radii(masses: &[f64], min: f64, max: f64) -> Vec<f64> {
    let max_mass = masses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_mass = masses.iter().copied().fold(f64::INFINITY, f64::min);

    masses
        .iter()
        .map(|&m| {
            if m != 0.0 && max_mass != min_mass {
                (m - min_mass) / (max_mass - min_mass) * (max - min) + min
            } else {
                min
            }
        })
        .collect()
}

/// Half-width of the square plot window: largest |x| or |y| times `multiplier`
pub fn plot_limit(bodies: &[Body], multiplier: f64) -> f64 {
    bodies
        .iter()
        .map(|b| b.x.x.abs().max(b.x.y.abs()))
        .fold(0.0, f64::max)
        * multiplier
}

/// Everything the renderer receives for one frame
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub t: f64, // simulated time of the snapshot
    pub radii: &'a [f64], // fixed per-body radii
    pub positions: Vec<NVec2>, // current positions
    pub limit: f64, // fixed plot boundary
}

#[derive(Debug, Clone)]
pub struct FrameSampler {
    stride: usize,
    radii: Vec<f64>,
    limit: f64,
}

impl FrameSampler {
    /// Prepare sampling for a run; `None` when frames are disabled
    pub fn new(params: &Parameters, initial: &System, render: &RenderConfig) -> Option<Self> {
        let stride = params.frame_stride?;
        Some(Self {
            stride,
            radii: scale_radii(&initial.masses(), render.min_radius, render.max_radius),
            limit: plot_limit(&initial.bodies, render.limits_multiplier),
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Whether 0-based sample `k` produces a frame
    pub fn should_emit(&self, k: usize) -> bool {
        k % self.stride == 0
    }

    pub fn frame<'a>(&'a self, sys: &System) -> Frame<'a> {
        Frame {
            t: sys.t,
            radii: &self.radii,
            positions: sys.positions(),
            limit: self.limit,
        }
    }
}
