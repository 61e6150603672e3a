//! Numerical and physical parameters for a run
//!
//! `Parameters` holds the validated run settings:
//! - total length, sample count and frame count,
//! - the derived step size `dt` and frame stride,
//! - gravitational constant and optional softening (`G`, `eps2`)
//!
//! Construction is the only place run settings are checked, so a driver never
//! starts a loop with a configuration that cannot be honoured.

use log::warn;

use crate::error::{SimError, SimResult};

/// Newtonian gravitational constant [m^3 kg^-1 s^-2]
pub const G: f64 = 6.67430e-11;

/// Length of a day in seconds
pub const DAY: f64 = 86_400.0;

/// Length of a Julian year in seconds
pub const YEAR: f64 = 31_557_600.0;

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub length: f64, // total simulated duration [s]
    pub samples: usize, // number of steps
    pub frames: usize, // number of rendered frames, 0 disables frames
    pub dt: f64, // step size, whole seconds, ties rounded to even
    pub frame_stride: Option<usize>, // samples between frames
    pub G: f64, // gravitational constant
    pub eps2: f64, // softening, 0 keeps coincident bodies fatal
}

impl Parameters {
    /// Validate the run settings and derive `dt` and the frame stride
    pub fn new(length: f64, samples: usize, frames: usize) -> SimResult<Self> {
        if !length.is_finite() {
            return Err(SimError::config(format!("length must be a finite number, got {length}")));
        }
        if length <= 0.0 {
            return Err(SimError::config("length must be greater than 0"));
        }
        if samples == 0 {
            return Err(SimError::config("samples must be greater than 0"));
        }
        if frames != 0 && samples % frames != 0 {
            return Err(SimError::config(format!(
                "samples ({samples}) must be a multiple of frames ({frames})"
            )));
        }

        // halves go to the even neighbour: 2.5 s -> 2 s, 3.5 s -> 4 s
        let dt = (length / samples as f64).round_ties_even();
        if dt == 0.0 {
            return Err(SimError::config(format!(
                "a length of {length} s over {samples} samples rounds the step to 0 s"
            )));
        }
        if length < samples as f64 {
            warn!("each sample should be at least 1 s long; dt rounded to {dt} s");
        }

        let frame_stride = (frames != 0).then(|| samples / frames);

        Ok(Self {
            length,
            samples,
            frames,
            dt,
            frame_stride,
            G,
            eps2: 0.0,
        })
    }

    /// Override the gravitational constant
    pub fn with_gravity(mut self, g: f64) -> SimResult<Self> {
        if !g.is_finite() || g <= 0.0 {
            return Err(SimError::config(format!("G must be a positive number, got {g}")));
        }
        self.G = g;
        Ok(self)
    }

    /// Enable Plummer softening; changes trajectories relative to plain gravity
    pub fn with_softening(mut self, eps2: f64) -> SimResult<Self> {
        if !eps2.is_finite() || eps2 < 0.0 {
            return Err(SimError::config(format!("eps2 must be >= 0, got {eps2}")));
        }
        self.eps2 = eps2;
        Ok(self)
    }

    pub fn frames_enabled(&self) -> bool {
        self.frame_stride.is_some()
    }
}
