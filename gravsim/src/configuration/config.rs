//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`RunConfig`]        – duration, sample count, frame count, plotting
//! - [`EngineConfig`]     – integrator, parallel evaluation, physical constants
//! - [`RenderConfig`]     – body radius bounds, plot limits, image sizes, fps
//! - [`OutputConfig`]     – where artifacts go and how the table is written
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! run:
//!   days: 365               # seconds, days and years are summed
//!   samples: 3650
//!   frames: 365             # 0 -> no frames, no video
//!   plot: true
//!
//! engine:                   # optional
//!   integrator: "euler_cromer"   # or "verlet"
//!   parallel: false
//!   eps2: 0.0               # softening, 0 keeps coincident bodies fatal
//!
//! render:                   # optional
//!   min_radius: 5.0
//!   max_radius: 20.0
//!   limits_multiplier: 1.25
//!   fps: 30
//!
//! output:                   # optional
//!   directory: "temp"
//!   clean: true
//!
//! bodies:
//!   - name: "Sun"
//!     m: 1.989e30
//!     x: [ 0.0, 0.0 ]
//!     v: [ 0.0, 0.0 ]
//!   - name: "Earth"
//!     m: 5.972e24
//!     x: [ 1.496e11, 0.0 ]
//!     v: [ 0.0, 29780.0 ]
//! ```
//!
//! [`Scenario::build_scenario`](crate::Scenario::build_scenario) validates
//! this configuration and maps it into the runtime types.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::simulation::params::{DAY, YEAR};

/// Which integrator method used by the engine
/// integrator: "euler_cromer"` or `integrator: "verlet"
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegratorConfig {
    #[default]
    #[serde(rename = "euler_cromer")] // Positions from the old velocity, then velocities from the new positions
    EulerCromer,

    #[serde(rename = "verlet")] // Velocity Verlet, symplectic, two force evaluations per step
    Verlet,
}

/// Run length and sampling
#[derive(Deserialize, Debug, Clone)]
pub struct RunConfig {
    #[serde(default)]
    pub seconds: f64,
    #[serde(default)]
    pub days: f64,
    #[serde(default)]
    pub years: f64,
    pub samples: usize, // number of integration steps
    #[serde(default)]
    pub frames: usize, // number of animation frames, 0 disables them
    #[serde(default = "default_true")]
    pub plot: bool, // write the static trajectory plot
}

impl RunConfig {
    /// Total simulated duration in seconds
    pub fn length(&self) -> f64 {
        self.seconds + self.days * DAY + self.years * YEAR
    }
}

/// Engine options
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub integrator: IntegratorConfig, // Time integrator used for advancing the system state
    #[serde(default)]
    pub parallel: bool, // `true` - sum accelerations per body on the rayon pool
    #[serde(default)]
    pub eps2: f64, // softening, 0 = plain Newtonian gravity
    #[serde(default)]
    pub G: Option<f64>, // gravitational constant override
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::default(),
            parallel: false,
            eps2: 0.0,
            G: None,
        }
    }
}

/// Frame and plot appearance
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub min_radius: f64, // radius of the lightest body in frames [px]
    pub max_radius: f64, // radius of the heaviest body in frames [px]
    pub limits_multiplier: f64, // plot boundary over the largest initial coordinate
    pub frame_size: u32, // frame edge length [px]
    pub plot_size: u32, // trajectory plot edge length [px]
    pub fps: u32, // video frame rate
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_radius: 5.0,
            max_radius: 20.0,
            limits_multiplier: 1.25,
            frame_size: 1200,
            plot_size: 2000,
            fps: 30,
        }
    }
}

/// Output location and export behaviour
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf, // artifacts root, frames go to `<directory>/frames`
    pub clean: bool, // remove artifacts of an earlier run before starting
    pub csv_header: bool, // write a header row when the table is created
    pub video: bool, // assemble frames into a video with ffmpeg
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("temp"),
            clean: true,
            csv_header: false,
            video: true,
        }
    }
}

/// Configuration for a single body’s initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(default)]
    pub name: Option<String>, // Label, only used for logging
    pub m: f64,      // Mass of the body [kg], 0 for a massless tracer
    pub x: Vec<f64>, // Initial position [m]
    pub v: Vec<f64>, // Initial velocity [m/s]
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub run: RunConfig, // Duration and sampling
    #[serde(default)]
    pub engine: EngineConfig, // Integrator and physical constants
    #[serde(default)]
    pub render: RenderConfig, // Frame and plot appearance
    #[serde(default)]
    pub output: OutputConfig, // Artifact locations
    pub bodies: Vec<BodyConfig>, // List of bodies that define the initial state of the system
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> SimResult<Self> {
        serde_yaml::from_str(text).map_err(|e| SimError::config(e.to_string()))
    }

    pub fn from_yaml_file(path: &Path) -> SimResult<Self> {
        let file = File::open(path).map_err(|e| SimError::io(path, e))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader)
            .map_err(|e| SimError::config(format!("{}: {e}", path.display())))
    }
}

fn default_true() -> bool {
    true
}
