//! Error type shared by the simulation, export and rendering layers
//!
//! Every fallible library call returns [`SimResult`]. The binary wraps these
//! in `anyhow` for reporting.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SimError {
    /// Invalid run configuration, rejected before a run starts
    Config(String),

    /// Two bodies occupy the same point; the pairwise force is undefined
    Singularity {
        t: f64,   // simulated time of the step that failed
        i: usize, // body receiving the force
        j: usize, // body exerting the force
    },

    /// Filesystem failure while preparing or writing output
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Trajectory table could not be written
    Csv(csv::Error),

    /// Frame or plot image could not be produced
    Render(String),

    /// Video assembly failed
    Video(String),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub fn config(msg: impl Into<String>) -> Self {
        SimError::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SimError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            SimError::Singularity { t, i, j } => write!(
                f,
                "bodies {i} and {j} coincide at t = {t} s; gravitational force is singular"
            ),
            SimError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            SimError::Csv(err) => write!(f, "trajectory export failed: {err}"),
            SimError::Render(msg) => write!(f, "rendering failed: {msg}"),
            SimError::Video(msg) => write!(f, "video assembly failed: {msg}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io { source, .. } => Some(source),
            SimError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for SimError {
    fn from(err: csv::Error) -> Self {
        SimError::Csv(err)
    }
}

impl From<image::ImageError> for SimError {
    fn from(err: image::ImageError) -> Self {
        SimError::Render(err.to_string())
    }
}
