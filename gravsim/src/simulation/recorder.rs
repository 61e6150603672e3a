//! Trajectory recording and tabular export
//!
//! The recorder keeps an owned copy of every sampled state. Index 0 holds the
//! initial conditions and each completed sample appends one more snapshot.

use std::fs::OpenOptions;
use std::path::Path;

use log::debug;

use crate::error::{SimError, SimResult};
use crate::simulation::states::{Body, System, NVec2};

/// Column names used when the caller asks for a header row
pub const CSV_HEADER: [&str; 5] = ["t", "x", "y", "vx", "vy"];

/// Positions and velocities of every body at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub t: f64,
    pub positions: Vec<NVec2>,
    pub velocities: Vec<NVec2>,
}

impl Snapshot {
    pub fn new(t: f64, bodies: &[Body]) -> Self {
        Self {
            t,
            positions: bodies.iter().map(|b| b.x).collect(),
            velocities: bodies.iter().map(|b| b.v).collect(),
        }
    }

    /// One table row: time, then the x, y, vx and vy arrays
    fn to_row(&self) -> [String; 5] {
        let xs: Vec<f64> = self.positions.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = self.positions.iter().map(|p| p.y).collect();
        let vxs: Vec<f64> = self.velocities.iter().map(|v| v.x).collect();
        let vys: Vec<f64> = self.velocities.iter().map(|v| v.y).collect();
        [
            self.t.to_string(),
            format!("{xs:?}"),
            format!("{ys:?}"),
            format!("{vxs:?}"),
            format!("{vys:?}"),
        ]
    }
}

/// Append-only history of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryRecord {
    snapshots: Vec<Snapshot>,
}

impl TrajectoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty record with room for the initial state plus `samples` steps
    pub fn with_capacity(samples: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(samples + 1),
        }
    }

    /// Append a copy of `bodies` at time `t`
    pub fn record(&mut self, t: f64, bodies: &[Body]) {
        self.snapshots.push(Snapshot::new(t, bodies));
    }

    pub fn record_system(&mut self, sys: &System) {
        self.record(sys.t, &sys.bodies);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn get(&self, k: usize) -> Option<&Snapshot> {
        self.snapshots.get(k)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Number of bodies tracked, taken from the first snapshot
    pub fn body_count(&self) -> usize {
        self.snapshots.first().map_or(0, |s| s.positions.len())
    }

    /// Every recorded position of body `i`, in time order
    pub fn path_of(&self, i: usize) -> Vec<NVec2> {
        self.snapshots.iter().filter_map(|s| s.positions.get(i).copied()).collect()
    }

    /// Append every snapshot to the table at `path`
    ///
    /// The file is created if missing and never truncated. A header row is
    /// written only when `header` is set, so repeated exports into one file
    /// should pass `true` at most once. Returns the number of rows written.
    pub fn export(&self, path: &Path, header: bool) -> SimResult<usize> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SimError::io(path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if header {
            writer.write_record(CSV_HEADER)?;
        }
        for snapshot in &self.snapshots {
            writer.write_record(snapshot.to_row())?;
        }
        writer.flush().map_err(|e| SimError::io(path, e))?;

        debug!("wrote {} rows to {}", self.snapshots.len(), path.display());
        Ok(self.snapshots.len())
    }
}
