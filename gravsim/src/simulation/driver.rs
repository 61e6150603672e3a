//! Simulation driver
//!
//! Runs the sample loop for a [`Scenario`]: advance, record, report progress,
//! emit frames, then hand the finished history to the plot, video and table
//! exporters. Everything runs on the caller's thread.
//!
//! The driver owns the live [`System`] for the duration of a run. Hosts
//! observe it only through a [`RunMonitor`] and stop it through a
//! [`CancelToken`]; both are cheap clones that can cross threads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{info, warn};

use crate::configuration::config::RenderConfig;
use crate::error::{SimError, SimResult};
use crate::simulation::integrator::advance;
use crate::simulation::progress::ProgressSink;
use crate::simulation::recorder::TrajectoryRecord;
use crate::simulation::sampler::FrameSampler;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::System;
use crate::visualization::frames::ImageFrameRenderer;
use crate::visualization::plot::TrajectoryPlot;
use crate::visualization::video::{frame_file_name, FfmpegAssembler};
use crate::visualization::{FrameRenderer, TrajectoryPlotter, VideoAssembler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Shared view of a driver's run state
#[derive(Debug, Clone)]
pub struct RunMonitor {
    state: Arc<Mutex<RunState>>,
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(RunState::Idle)),
        }
    }
}

impl RunMonitor {
    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    fn set(&self, next: RunState) {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = next;
    }
}

/// Cooperative stop request, checked once per sample
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Result of a run that did not fail
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub record: TrajectoryRecord,
    pub frames_emitted: usize,
    pub final_state: System,
}

/// Where a run writes its artifacts
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub frames_dir: PathBuf,
    pub table: PathBuf,
    pub plot: PathBuf,
    pub video: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            frames_dir: root.join("frames"),
            table: root.join("positions.csv"),
            plot: root.join("plot.png"),
            video: root.join("simulation.mp4"),
            root,
        }
    }

    pub fn frame_path(&self, t: f64) -> PathBuf {
        self.frames_dir.join(frame_file_name(t))
    }

    /// Create the output tree, optionally removing the artifacts of an earlier run
    ///
    /// Cleaning only touches `positions.csv`, `plot.png`, `simulation.mp4` and
    /// `frames/`; anything else under `root` is left alone.
    pub fn prepare(&self, clean: bool, with_frames: bool) -> SimResult<()> {
        if clean {
            self.clean()?;
        }
        fs::create_dir_all(&self.root).map_err(|e| SimError::io(&self.root, e))?;
        if with_frames {
            fs::create_dir_all(&self.frames_dir).map_err(|e| SimError::io(&self.frames_dir, e))?;
        }
        Ok(())
    }

    fn clean(&self) -> SimResult<()> {
        for file in [&self.table, &self.plot, &self.video] {
            if file.is_file() {
                info!("removing {}", file.display());
                fs::remove_file(file).map_err(|e| SimError::io(file, e))?;
            }
        }
        if self.frames_dir.is_dir() {
            info!("removing {}", self.frames_dir.display());
            fs::remove_dir_all(&self.frames_dir).map_err(|e| SimError::io(&self.frames_dir, e))?;
        }
        Ok(())
    }
}

/// Drives one scenario at a time through the sample loop
pub struct SimulationDriver {
    renderer: Option<Box<dyn FrameRenderer>>,
    plotter: Option<Box<dyn TrajectoryPlotter>>,
    video: Option<Box<dyn VideoAssembler>>,
    cancel: CancelToken,
    monitor: RunMonitor,
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationDriver {
    /// Driver without collaborators: only the trajectory table is written
    pub fn new() -> Self {
        Self {
            renderer: None,
            plotter: None,
            video: None,
            cancel: CancelToken::new(),
            monitor: RunMonitor::default(),
        }
    }

    /// Driver with the PNG frame renderer, PNG plot and ffmpeg video assembly
    pub fn with_default_outputs(render: &RenderConfig) -> Self {
        Self::new()
            .with_renderer(ImageFrameRenderer::new(render.frame_size))
            .with_plotter(TrajectoryPlot::new(render.plot_size))
            .with_video(FfmpegAssembler::default())
    }

    pub fn with_renderer(mut self, renderer: impl FrameRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_plotter(mut self, plotter: impl TrajectoryPlotter + 'static) -> Self {
        self.plotter = Some(Box::new(plotter));
        self
    }

    pub fn with_video(mut self, video: impl VideoAssembler + 'static) -> Self {
        self.video = Some(Box::new(video));
        self
    }

    pub fn without_video(mut self) -> Self {
        self.video = None;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn monitor(&self) -> RunMonitor {
        self.monitor.clone()
    }

    /// Run `scenario` to completion, cancellation or failure
    ///
    /// Output directories are created before the first step. On failure the
    /// partial record is still appended to the table and frames already
    /// written are left in place.
    pub fn run(&mut self, scenario: &Scenario, progress: &mut dyn ProgressSink) -> SimResult<RunReport> {
        self.monitor.set(RunState::Running);
        let result = self.execute(scenario, progress);
        self.monitor.set(match &result {
            Ok(report) if report.outcome == RunOutcome::Cancelled => RunState::Cancelled,
            Ok(_) => RunState::Completed,
            Err(_) => RunState::Failed,
        });
        result
    }

    fn execute(&mut self, scenario: &Scenario, progress: &mut dyn ProgressSink) -> SimResult<RunReport> {
        let params = &scenario.parameters;
        let layout = OutputLayout::new(&scenario.output.directory);
        layout.prepare(scenario.output.clean, params.frames_enabled())?;
        let header = scenario.output.csv_header && table_is_new(&layout.table);

        progress.set_progress(0);
        progress.set_status("Initializing the simulation");

        let mut sys = scenario.system.clone();
        let mut record = TrajectoryRecord::with_capacity(params.samples);
        record.record_system(&sys);

        let sampler = FrameSampler::new(params, &sys, &scenario.render);
        if let Some(sampler) = &sampler {
            info!(
                "frames every {} samples, plot limit {:e} m",
                sampler.stride(),
                sampler.limit()
            );
            progress.set_status("Scaling the array, preparing frames");
        }

        let mut frames_emitted = 0;
        let looped = self.sample_loop(
            scenario,
            &layout,
            sampler.as_ref(),
            &mut sys,
            &mut record,
            &mut frames_emitted,
            progress,
        );

        let outcome = match looped {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("run failed after {} samples: {err}", record.len() - 1);
                if let Err(export_err) = record.export(&layout.table, header) {
                    warn!("partial trajectory not saved: {export_err}");
                }
                return Err(err);
            }
        };

        if outcome == RunOutcome::Cancelled {
            warn!("run cancelled after {} samples", record.len() - 1);
            progress.set_status("Cancelled, saving recorded samples");
            record.export(&layout.table, header)?;
            return Ok(RunReport { outcome, record, frames_emitted, final_state: sys });
        }

        info!("sampling done");
        progress.set_status("Sampling done");

        // keep going after a plot or video failure so the table is still written
        let mut deferred: Option<SimError> = None;

        if scenario.plot {
            if let Some(plotter) = self.plotter.as_mut() {
                info!("plotting trajectories to {}", layout.plot.display());
                progress.set_status("Plotting the graph");
                if let Err(err) = plotter.plot(&record, &layout.plot) {
                    warn!("{err}");
                    deferred.get_or_insert(err);
                }
            }
        }

        if params.frames_enabled() && scenario.output.video {
            if let Some(video) = self.video.as_mut() {
                info!("video processing started");
                progress.set_status("Video processing started");
                if let Err(err) = video.assemble(&layout.frames_dir, scenario.render.fps, &layout.video) {
                    warn!("{err}");
                    deferred.get_or_insert(err);
                }
            }
        }

        info!("saving trajectory to {}", layout.table.display());
        progress.set_status("Saving data into a csv file");
        record.export(&layout.table, header)?;

        if let Some(err) = deferred {
            return Err(err);
        }

        progress.set_status("Done");
        Ok(RunReport { outcome, record, frames_emitted, final_state: sys })
    }

    #[allow(clippy::too_many_arguments)]
    fn sample_loop(
        &mut self,
        scenario: &Scenario,
        layout: &OutputLayout,
        sampler: Option<&FrameSampler>,
        sys: &mut System,
        record: &mut TrajectoryRecord,
        frames_emitted: &mut usize,
        progress: &mut dyn ProgressSink,
    ) -> SimResult<RunOutcome> {
        let samples = scenario.parameters.samples;
        let mut previous_percent = 0;

        for k in 0..samples {
            if self.cancel.is_cancelled() {
                return Ok(RunOutcome::Cancelled);
            }

            advance(sys, &scenario.forces, &scenario.parameters, &scenario.engine)?;
            record.record_system(sys);

            let percent = ((k + 1) * 100 / samples) as u8;
            if percent != previous_percent {
                progress.set_progress(percent);
                previous_percent = percent;
            }
            progress.set_status(&format!("Sample {} out of {samples} - {percent}%", k + 1));

            if let Some(sampler) = sampler {
                if sampler.should_emit(k) {
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.render(&sampler.frame(sys), &layout.frame_path(sys.t))?;
                    }
                    *frames_emitted += 1;
                }
            }
        }

        Ok(RunOutcome::Completed)
    }
}

fn table_is_new(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
}
