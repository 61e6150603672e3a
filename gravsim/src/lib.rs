pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::{SimError, SimResult};

pub use simulation::states::{Body, System, NVec2};
pub use simulation::params::{Parameters, G, DAY, YEAR};
pub use simulation::engine::Engine;
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity};
pub use simulation::integrator::{advance, euler_cromer_integrator, verlet_integrator};
pub use simulation::scenario::Scenario;
pub use simulation::recorder::{Snapshot, TrajectoryRecord};
pub use simulation::sampler::{plot_limit, scale_radii, Frame, FrameSampler};
pub use simulation::progress::{LogProgress, NoProgress, ProgressSink};
pub use simulation::driver::{CancelToken, OutputLayout, RunMonitor, RunOutcome, RunReport, RunState, SimulationDriver};

pub use configuration::config::{IntegratorConfig, EngineConfig, RunConfig, RenderConfig, OutputConfig, BodyConfig, ScenarioConfig};

pub use visualization::{FrameRenderer, TrajectoryPlotter, VideoAssembler};
pub use visualization::frames::ImageFrameRenderer;
pub use visualization::plot::TrajectoryPlot;
pub use visualization::video::{frame_file_name, ordered_frames, FfmpegAssembler};

pub use benchmark::benchmark::bench_step;
