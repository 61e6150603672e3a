//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! containing:
//! - engine settings (`Engine`)
//! - validated run parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//! - active force set (`AccelSet`)
//! - render and output settings
//!
//! All configuration errors surface here, before a driver ever sees the
//! scenario.

use log::info;

use crate::configuration::config::{BodyConfig, OutputConfig, RenderConfig, ScenarioConfig};
use crate::error::{SimError, SimResult};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{AccelSet, NewtonianGravity};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, System, NVec2};

/// Runtime bundle consumed by the simulation driver
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: AccelSet,
    pub render: RenderConfig,
    pub output: OutputConfig,
    pub plot: bool,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies = cfg
            .bodies
            .iter()
            .enumerate()
            .map(|(i, bc)| body_from_config(i, bc))
            .collect::<SimResult<Vec<Body>>>()?;

        let mut parameters = Parameters::new(cfg.run.length(), cfg.run.samples, cfg.run.frames)?
            .with_softening(cfg.engine.eps2)?;
        if let Some(g) = cfg.engine.G {
            parameters = parameters.with_gravity(g)?;
        }

        let engine = Engine {
            integrator: cfg.engine.integrator,
            parallel: cfg.engine.parallel,
        };

        let mut scenario = Self::from_parts(System::new(bodies), parameters, engine)?;
        validate_render(&cfg.render)?;
        scenario.render = cfg.render;
        scenario.output = cfg.output;
        scenario.plot = cfg.run.plot;

        info!(
            "scenario: {} bodies, length {} s, {} samples (dt {} s), {} frames",
            scenario.system.len(),
            scenario.parameters.length,
            scenario.parameters.samples,
            scenario.parameters.dt,
            scenario.parameters.frames,
        );

        Ok(scenario)
    }

    /// Assemble a scenario from already-built parts with default render and
    /// output settings and plotting switched off
    pub fn from_parts(system: System, parameters: Parameters, engine: Engine) -> SimResult<Self> {
        validate_system(&system)?;

        // Forces: construct an AccelSet and register Newtonian gravity
        let forces = AccelSet::new().with(NewtonianGravity {
            G: parameters.G,
            eps2: parameters.eps2,
            parallel: engine.parallel,
        });

        Ok(Self {
            engine,
            parameters,
            system,
            forces,
            render: RenderConfig::default(),
            output: OutputConfig::default(),
            plot: false,
        })
    }
}

fn body_from_config(i: usize, bc: &BodyConfig) -> SimResult<Body> {
    let label = bc.name.clone().unwrap_or_else(|| format!("#{i}"));
    let &[x, y] = bc.x.as_slice() else {
        return Err(SimError::config(format!(
            "body {label}: position needs 2 components, got {}",
            bc.x.len()
        )));
    };
    let &[vx, vy] = bc.v.as_slice() else {
        return Err(SimError::config(format!(
            "body {label}: velocity needs 2 components, got {}",
            bc.v.len()
        )));
    };

    let mut body = Body::new(bc.m, NVec2::new(x, y), NVec2::new(vx, vy));
    body.name = bc.name.clone();
    Ok(body)
}

fn validate_system(system: &System) -> SimResult<()> {
    if system.is_empty() {
        return Err(SimError::config("a scenario needs at least one body"));
    }
    for (i, b) in system.bodies.iter().enumerate() {
        let label = b.name.clone().unwrap_or_else(|| format!("#{i}"));
        if !b.m.is_finite() || b.m < 0.0 {
            return Err(SimError::config(format!(
                "body {label}: mass must be a non-negative number, got {}",
                b.m
            )));
        }
        if !(b.x.iter().all(|c| c.is_finite()) && b.v.iter().all(|c| c.is_finite())) {
            return Err(SimError::config(format!(
                "body {label}: position and velocity must be finite"
            )));
        }
    }
    Ok(())
}

fn validate_render(render: &RenderConfig) -> SimResult<()> {
    if !(render.min_radius >= 0.0 && render.min_radius <= render.max_radius) {
        return Err(SimError::config(format!(
            "render radii must satisfy 0 <= min_radius <= max_radius, got [{}, {}]",
            render.min_radius, render.max_radius
        )));
    }
    if !(render.limits_multiplier > 0.0 && render.limits_multiplier.is_finite()) {
        return Err(SimError::config("limits_multiplier must be positive"));
    }
    if render.fps == 0 {
        return Err(SimError::config("fps must be greater than 0"));
    }
    if render.frame_size == 0 || render.plot_size == 0 {
        return Err(SimError::config("image sizes must be greater than 0"));
    }
    Ok(())
}
