//! Fixed-step time integrators for the n-body system
//!
//! Provides the Euler–Cromer style step used by default and a velocity–Verlet
//! alternative, both driven by `AccelSet` and `Parameters`

use super::engine::Engine;
use super::forces::AccelSet;
use super::params::Parameters;
use super::states::{System, NVec2};
use crate::configuration::config::IntegratorConfig;
use crate::error::SimResult;

/// Advance `sys` by one step of `params.dt` with the integrator the engine selects
pub fn advance(sys: &mut System, forces: &AccelSet, params: &Parameters, engine: &Engine) -> SimResult<()> {
    match engine.integrator {
        IntegratorConfig::EulerCromer => euler_cromer_integrator(sys, forces, params),
        IntegratorConfig::Verlet => verlet_integrator(sys, forces, params),
    }
}

/// Advance the system by one step, positions first
///
/// 1. x_n+1 = x_n + dt v_n for every body, from the pre-step velocity
/// 2. a_n+1 from the complete x_n+1 array
/// 3. v_n+1 = v_n + dt a_n+1
///
/// Step 1 finishes for every body before any acceleration is evaluated.
/// Explicit and not symplectic; `sys.t` advances by `params.dt`.
pub fn euler_cromer_integrator(sys: &mut System, forces: &AccelSet, params: &Parameters) -> SimResult<()> {
    let n = sys.bodies.len();
    if n == 0 { // no bodies, return
        return Ok(());
    }

    let dt = params.dt;

    // Drift every body with its old velocity
    for b in sys.bodies.iter_mut() {
        b.x += dt * b.v;
    }

    // Positions now belong to t_n+1
    sys.t += dt;

    let mut a = vec![NVec2::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a)?;

    // Kick with the acceleration at the new positions
    for (b, a) in sys.bodies.iter_mut().zip(a.iter()) {
        b.v += dt * *a;
    }

    Ok(())
}

/// Advance the system by one step using velocity–Verlet
/// Uses two force evaluations per step and updates positions, velocities,
/// and `sys.t` in-place based on `params.dt`
pub fn verlet_integrator(sys: &mut System, forces: &AccelSet, params: &Parameters) -> SimResult<()> {
    let n = sys.bodies.len();
    if n == 0 { // no bodies, return
        return Ok(());
    }

    let dt = params.dt; // time step dt
    let half_dt = 0.5 * dt; // half step dt/2, half update for verlet

    // a_n at the current positions
    let mut a_old = vec![NVec2::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a_old)?;

    // v_n+1/2 = v_n + (1/2 * dt) * a_n
    for (b, a) in sys.bodies.iter_mut().zip(a_old.iter()) {
        b.v += half_dt * *a;
    }

    // x_n+1 = x_n + dt v_n+1/2
    for b in sys.bodies.iter_mut() {
        b.x += dt * b.v;
    }

    sys.t += dt;

    // a_n+1 at the new positions
    let mut a_new = vec![NVec2::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a_new)?;

    // v_n+1 = v_n+1/2 + 0.5 dt a_n+1
    for (b, a) in sys.bodies.iter_mut().zip(a_new.iter()) {
        b.v += half_dt * *a;
    }

    Ok(())
}
