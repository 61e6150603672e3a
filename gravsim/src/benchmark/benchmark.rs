use std::time::Instant;

use crate::configuration::config::IntegratorConfig;
use crate::error::SimResult;
use crate::simulation::engine::Engine;
use crate::simulation::integrator::advance;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, System, NVec2};

/// Helper to build a manual System of size `n`
fn make_system(n: usize) -> System {
    let bodies = (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec2::new((i_f * 0.37).sin() * 1.0e9, (i_f * 0.13).cos() * 1.0e9);
            Body::new(1.0e22, x, NVec2::zeros())
        })
        .collect();
    System::new(bodies)
}

/// Time one engine step for a range of n, sequential against rayon
/// Prints CSV so the output can be pasted straight into a spreadsheet
pub fn bench_step(sizes: &[usize]) -> SimResult<()> {
    println!("N,serial_ms,parallel_ms");

    for &n in sizes {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 800 { 5 } else { 1 };
        let mut per_step_ms = [0.0; 2];

        for (slot, parallel) in [false, true].into_iter().enumerate() {
            let engine = Engine {
                integrator: IntegratorConfig::EulerCromer,
                parallel,
            };
            let scenario = Scenario::from_parts(make_system(n), Parameters::new(1.0, 1, 0)?, engine)?;
            let mut sys = scenario.system.clone();

            // Warm up
            advance(&mut sys, &scenario.forces, &scenario.parameters, &scenario.engine)?;

            let t0 = Instant::now();
            for _ in 0..steps {
                advance(&mut sys, &scenario.forces, &scenario.parameters, &scenario.engine)?;
            }
            per_step_ms[slot] = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;
        }

        println!("{},{:.6},{:.6}", n, per_step_ms[0], per_step_ms[1]);
    }

    Ok(())
}
