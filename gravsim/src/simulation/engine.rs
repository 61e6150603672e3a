//! High-level runtime engine settings
//!
//! Selects the integrator and whether the per-body acceleration sum is
//! evaluated on the rayon thread pool

use crate::configuration::config::IntegratorConfig;

#[derive(Debug, Clone)]
pub struct Engine {
    pub integrator: IntegratorConfig, // euler-cromer or verlet
    pub parallel: bool, // false = sequential sum, true = rayon per-body sum
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::EulerCromer,
            parallel: false,
        }
    }
}
