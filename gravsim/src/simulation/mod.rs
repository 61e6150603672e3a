pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod scenario;
pub mod recorder;
pub mod sampler;
pub mod progress;
pub mod driver;
