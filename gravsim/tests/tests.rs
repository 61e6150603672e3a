use approx::assert_relative_eq;

use gravsim::{
    advance, plot_limit, scale_radii, verlet_integrator, Body, Engine, FrameSampler, IntegratorConfig,
    NVec2, Parameters, RenderConfig, Scenario, ScenarioConfig, SimError, System, TrajectoryRecord, G,
};

/// Build a simple 2-body System separated along the x-axis, at rest
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> System {
    System::new(vec![
        Body::new(m1, NVec2::new(-dist / 2.0, 0.0), NVec2::zeros()),
        Body::new(m2, NVec2::new(dist / 2.0, 0.0), NVec2::zeros()),
    ])
}

/// Scenario with default engine settings; dt = length / samples
pub fn scenario_for(system: System, length: f64, samples: usize) -> Scenario {
    let params = Parameters::new(length, samples, 0).unwrap();
    Scenario::from_parts(system, params, Engine::default()).unwrap()
}

/// Advance a copy of the scenario's initial state `steps` times
pub fn run_steps(scenario: &Scenario, steps: usize) -> System {
    let mut sys = scenario.system.clone();
    for _ in 0..steps {
        advance(&mut sys, &scenario.forces, &scenario.parameters, &scenario.engine).unwrap();
    }
    sys
}

// ==================================================================================
// Engine tests
// ==================================================================================

#[test]
fn single_body_moves_in_a_straight_line() {
    let x0 = NVec2::new(1.0e6, -2.0e6);
    let v0 = NVec2::new(300.0, -40.0);
    let scenario = scenario_for(System::new(vec![Body::new(5.0e24, x0, v0)]), 1000.0, 10);

    let mut sys = scenario.system.clone();
    for k in 1..=10 {
        advance(&mut sys, &scenario.forces, &scenario.parameters, &scenario.engine).unwrap();
        let t = k as f64 * 100.0;

        assert_eq!(sys.bodies[0].v, v0, "velocity changed at step {k}");
        assert_relative_eq!(sys.t, t);
        assert_relative_eq!(sys.bodies[0].x.x, x0.x + v0.x * t, max_relative = 1e-12);
        assert_relative_eq!(sys.bodies[0].x.y, x0.y + v0.y * t, max_relative = 1e-12);
    }
}

#[test]
fn equal_masses_pull_toward_each_other() {
    let m = 1.0e24;
    let d = 2.0e7;
    let scenario = scenario_for(two_body_system(d, m, m), 10.0, 1);
    let dt = scenario.parameters.dt;

    let sys = run_steps(&scenario, 1);
    let v0 = sys.bodies[0].v;
    let v1 = sys.bodies[1].v;

    // at rest, so positions did not move before the force evaluation
    assert_eq!(sys.bodies[0].x, scenario.system.bodies[0].x);

    assert_relative_eq!(v0.norm() / dt, G * m / (d * d), max_relative = 1e-12);
    assert!(v0.x > 0.0, "left body should move right");
    assert!(v1.x < 0.0, "right body should move left");
    assert_eq!(v0.y, 0.0);
    assert_eq!(v0, -v1, "velocities not equal and opposite");
}

#[test]
fn gravity_inverse_square_law() {
    let near = run_steps(&scenario_for(two_body_system(1.0e7, 1.0e24, 1.0e24), 1.0, 1), 1);
    let far = run_steps(&scenario_for(two_body_system(2.0e7, 1.0e24, 1.0e24), 1.0, 1), 1);

    let ratio = near.bodies[0].v.norm() / far.bodies[0].v.norm();
    assert_relative_eq!(ratio, 4.0, max_relative = 1e-12);
}

#[test]
fn positions_update_before_forces() {
    // body 1 moves 1e6 m toward body 0 during the step, so the force uses the
    // new separation of 1e7 m rather than the initial 1.1e7 m
    let m = 1.0e24;
    let system = System::new(vec![
        Body::new(m, NVec2::zeros(), NVec2::zeros()),
        Body::new(0.0, NVec2::new(1.1e7, 0.0), NVec2::new(-1.0e4, 0.0)),
    ]);
    let scenario = scenario_for(system, 100.0, 1);

    let sys = run_steps(&scenario, 1);
    assert_relative_eq!(sys.bodies[1].x.x, 1.0e7);

    let expected_dv = -G * m / (1.0e7 * 1.0e7) * 100.0;
    assert_relative_eq!(sys.bodies[1].v.x, -1.0e4 + expected_dv, max_relative = 1e-12);
}

#[test]
fn massless_body_never_perturbs_massive_ones() {
    let base = System::new(vec![
        Body::new(5.0e24, NVec2::new(-1.0e7, 0.0), NVec2::new(0.0, -200.0)),
        Body::new(3.0e24, NVec2::new(1.0e7, 0.0), NVec2::new(0.0, 300.0)),
    ]);
    let mut with_tracer = base.clone();
    with_tracer
        .bodies
        .insert(1, Body::new(0.0, NVec2::new(0.0, 5.0e6), NVec2::new(100.0, 0.0)));

    let plain = run_steps(&scenario_for(base, 5000.0, 50), 50);
    let traced = run_steps(&scenario_for(with_tracer, 5000.0, 50), 50);

    assert_eq!(plain.bodies[0], traced.bodies[0]);
    assert_eq!(plain.bodies[1], traced.bodies[2]);

    // the tracer itself is pulled
    assert_ne!(traced.bodies[1].v, NVec2::new(100.0, 0.0));
}

#[test]
fn coincident_bodies_are_a_singularity() {
    let system = System::new(vec![
        Body::new(1.0e20, NVec2::new(5.0, 5.0), NVec2::zeros()),
        Body::new(2.0e20, NVec2::new(5.0, 5.0), NVec2::zeros()),
    ]);
    let scenario = scenario_for(system, 10.0, 1);
    let mut sys = scenario.system.clone();

    let err = advance(&mut sys, &scenario.forces, &scenario.parameters, &scenario.engine).unwrap_err();
    assert!(matches!(err, SimError::Singularity { i: 0, j: 1, .. }), "unexpected error {err:?}");
}

#[test]
fn coincident_tracers_are_not_singular() {
    let system = System::new(vec![
        Body::new(1.0e24, NVec2::zeros(), NVec2::zeros()),
        Body::new(0.0, NVec2::new(1.0e7, 0.0), NVec2::zeros()),
        Body::new(0.0, NVec2::new(1.0e7, 0.0), NVec2::zeros()),
    ]);
    let sys = run_steps(&scenario_for(system, 10.0, 1), 1);

    assert_eq!(sys.bodies[1].v, sys.bodies[2].v);
    assert!(sys.bodies[1].v.x < 0.0);
}

#[test]
fn softening_prevents_blowup() {
    let system = System::new(vec![
        Body::new(1.0e20, NVec2::new(5.0, 5.0), NVec2::zeros()),
        Body::new(1.0e20, NVec2::new(5.0, 5.0), NVec2::zeros()),
    ]);
    let params = Parameters::new(10.0, 1, 0).unwrap().with_softening(1.0e4).unwrap();
    let scenario = Scenario::from_parts(system, params, Engine::default()).unwrap();

    let sys = run_steps(&scenario, 1);
    assert!(sys.bodies.iter().all(|b| b.v.iter().all(|c| c.is_finite())));
}

#[test]
fn parallel_sum_matches_sequential() {
    let bodies: Vec<Body> = (0..40)
        .map(|i| {
            let i_f = i as f64;
            Body::new(
                if i % 7 == 0 { 0.0 } else { 1.0e22 * (1.0 + i_f) },
                NVec2::new((i_f * 0.37).sin() * 1.0e9, (i_f * 0.13).cos() * 1.0e9),
                NVec2::new((i_f * 0.11).cos() * 1.0e3, (i_f * 0.23).sin() * 1.0e3),
            )
        })
        .collect();

    let serial = scenario_for(System::new(bodies.clone()), 1.0e5, 20);
    let params = Parameters::new(1.0e5, 20, 0).unwrap();
    let parallel = Scenario::from_parts(
        System::new(bodies),
        params,
        Engine { integrator: IntegratorConfig::EulerCromer, parallel: true },
    )
    .unwrap();

    assert_eq!(run_steps(&serial, 20), run_steps(&parallel, 20));
}

#[test]
fn verlet_advances_time_and_attracts() {
    let params = Parameters::new(10.0, 1, 0).unwrap();
    let scenario = Scenario::from_parts(
        two_body_system(2.0e7, 1.0e24, 1.0e24),
        params,
        Engine { integrator: IntegratorConfig::Verlet, parallel: false },
    )
    .unwrap();
    let mut sys = scenario.system.clone();

    verlet_integrator(&mut sys, &scenario.forces, &scenario.parameters).unwrap();

    assert_relative_eq!(sys.t, 10.0);
    assert!(sys.bodies[0].x.x > -1.0e7, "Left body did not move toward the right one");
    assert!(sys.bodies[0].v.x > 0.0);
}

// ==================================================================================
// Parameter tests
// ==================================================================================

#[test]
fn step_size_is_rounded_to_whole_seconds() {
    assert_eq!(Parameters::new(1000.0, 10, 0).unwrap().dt, 100.0);
    assert_eq!(Parameters::new(1004.0, 10, 0).unwrap().dt, 100.0);
    assert_eq!(Parameters::new(1006.0, 10, 0).unwrap().dt, 101.0);
}

#[test]
fn half_second_steps_round_to_even() {
    assert_eq!(Parameters::new(25.0, 10, 0).unwrap().dt, 2.0);
    assert_eq!(Parameters::new(35.0, 10, 0).unwrap().dt, 4.0);
    assert_eq!(Parameters::new(1250.0, 100, 0).unwrap().dt, 12.0);

    // 0.5 s rounds down to 0 and is rejected
    let err = Parameters::new(5.0, 10, 0).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}

#[test]
fn frame_stride_divides_samples() {
    let p = Parameters::new(1000.0, 10, 5).unwrap();
    assert_eq!(p.frame_stride, Some(2));
    assert!(p.frames_enabled());

    let p = Parameters::new(1000.0, 10, 0).unwrap();
    assert_eq!(p.frame_stride, None);
}

#[test]
fn invalid_run_settings_are_rejected() {
    let cases = [
        (0.0, 10, 0),       // zero length
        (-5.0, 10, 0),      // negative length
        (f64::NAN, 10, 0),  // not a number
        (1000.0, 0, 0),     // zero samples
        (1000.0, 10, 3),    // 10 is not a multiple of 3
        (4.0, 10, 0),       // dt rounds to 0
    ];
    for (length, samples, frames) in cases {
        let result = Parameters::new(length, samples, frames);
        assert!(
            matches!(result, Err(SimError::Config(_))),
            "accepted length={length} samples={samples} frames={frames}"
        );
    }
}

// ==================================================================================
// Sampler tests
// ==================================================================================

#[test]
fn radii_scale_linearly_with_mass() {
    let radii = scale_radii(&[1.0, 2.0, 3.0, 4.0, 5.0], 5.0, 20.0);
    let expected = [5.0, 8.75, 12.5, 16.25, 20.0];
    for (r, e) in radii.iter().zip(expected) {
        assert_relative_eq!(*r, e);
    }
}

#[test]
fn radii_default_to_minimum() {
    assert_eq!(scale_radii(&[3.0, 3.0, 3.0], 5.0, 20.0), vec![5.0, 5.0, 5.0]);

    let radii = scale_radii(&[0.0, 1.0, 2.0], 5.0, 20.0);
    assert_eq!(radii[0], 5.0);
    assert_relative_eq!(radii[1], 12.5);
    assert_relative_eq!(radii[2], 20.0);
}

#[test]
fn plot_limit_uses_largest_initial_coordinate() {
    let bodies = vec![
        Body::new(1.0, NVec2::new(-1.0e7, 3.0), NVec2::zeros()),
        Body::new(1.0, NVec2::new(4.0, -2.0e7), NVec2::zeros()),
    ];
    assert_relative_eq!(plot_limit(&bodies, 1.25), 2.5e7);
}

#[test]
fn sampler_emits_exactly_frames_times() {
    for (samples, frames) in [(10, 1), (10, 5), (12, 4), (100, 100), (360, 12)] {
        let params = Parameters::new(samples as f64 * 10.0, samples, frames).unwrap();
        let system = two_body_system(2.0e7, 1.0e24, 2.0e24);
        let sampler = FrameSampler::new(&params, &system, &RenderConfig::default()).unwrap();

        let emitted: Vec<usize> = (0..samples).filter(|&k| sampler.should_emit(k)).collect();
        assert_eq!(emitted.len(), frames, "samples={samples} frames={frames}");
        assert!(emitted.iter().all(|k| k % (samples / frames) == 0));
    }
}

#[test]
fn sampler_is_disabled_without_frames() {
    let params = Parameters::new(100.0, 10, 0).unwrap();
    let system = two_body_system(2.0e7, 1.0e24, 2.0e24);
    assert!(FrameSampler::new(&params, &system, &RenderConfig::default()).is_none());
}

#[test]
fn sampler_keeps_initial_radii_and_limit() {
    let params = Parameters::new(100.0, 10, 10).unwrap();
    let scenario = scenario_for(two_body_system(2.0e7, 1.0e24, 2.0e24), 100.0, 10);
    let sampler = FrameSampler::new(&params, &scenario.system, &RenderConfig::default()).unwrap();

    let later = run_steps(&scenario, 10);
    let frame = sampler.frame(&later);

    assert_eq!(frame.radii, &[5.0, 20.0]);
    assert_relative_eq!(frame.limit, 1.25e7);
    assert_eq!(frame.positions, later.positions());
    assert_relative_eq!(frame.t, 100.0);
}

// ==================================================================================
// Recorder tests
// ==================================================================================

#[test]
fn recorded_snapshots_are_copies() {
    let mut sys = two_body_system(2.0e7, 1.0e24, 1.0e24);
    let mut record = TrajectoryRecord::new();
    record.record_system(&sys);

    sys.bodies[0].x = NVec2::new(42.0, 42.0);
    sys.t = 99.0;
    record.record_system(&sys);

    assert_eq!(record.len(), 2);
    assert_eq!(record.snapshots()[0].positions[0], NVec2::new(-1.0e7, 0.0));
    assert_eq!(record.snapshots()[0].t, 0.0);
    assert_eq!(record.path_of(0), vec![NVec2::new(-1.0e7, 0.0), NVec2::new(42.0, 42.0)]);
}

#[test]
fn export_appends_rows_and_optional_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.csv");

    let scenario = scenario_for(two_body_system(2.0e7, 1.0e24, 1.0e24), 300.0, 3);
    let mut record = TrajectoryRecord::new();
    let mut sys = scenario.system.clone();
    record.record_system(&sys);
    for _ in 0..3 {
        advance(&mut sys, &scenario.forces, &scenario.parameters, &scenario.engine).unwrap();
        record.record_system(&sys);
    }

    assert_eq!(record.export(&path, true).unwrap(), 4);
    assert_eq!(record.export(&path, false).unwrap(), 4);

    let rows: Vec<csv::StringRecord> = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .unwrap()
        .records()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(rows.len(), 1 + 8);
    assert_eq!(rows[0].iter().collect::<Vec<_>>(), vec!["t", "x", "y", "vx", "vy"]);
    assert_eq!(&rows[1][0], "0");
    assert_eq!(&rows[1][1], "[-10000000.0, 10000000.0]");
    assert_eq!(&rows[1][3], "[0.0, 0.0]");
    assert_eq!(&rows[4][0], "300");
    assert!(rows.iter().all(|r| r.len() == 5));
}

// ==================================================================================
// Configuration tests
// ==================================================================================

const SCENARIO_YAML: &str = r#"
run:
  days: 1
  seconds: 600
  samples: 87
  frames: 3
bodies:
  - name: "Earth"
    m: 5.972e24
    x: [ 0.0, 0.0 ]
    v: [ 0.0, -12.57 ]
  - m: 7.342e22
    x: [ 3.844e8, 0.0 ]
    v: [ 0.0, 1022.0 ]
"#;

#[test]
fn scenario_loads_from_yaml_with_defaults() {
    let cfg = ScenarioConfig::from_yaml_str(SCENARIO_YAML).unwrap();
    assert_relative_eq!(cfg.run.length(), 87_000.0);

    let scenario = Scenario::build_scenario(cfg).unwrap();
    assert_eq!(scenario.system.len(), 2);
    assert_eq!(scenario.system.bodies[0].name.as_deref(), Some("Earth"));
    assert_eq!(scenario.system.bodies[1].name, None);
    assert_eq!(scenario.parameters.dt, 1000.0);
    assert_eq!(scenario.parameters.frame_stride, Some(29));
    assert_eq!(scenario.engine.integrator, IntegratorConfig::EulerCromer);
    assert_eq!(scenario.parameters.G, G);
    assert_eq!(scenario.render.min_radius, 5.0);
    assert_eq!(scenario.render.max_radius, 20.0);
    assert!(scenario.plot);
    assert!(scenario.output.clean);
}

#[test]
fn scenario_reads_engine_section() {
    let yaml = format!("{SCENARIO_YAML}\nengine:\n  integrator: \"verlet\"\n  parallel: true\n  eps2: 1.0\n  G: 1.0\n");
    let scenario = Scenario::build_scenario(ScenarioConfig::from_yaml_str(&yaml).unwrap()).unwrap();

    assert_eq!(scenario.engine.integrator, IntegratorConfig::Verlet);
    assert!(scenario.engine.parallel);
    assert_eq!(scenario.parameters.eps2, 1.0);
    assert_eq!(scenario.parameters.G, 1.0);
}

#[test]
fn malformed_bodies_are_rejected() {
    let three_d = SCENARIO_YAML.replace("x: [ 0.0, 0.0 ]", "x: [ 0.0, 0.0, 0.0 ]");
    let cfg = ScenarioConfig::from_yaml_str(&three_d).unwrap();
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::Config(_))));

    let negative = SCENARIO_YAML.replace("m: 7.342e22", "m: -1.0");
    let cfg = ScenarioConfig::from_yaml_str(&negative).unwrap();
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::Config(_))));

    let not_a_number = SCENARIO_YAML.replace("samples: 87", "samples: many");
    assert!(matches!(ScenarioConfig::from_yaml_str(&not_a_number), Err(SimError::Config(_))));

    let no_bodies = "run:\n  seconds: 100\n  samples: 10\nbodies: []\n";
    let cfg = ScenarioConfig::from_yaml_str(no_bodies).unwrap();
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::Config(_))));
}
