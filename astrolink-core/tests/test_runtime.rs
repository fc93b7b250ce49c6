//! Runtime: context building, tick/pick boundary, determinism

use astrolink_core::tests::test_helpers::approx_vec3;
use astrolink_core::{
    build_simulation_context, build_simulation_context_from_source, default_scenario,
    get_body_states, run_context, run_scenario, SimError,
};
use glam::Vec3;

const SCENE: &str = r#"
body terra at (0, 0, 0) mass 20 radius 5
body moon at (20, 0, 0) mass 10 radius 3
wormhole at (0, 0, 100) to (100, 0, 0)
"#;

#[test]
fn test_build_orders_bodies_then_endpoints() {
    let (ctx, diagnostics) = build_simulation_context_from_source(SCENE).unwrap();
    assert!(diagnostics.is_empty());

    let states = get_body_states(&ctx);
    let ids: Vec<&str> = states.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["terra", "moon", "wormhole-0-a", "wormhole-0-b"]);
    assert!(!states[0].is_wormhole_endpoint);
    assert!(states[2].is_wormhole_endpoint);
    assert_eq!(states[2].mass, 200.0);
    assert_eq!(states[2].radius, 50.0);
    assert_eq!(states[1].radius, 3.0);
}

#[test]
fn test_analysis_errors_abort_build() {
    let source = "body a at (0, 0, 0) mass -1\nwormhole at (0, 0, 100) to (100, 0, 0)";
    match build_simulation_context_from_source(source) {
        Err(SimError::Analysis(message)) => assert!(message.contains("positive mass")),
        other => panic!("expected analysis error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_parse_errors_surface_as_sim_errors() {
    assert!(matches!(
        build_simulation_context_from_source("planet x"),
        Err(SimError::Parse(_))
    ));
}

#[test]
fn test_on_tick_rejects_bad_timestep() {
    let (mut ctx, _) = build_simulation_context_from_source(SCENE).unwrap();
    assert!(matches!(ctx.on_tick(-0.1), Err(SimError::InvalidTimestep(_))));
    assert!(ctx.on_tick(f32::NAN).is_err());
    assert_eq!(ctx.current_tick, 0);

    ctx.on_tick(0.0).unwrap();
    assert_eq!(ctx.current_tick, 1);
}

#[test]
fn test_on_pick_starts_camera_transition() {
    let (mut ctx, _) = build_simulation_context_from_source(SCENE).unwrap();
    let moon = get_body_states(&ctx)[1].position;

    ctx.on_pick(moon);
    assert_eq!(ctx.camera.look_at_target(), Some(moon));

    ctx.on_tick(1.0 / 60.0).unwrap();
    assert!(ctx.camera.transition_progress() > 0.0);
    assert!(ctx.camera.aim().distance(moon) < moon.length());
}

#[test]
fn test_camera_updates_before_physics() {
    let source = format!("{}camera lock moon distance 10\n", SCENE);
    let (mut ctx, _) = build_simulation_context_from_source(&source).unwrap();
    let moon_before = get_body_states(&ctx)[1].position;

    ctx.on_tick(1.0 / 60.0).unwrap();

    // The rig saw the moon where it was at the start of the tick
    assert_eq!(ctx.camera.aim(), moon_before);
    assert_ne!(get_body_states(&ctx)[1].position, moon_before);
}

#[test]
fn test_lock_on_unknown_body() {
    let (mut ctx, _) = build_simulation_context_from_source(SCENE).unwrap();
    assert!(matches!(
        ctx.lock_on("pluto", 10.0),
        Err(SimError::UnknownBody(_))
    ));
    ctx.lock_on("terra", 10.0).unwrap();
    assert_eq!(ctx.camera.locked_body(), Some(0));
    ctx.unlock();
    assert_eq!(ctx.camera.locked_body(), None);
}

#[test]
fn test_run_is_deterministic() {
    let first = run_scenario(SCENE, 300, 1.0 / 60.0).unwrap();
    let second = run_scenario(SCENE, 300, 1.0 / 60.0).unwrap();

    assert_eq!(first.ticks, 300);
    assert_eq!(first.bodies, second.bodies);
    assert_eq!(first.camera, second.camera);
}

#[test]
fn test_default_scenario_runs() {
    let mut ctx = build_simulation_context(&default_scenario()).unwrap();
    assert_eq!(ctx.world.bodies().len(), 4);
    assert!(approx_vec3(ctx.camera.aim(), Vec3::ZERO, 1e-6));

    let result = run_context(&mut ctx, 600, 1.0 / 60.0).unwrap();
    assert_eq!(result.ticks, 600);
    for body in &result.bodies {
        assert!(body.position.is_finite(), "{} went non-finite", body.id);
        assert!(body.transit_energy >= 0.0);
    }
}

#[test]
fn test_bundled_scenarios_build() {
    for source in [
        include_str!("../../scenarios/earth_moon.scn"),
        include_str!("../../scenarios/close_pass.scn"),
    ] {
        let (mut ctx, diagnostics) = build_simulation_context_from_source(source).unwrap();
        assert!(!diagnostics.has_errors());
        ctx.on_tick(1.0 / 60.0).unwrap();
    }
}

#[test]
fn test_close_pass_probe_transits_on_first_tick() {
    let source = include_str!("../../scenarios/close_pass.scn");
    let (mut ctx, _) = build_simulation_context_from_source(source).unwrap();
    ctx.on_tick(1.0 / 60.0).unwrap();

    let probe = &get_body_states(&ctx)[0];
    assert_eq!(probe.id, "probe");
    assert!(probe.transit_energy > 0.0);
}
