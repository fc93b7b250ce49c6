use crate::analyzer::analyze_scenario;
use crate::ast::{BodyDecl, CameraDecl, Scenario, WormholeDecl};
use crate::body::{Body, BodyId};
use crate::camera::{CameraRig, CameraView};
use crate::diagnostics::Diagnostics;
use crate::engine::World;
use crate::error::SimError;
use crate::integrator::step;
use crate::parser::parse_scenario;
use glam::Vec3;
use std::f32::consts::PI;
use tracing::{info, trace};

/// Read-only snapshot of a body for renderers and reports
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub id: String,
    pub position: Vec3,
    pub mass: f32,
    pub radius: f32,
    pub is_wormhole_endpoint: bool,
    pub transit_energy: f32,
}

/// Final result of a headless run
#[derive(Debug)]
pub struct SimulationResult {
    pub ticks: u64,
    pub bodies: Vec<BodyState>,
    pub camera: CameraView,
}

/// Everything a frame loop drives: the world, the single camera rig and the
/// tick counter
#[derive(Debug)]
pub struct SimulationContext {
    pub world: World,
    pub camera: CameraRig,
    pub current_tick: u64,
}

impl SimulationContext {
    pub fn new(world: World, camera: CameraRig) -> Self {
        Self {
            world,
            camera,
            current_tick: 0,
        }
    }

    /// One frame: camera update, then one attraction pass over every pair
    pub fn on_tick(&mut self, dt: f32) -> Result<(), SimError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(SimError::InvalidTimestep(dt));
        }
        self.camera.update(self.world.bodies());
        step(&mut self.world, dt)?;
        self.current_tick += 1;
        trace!(tick = self.current_tick, dt, "tick");
        Ok(())
    }

    /// A body was picked at `position`
    pub fn on_pick(&mut self, position: Vec3) {
        self.camera.look_at(position);
    }

    /// Lock the camera onto the body named `id`
    pub fn lock_on(&mut self, id: &str, distance: f32) -> Result<(), SimError> {
        let body_id: BodyId = self
            .world
            .find(id)
            .ok_or_else(|| SimError::UnknownBody(id.to_string()))?;
        let position = self.world.bodies()[body_id].position;
        self.camera.lock_at(body_id, position, distance)
    }

    pub fn unlock(&mut self) {
        self.camera.unlock();
    }
}

/// Snapshot every body in world order
pub fn get_body_states(ctx: &SimulationContext) -> Vec<BodyState> {
    ctx.world
        .bodies()
        .iter()
        .map(|b| BodyState {
            id: b.id().to_string(),
            position: b.position,
            mass: b.mass(),
            radius: b.radius(),
            is_wormhole_endpoint: b.is_wormhole_endpoint(),
            transit_energy: b.transit_energy,
        })
        .collect()
}

/// The scene the toy starts with when no scenario file is given
pub fn default_scenario() -> Scenario {
    Scenario {
        bodies: vec![
            BodyDecl {
                name: "terra".to_string(),
                position: Vec3::ZERO,
                mass: 20.0,
                radius: Some(5.0),
                span: None,
            },
            BodyDecl {
                name: "moon".to_string(),
                position: Vec3::new(20.0, 0.0, 0.0),
                mass: 10.0,
                radius: Some(3.0),
                span: None,
            },
        ],
        wormholes: vec![WormholeDecl {
            a: Vec3::new(0.0, 0.0, 100.0),
            b: Vec3::new(100.0, 0.0, 0.0),
            span: None,
        }],
        cameras: vec![CameraDecl::Orbit {
            alpha: PI / 4.0,
            beta: PI / 3.0,
            radius: 8.0,
            span: None,
        }],
    }
}

/// Build a context from an already analyzed scenario.
///
/// Bodies are added in declaration order, followed by the wormhole
/// endpoints, which fixes the pair iteration order of every tick.
pub fn build_simulation_context(scenario: &Scenario) -> Result<SimulationContext, SimError> {
    let mut world = World::new();

    for decl in &scenario.bodies {
        world.add_body(Body::new(
            decl.name.clone(),
            decl.mass,
            decl.radius,
            decl.position,
        )?)?;
    }
    for wormhole in &scenario.wormholes {
        world.add_wormhole(wormhole.a, wormhole.b)?;
    }

    let mut ctx = SimulationContext::new(world, CameraRig::default());
    for camera in &scenario.cameras {
        if let CameraDecl::Orbit {
            alpha, beta, radius, ..
        } = camera
        {
            ctx.camera = CameraRig::orbiting(Vec3::ZERO, *alpha, *beta, *radius);
        }
    }
    for camera in &scenario.cameras {
        if let CameraDecl::Lock { body, distance, .. } = camera {
            ctx.lock_on(body, *distance)?;
        }
    }

    info!(
        bodies = ctx.world.bodies().len(),
        wormholes = ctx.world.wormholes().len(),
        "simulation context built"
    );
    Ok(ctx)
}

/// Parse, analyze and build a context. Analysis errors abort; warnings are
/// returned alongside the context.
pub fn build_simulation_context_from_source(
    source: &str,
) -> Result<(SimulationContext, Diagnostics), SimError> {
    let scenario = parse_scenario(source)?;
    let diagnostics = analyze_scenario(&scenario);

    if diagnostics.has_errors() {
        let messages: Vec<String> = diagnostics.errors().map(|d| d.message.clone()).collect();
        return Err(SimError::Analysis(messages.join("; ")));
    }

    let ctx = build_simulation_context(&scenario)?;
    Ok((ctx, diagnostics))
}

/// Run a scenario headless for `ticks` ticks of fixed length `dt`
pub fn run_scenario(source: &str, ticks: u64, dt: f32) -> Result<SimulationResult, SimError> {
    let (mut ctx, _diagnostics) = build_simulation_context_from_source(source)?;
    run_context(&mut ctx, ticks, dt)
}

/// Drive an existing context for `ticks` ticks of fixed length `dt`
pub fn run_context(
    ctx: &mut SimulationContext,
    ticks: u64,
    dt: f32,
) -> Result<SimulationResult, SimError> {
    for _ in 0..ticks {
        ctx.on_tick(dt)?;
    }

    Ok(SimulationResult {
        ticks: ctx.current_tick,
        bodies: get_body_states(ctx),
        camera: ctx.camera.view(),
    })
}
