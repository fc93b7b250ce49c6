//! Test helper utilities for astrolink tests

use crate::body::{Body, BodyId};
use crate::engine::World;
use glam::Vec3;

/// Check if two f32 values are approximately equal within tolerance
pub fn approx_eq_f32(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

/// Check if two vectors are approximately equal component-wise
pub fn approx_vec3(a: Vec3, b: Vec3, tol: f32) -> bool {
    approx_eq_f32(a.x, b.x, tol) && approx_eq_f32(a.y, b.y, tol) && approx_eq_f32(a.z, b.z, tol)
}

/// Add a normal body with an explicit radius and return its index
pub fn add_body(world: &mut World, id: &str, mass: f32, radius: f32, pos: Vec3) -> BodyId {
    world
        .add_body(Body::new(id, mass, Some(radius), pos).expect("valid body"))
        .expect("unique body id")
}

/// World with one wormhole pair at `a` and `b`; returns the endpoint indices
pub fn world_with_wormhole(a: Vec3, b: Vec3) -> (World, BodyId, BodyId) {
    let mut world = World::new();
    let pair = world.add_wormhole(a, b).expect("valid wormhole");
    let pair = world.wormholes()[pair];
    (world, pair.a(), pair.b())
}

/// Snapshot every body position in world order
pub fn positions(world: &World) -> Vec<Vec3> {
    world.bodies().iter().map(|b| b.position()).collect()
}

/// Give body `id` some transit energy, as if it had just left a wormhole
pub fn set_transit_energy(world: &mut World, id: BodyId, energy: f32) {
    world
        .body_mut(id)
        .expect("body exists")
        .set_transit_energy(energy);
}

/// Move a standalone body, for rigs that follow it
pub fn move_body(body: &mut Body, position: Vec3) {
    body.set_position(position);
}
