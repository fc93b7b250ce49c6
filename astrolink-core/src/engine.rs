use crate::body::{Body, BodyId, TRANSIT_ENERGY_RESET, TRANSIT_ENERGY_STEP};
use crate::error::SimError;
use crate::math::{rotate_around, ORBIT_SWIRL, WORLD_UP};
use crate::wormhole::{WormholeId, WormholePair, ENDPOINT_MASS, ENDPOINT_RADIUS};
use glam::Vec3;
use tracing::debug;

/// Interactions at or below this force are ignored entirely
pub const FORCE_THRESHOLD: f32 = 0.5;

/// Divisor applied to the normal attraction displacement
pub const ATTRACTION_DAMPING: f32 = 10.0;

/// Multiplier applied to the post-transit ejection displacement
pub const EJECTION_SCALE: f32 = 4.0;

/// A transit happens once `distance² < TRANSIT_RADIUS_FACTOR * radius` of the
/// endpoint. The comparison is against the radius itself, not radius².
pub const TRANSIT_RADIUS_FACTOR: f32 = 12.0;

/// The simulation world: every body plus the wormhole table
#[derive(Debug, Default)]
pub struct World {
    bodies: Vec<Body>,
    wormholes: Vec<WormholePair>,
}

impl World {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            wormholes: Vec::new(),
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub(crate) fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn wormholes(&self) -> &[WormholePair] {
        &self.wormholes
    }

    /// Look a body up by its string id
    pub fn find(&self, id: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.id() == id)
    }

    /// Add a normal body, rejecting duplicate ids
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, SimError> {
        if self.find(body.id()).is_some() {
            return Err(SimError::InvalidBody {
                id: body.id().to_string(),
                reason: "duplicate body id".to_string(),
            });
        }
        let idx = self.bodies.len();
        self.bodies.push(body);
        Ok(idx)
    }

    /// Create a wormhole pair with endpoints at `a` and `b`
    pub fn add_wormhole(&mut self, a: Vec3, b: Vec3) -> Result<WormholeId, SimError> {
        let pair_id = self.wormholes.len();
        let endpoint_a = Body::endpoint(
            format!("wormhole-{}-a", pair_id),
            ENDPOINT_MASS,
            ENDPOINT_RADIUS,
            a,
            pair_id,
        )?;
        let endpoint_b = Body::endpoint(
            format!("wormhole-{}-b", pair_id),
            ENDPOINT_MASS,
            ENDPOINT_RADIUS,
            b,
            pair_id,
        )?;

        let a_idx = self.add_body(endpoint_a)?;
        let b_idx = self.add_body(endpoint_b)?;
        self.wormholes.push(WormholePair::new(a_idx, b_idx));
        Ok(pair_id)
    }

    /// The endpoint linked to `endpoint`, if it is one
    pub fn other_endpoint(&self, endpoint: BodyId) -> Option<BodyId> {
        let pair = self.bodies.get(endpoint)?.wormhole()?;
        self.wormholes.get(pair)?.other(endpoint)
    }

    /// Apply one attraction step between bodies `i` and `j`.
    ///
    /// The heavier body (ties favour `i`) stays put and pulls the lighter one.
    /// A body pulled inside a wormhole endpoint is moved next to the other
    /// endpoint and ejected outwards on the following calls until its transit
    /// energy runs out.
    pub fn attract(&mut self, i: BodyId, j: BodyId, dt: f32) -> Result<(), SimError> {
        if i == j {
            return Err(SimError::InvalidParameter(format!(
                "body {} cannot attract itself",
                i
            )));
        }
        let this = self
            .bodies
            .get(i)
            .ok_or_else(|| SimError::UnknownBody(i.to_string()))?;
        let other = self
            .bodies
            .get(j)
            .ok_or_else(|| SimError::UnknownBody(j.to_string()))?;

        if this.is_wormhole_endpoint() && other.is_wormhole_endpoint() {
            return Ok(());
        }

        let force = this.gravitational_force(other)?;
        if force <= FORCE_THRESHOLD {
            return Ok(());
        }

        let (attractor_idx, attracted_idx) = if this.mass() >= other.mass() {
            (i, j)
        } else {
            (j, i)
        };

        let attractor = &self.bodies[attractor_idx];
        let pivot = attractor.position;
        let attractor_radius = attractor.radius();
        // Resolved up front: the exit endpoint is never the attracted body
        let exit = if !self.bodies[attracted_idx].is_wormhole_endpoint() {
            self.other_endpoint(attractor_idx)
                .map(|other| (attractor.wormhole(), self.bodies[other].position))
        } else {
            None
        };

        let attracted = &mut self.bodies[attracted_idx];
        attracted.position = rotate_around(attracted.position, pivot, WORLD_UP, ORBIT_SWIRL);

        if attracted.transit_energy > 0.0 {
            attracted.set_transit_energy(attracted.transit_energy - TRANSIT_ENERGY_STEP);
            let outward = (pivot + attracted.position).normalize_or_zero();
            attracted.position +=
                outward * force * dt * attracted.transit_energy * EJECTION_SCALE;
            return Ok(());
        }

        let inward = (pivot - attracted.position).normalize_or_zero();
        attracted.position += inward * force * dt / ATTRACTION_DAMPING;

        let Some((pair, exit_position)) = exit else {
            return Ok(());
        };
        if attracted.position.distance_squared(pivot) >= TRANSIT_RADIUS_FACTOR * attractor_radius {
            return Ok(());
        }

        attracted.position =
            attracted.position.normalize_or_zero() * (attractor_radius / 2.0) + exit_position;
        attracted.transit_energy = TRANSIT_ENERGY_RESET;
        debug!(
            body = attracted.id(),
            wormhole = ?pair,
            exit = ?attracted.position,
            "wormhole transit"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: &str, mass: f32, pos: Vec3) -> Body {
        Body::new(id, mass, Some(1.0), pos).unwrap()
    }

    #[test]
    fn test_add_wormhole_links_endpoints() {
        let mut world = World::new();
        let pair = world
            .add_wormhole(Vec3::new(0.0, 0.0, 100.0), Vec3::new(100.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(pair, 0);
        assert_eq!(world.bodies().len(), 2);

        let a = world.wormholes()[0].a();
        let b = world.wormholes()[0].b();
        assert_eq!(world.body(a).unwrap().wormhole(), Some(pair));
        assert_eq!(world.body(b).unwrap().wormhole(), Some(pair));
        assert_eq!(world.body(a).unwrap().mass(), ENDPOINT_MASS);
        assert_eq!(world.body(b).unwrap().radius(), ENDPOINT_RADIUS);
        assert_eq!(world.other_endpoint(a), Some(b));
        assert_eq!(world.other_endpoint(b), Some(a));
    }

    #[test]
    fn test_duplicate_body_id_rejected() {
        let mut world = World::new();
        world.add_body(body("a", 1.0, Vec3::ZERO)).unwrap();
        assert!(world.add_body(body("a", 2.0, Vec3::ONE)).is_err());
    }

    #[test]
    fn test_attract_self_is_error() {
        let mut world = World::new();
        let a = world.add_body(body("a", 1.0, Vec3::ZERO)).unwrap();
        assert!(matches!(
            world.attract(a, a, 0.1),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_heavier_body_stays_put() {
        let mut world = World::new();
        let light = world.add_body(body("light", 1.0, Vec3::new(2.0, 0.0, 0.0))).unwrap();
        let heavy = world.add_body(body("heavy", 10.0, Vec3::ZERO)).unwrap();

        world.attract(light, heavy, 0.1).unwrap();

        assert_eq!(world.body(heavy).unwrap().position, Vec3::ZERO);
        let moved = world.body(light).unwrap().position;
        assert!(moved.length() < 2.0);
    }

    #[test]
    fn test_tie_favours_first_argument_as_attractor() {
        let mut world = World::new();
        let a = world.add_body(body("a", 5.0, Vec3::ZERO)).unwrap();
        let b = world.add_body(body("b", 5.0, Vec3::new(1.0, 0.0, 0.0))).unwrap();

        world.attract(a, b, 0.1).unwrap();
        assert_eq!(world.body(a).unwrap().position, Vec3::ZERO);
        assert_ne!(world.body(b).unwrap().position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_coincident_bodies_error() {
        let mut world = World::new();
        let a = world.add_body(body("a", 5.0, Vec3::ONE)).unwrap();
        let b = world.add_body(body("b", 5.0, Vec3::ONE)).unwrap();
        assert!(matches!(
            world.attract(a, b, 0.1),
            Err(SimError::DegenerateConfiguration { .. })
        ));
    }
}
