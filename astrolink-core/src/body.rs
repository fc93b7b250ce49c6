use crate::error::SimError;
use crate::wormhole::WormholeId;
use glam::Vec3;

/// Index of a body inside its [`World`](crate::engine::World)
pub type BodyId = usize;

/// Gravitational constant 6.67e-11, scaled by 1e11
pub const G: f32 = 6.67;

/// Default radius is `mass * RADIUS_PER_MASS` when none is given
pub const RADIUS_PER_MASS: f32 = 5.0;

/// Transit energy granted to a body right after it leaves a wormhole
pub const TRANSIT_ENERGY_RESET: f32 = 4.0;

/// Transit energy consumed by each ejection step
pub const TRANSIT_ENERGY_STEP: f32 = 0.1;

/// A spherical body taking part in the pairwise attraction loop
#[derive(Debug, Clone)]
pub struct Body {
    id: String,
    mass: f32,
    radius: f32,
    pub(crate) position: Vec3,
    wormhole: Option<WormholeId>,
    /// Non-zero for a short window after a wormhole transit
    pub(crate) transit_energy: f32,
}

impl Body {
    /// Create a normal body. `radius` defaults to `mass * 5`.
    pub fn new(
        id: impl Into<String>,
        mass: f32,
        radius: Option<f32>,
        position: Vec3,
    ) -> Result<Self, SimError> {
        let id = id.into();
        let radius = radius.unwrap_or(mass * RADIUS_PER_MASS);

        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidBody {
                id,
                reason: format!("mass must be positive, got {}", mass),
            });
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidBody {
                id,
                reason: format!("radius must be positive, got {}", radius),
            });
        }
        if !position.is_finite() {
            return Err(SimError::InvalidBody {
                id,
                reason: "position must be finite".to_string(),
            });
        }

        Ok(Self {
            id,
            mass,
            radius,
            position,
            wormhole: None,
            transit_energy: 0.0,
        })
    }

    /// Create a wormhole endpoint linked to pair `wormhole`
    pub(crate) fn endpoint(
        id: impl Into<String>,
        mass: f32,
        radius: f32,
        position: Vec3,
        wormhole: WormholeId,
    ) -> Result<Self, SimError> {
        let mut body = Self::new(id, mass, Some(radius), position)?;
        body.wormhole = Some(wormhole);
        Ok(body)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn transit_energy(&self) -> f32 {
        self.transit_energy
    }

    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Negative energy is clamped to zero
    pub(crate) fn set_transit_energy(&mut self, energy: f32) {
        self.transit_energy = energy.max(0.0);
    }

    pub fn is_wormhole_endpoint(&self) -> bool {
        self.wormhole.is_some()
    }

    /// Pair this endpoint belongs to, if any
    pub fn wormhole(&self) -> Option<WormholeId> {
        self.wormhole
    }

    /// `G * m1 * m2 / d²`. Coincident bodies have no defined force.
    pub fn gravitational_force(&self, other: &Body) -> Result<f32, SimError> {
        let dist_sq = self.position.distance_squared(other.position);
        if dist_sq == 0.0 {
            return Err(SimError::DegenerateConfiguration {
                a: self.id.clone(),
                b: other.id.clone(),
            });
        }
        Ok(G * self.mass * other.mass / dist_sq)
    }
}
