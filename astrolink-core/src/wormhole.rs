use crate::body::BodyId;

/// Index of a pair inside the world's wormhole table
pub type WormholeId = usize;

/// Mass given to both endpoints of every pair
pub const ENDPOINT_MASS: f32 = 200.0;

/// Radius given to both endpoints of every pair
pub const ENDPOINT_RADIUS: f32 = 50.0;

/// Two linked endpoint bodies. Anything pulled close enough to one endpoint
/// reappears next to the other.
///
/// The pair only stores body indices; the bodies point back with a
/// [`WormholeId`], so neither side owns the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WormholePair {
    a: BodyId,
    b: BodyId,
}

impl WormholePair {
    pub(crate) fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> BodyId {
        self.a
    }

    pub fn b(&self) -> BodyId {
        self.b
    }

    /// The endpoint on the other side of `endpoint`
    pub fn other(&self, endpoint: BodyId) -> Option<BodyId> {
        if endpoint == self.a {
            Some(self.b)
        } else if endpoint == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}
