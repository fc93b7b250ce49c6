use crate::diagnostics::Span;
use glam::Vec3;

/// A parsed scenario file
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub bodies: Vec<BodyDecl>,
    pub wormholes: Vec<WormholeDecl>,
    pub cameras: Vec<CameraDecl>,
}

/// Body declaration: `body name at (x, y, z) mass m [radius r]`
#[derive(Debug, Clone)]
pub struct BodyDecl {
    pub name: String,
    pub position: Vec3,
    pub mass: f32,
    pub radius: Option<f32>, // defaults to mass * 5
    pub span: Option<Span>,
}

/// Wormhole declaration: `wormhole at (x, y, z) to (x, y, z)`
#[derive(Debug, Clone)]
pub struct WormholeDecl {
    pub a: Vec3,
    pub b: Vec3,
    pub span: Option<Span>,
}

/// Camera declarations
#[derive(Debug, Clone)]
pub enum CameraDecl {
    /// `camera orbit alpha a beta b radius r`
    Orbit {
        alpha: f32,
        beta: f32,
        radius: f32,
        span: Option<Span>,
    },
    /// `camera lock name distance d`
    Lock {
        body: String,
        distance: f32,
        span: Option<Span>,
    },
}

impl CameraDecl {
    pub fn span(&self) -> Option<Span> {
        match self {
            CameraDecl::Orbit { span, .. } | CameraDecl::Lock { span, .. } => *span,
        }
    }
}
