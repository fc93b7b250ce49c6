pub mod analyzer;
pub mod ast;
pub mod body;
pub mod camera;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod integrator;
pub mod math;
pub mod parser;
pub mod runtime;
pub mod wormhole;

pub use analyzer::analyze_scenario;
pub use body::{Body, BodyId};
pub use camera::{CameraRig, CameraView};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceLocation, Span};
pub use engine::World;
pub use error::SimError;
pub use parser::{parse_scenario, ParseError};
pub use runtime::{
    build_simulation_context, build_simulation_context_from_source, default_scenario,
    get_body_states, run_context, run_scenario, BodyState, SimulationContext, SimulationResult,
};
pub use wormhole::{WormholeId, WormholePair};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
