//! Static checks on parsed scenarios
//!
//! This module catches configurations that would be rejected at body
//! construction or that would blow up on the first tick, and reports them
//! all at once with spans instead of failing on the first one.

use crate::ast::{CameraDecl, Scenario};
use crate::diagnostics::{Diagnostic, Diagnostics};
use std::collections::HashMap;

/// Analyze a scenario and return diagnostics
pub fn analyze_scenario(scenario: &Scenario) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    // Check 1: unique body names and positive physical parameters
    let mut body_names = HashMap::new();
    for (idx, body) in scenario.bodies.iter().enumerate() {
        if body_names.insert(body.name.as_str(), idx).is_some() {
            diagnostics.push(Diagnostic::error(
                format!("duplicate body name '{}'", body.name),
                body.span,
            ));
        }

        if !(body.mass.is_finite() && body.mass > 0.0) {
            diagnostics.push(Diagnostic::error(
                format!("body '{}' must have a positive mass, got {}", body.name, body.mass),
                body.span,
            ));
        }
        if let Some(radius) = body.radius {
            if !(radius.is_finite() && radius > 0.0) {
                diagnostics.push(Diagnostic::error(
                    format!("body '{}' must have a positive radius, got {}", body.name, radius),
                    body.span,
                ));
            }
        }
        if body.name.starts_with("wormhole-") {
            diagnostics.push(Diagnostic::error(
                format!("body name '{}' is reserved for wormhole endpoints", body.name),
                body.span,
            ));
        }
    }

    // Check 2: exactly one wormhole pair
    match scenario.wormholes.len() {
        1 => {}
        0 => diagnostics.push(Diagnostic::error(
            "scenario must declare exactly one wormhole, found none",
            None,
        )),
        n => {
            for extra in &scenario.wormholes[1..] {
                diagnostics.push(Diagnostic::error(
                    format!("scenario must declare exactly one wormhole, found {}", n),
                    extra.span,
                ));
            }
        }
    }
    for wormhole in &scenario.wormholes {
        if wormhole.a == wormhole.b {
            diagnostics.push(Diagnostic::error(
                "wormhole endpoints must not coincide",
                wormhole.span,
            ));
        }
    }

    // Check 3: no two starting positions coincide, endpoints included
    let mut positions: Vec<(&str, glam::Vec3, _)> = scenario
        .bodies
        .iter()
        .map(|b| (b.name.as_str(), b.position, b.span))
        .collect();
    for wormhole in &scenario.wormholes {
        positions.push(("wormhole endpoint", wormhole.a, wormhole.span));
        positions.push(("wormhole endpoint", wormhole.b, wormhole.span));
    }
    for (i, (name_a, pos_a, _)) in positions.iter().enumerate() {
        for (name_b, pos_b, span_b) in &positions[i + 1..] {
            if pos_a == pos_b && !(name_a == name_b && *name_a == "wormhole endpoint") {
                diagnostics.push(Diagnostic::error(
                    format!("'{}' and '{}' start at the same position", name_a, name_b),
                    *span_b,
                ));
            }
        }
    }

    // Check 4: camera declarations
    let mut orbit_seen = false;
    let mut lock_seen = false;
    for camera in &scenario.cameras {
        match camera {
            CameraDecl::Orbit {
                alpha, beta, radius, ..
            } => {
                if orbit_seen {
                    diagnostics.push(Diagnostic::warning(
                        "multiple camera orbit lines, the last one wins",
                        camera.span(),
                    ));
                }
                orbit_seen = true;
                for (name, angle) in [("alpha", alpha), ("beta", beta)] {
                    if !angle.is_finite() {
                        diagnostics.push(Diagnostic::error(
                            format!("camera orbit {} must be finite, got {}", name, angle),
                            camera.span(),
                        ));
                    }
                }
                if !(radius.is_finite() && *radius > 0.0) {
                    diagnostics.push(Diagnostic::error(
                        format!("camera orbit radius must be positive, got {}", radius),
                        camera.span(),
                    ));
                }
            }
            CameraDecl::Lock { body, distance, .. } => {
                if lock_seen {
                    diagnostics.push(Diagnostic::warning(
                        "multiple camera lock lines, the last one wins",
                        camera.span(),
                    ));
                }
                lock_seen = true;
                if !body_names.contains_key(body.as_str()) {
                    diagnostics.push(Diagnostic::error(
                        format!("unknown body '{}' in camera lock", body),
                        camera.span(),
                    ));
                }
                if !(distance.is_finite() && *distance >= 0.0) {
                    diagnostics.push(Diagnostic::error(
                        format!("camera lock distance must be non-negative, got {}", distance),
                        camera.span(),
                    ));
                }
            }
        }
    }

    diagnostics
}
