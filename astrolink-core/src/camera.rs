//! Camera rig with an eased look-at transition and a rigid lock-follow mode

use crate::body::{Body, BodyId};
use crate::error::SimError;
use crate::math::orbit_position;
use glam::Vec3;
use std::f32::consts::PI;
use tracing::debug;

/// Rate a fresh transition starts with
pub const DEFAULT_TRANSITION_RATE: f32 = 0.1;

/// Progress at which a transition counts as finished
pub const TRANSITION_COMPLETE: f32 = 0.99;

pub const TRANSITION_RATE_DIVISOR: f32 = 90.0;

/// What the renderer needs to place its camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub aim: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Lock {
    body: BodyId,
    offset: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    eye: Vec3,
    aim: Vec3,
    look_at_target: Option<Vec3>,
    last_target: Vec3,
    transition_progress: f32,
    transition_rate: f32,
    initial_distance_squared: f32,
    locked: Option<Lock>,
}

impl Default for CameraRig {
    /// Orbit camera around the origin at alpha = π/4, beta = π/3, radius 8
    fn default() -> Self {
        Self::orbiting(Vec3::ZERO, PI / 4.0, PI / 3.0, 8.0)
    }
}

impl CameraRig {
    pub fn new(eye: Vec3, aim: Vec3) -> Self {
        Self {
            eye,
            aim,
            look_at_target: None,
            last_target: aim,
            transition_progress: 0.0,
            transition_rate: DEFAULT_TRANSITION_RATE,
            initial_distance_squared: 0.0,
            locked: None,
        }
    }

    /// Camera sitting on a sphere of `radius` around `target`, aimed at it
    pub fn orbiting(target: Vec3, alpha: f32, beta: f32, radius: f32) -> Self {
        Self::new(orbit_position(target, alpha, beta, radius), target)
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            eye: self.eye,
            aim: self.aim,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn aim(&self) -> Vec3 {
        self.aim
    }

    pub fn look_at_target(&self) -> Option<Vec3> {
        self.look_at_target
    }

    pub fn last_target(&self) -> Vec3 {
        self.last_target
    }

    pub fn transition_progress(&self) -> f32 {
        self.transition_progress
    }

    pub fn transition_rate(&self) -> f32 {
        self.transition_rate
    }

    pub fn locked_body(&self) -> Option<BodyId> {
        self.locked.map(|lock| lock.body)
    }

    pub fn lock_offset(&self) -> Option<Vec3> {
        self.locked.map(|lock| lock.offset)
    }

    pub fn is_transitioning(&self) -> bool {
        self.look_at_target.is_some()
    }

    /// Start easing the aim point from where it is now towards `target`.
    /// Any transition in flight is replaced.
    pub fn look_at(&mut self, target: Vec3) {
        let dist_sq = self.aim.distance_squared(target);
        self.transition_progress = 0.0;
        self.transition_rate = DEFAULT_TRANSITION_RATE;

        if dist_sq == 0.0 {
            // Nothing to ease over; the rate formula would stall at zero
            self.finish_transition();
            return;
        }

        self.last_target = self.aim;
        self.look_at_target = Some(target);
        self.initial_distance_squared = dist_sq;
        debug!(from = ?self.aim, to = ?target, "camera transition started");
    }

    /// Follow `body` rigidly from `distance` along the current line of sight
    pub fn lock_at(
        &mut self,
        body: BodyId,
        body_position: Vec3,
        distance: f32,
    ) -> Result<(), SimError> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "lock distance must be finite and non-negative, got {}",
                distance
            )));
        }
        let direction = (body_position - self.eye).try_normalize().ok_or_else(|| {
            SimError::DegenerateConfiguration {
                a: "camera".to_string(),
                b: format!("body {}", body),
            }
        })?;

        self.locked = Some(Lock {
            body,
            offset: direction * distance,
        });
        debug!(body, distance, "camera locked");
        Ok(())
    }

    /// Leave lock mode; a pending transition picks up where it stopped
    pub fn unlock(&mut self) {
        if self.locked.take().is_some() {
            debug!("camera unlocked");
        }
    }

    /// Advance the rig by one tick
    pub fn update(&mut self, bodies: &[Body]) {
        if let Some(lock) = self.locked {
            if let Some(body) = bodies.get(lock.body) {
                self.eye = body.position + lock.offset;
                self.aim = body.position;
            }
            return;
        }

        let Some(target) = self.look_at_target else {
            return;
        };

        self.transition_progress += self.transition_rate;
        let aim = self.last_target.lerp(target, self.transition_progress);
        self.eye += aim - self.aim;
        self.aim = aim;

        let d = self.initial_distance_squared;
        self.transition_rate =
            (d / (d + self.transition_progress + self.transition_rate)) / TRANSITION_RATE_DIVISOR;

        if self.transition_progress >= TRANSITION_COMPLETE {
            debug!(aim = ?self.aim, "camera transition complete");
            self.finish_transition();
        } else if self.transition_progress + self.transition_rate == self.transition_progress {
            // Rate below the f32 resolution of progress: land on the target
            self.eye += target - self.aim;
            self.aim = target;
            debug!(aim = ?self.aim, "camera transition complete");
            self.finish_transition();
        }
    }

    fn finish_transition(&mut self) {
        self.look_at_target = None;
        self.transition_progress = 0.0;
        self.transition_rate = DEFAULT_TRANSITION_RATE;
        self.initial_distance_squared = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO)
    }

    #[test]
    fn test_default_orbit_camera() {
        let rig = CameraRig::default();
        assert_eq!(rig.aim(), Vec3::ZERO);
        assert!((rig.eye().length() - 8.0).abs() < 1e-4);
        assert!(!rig.is_transitioning());
    }

    #[test]
    fn test_first_update_uses_default_rate() {
        let mut rig = rig();
        rig.look_at(Vec3::new(10.0, 0.0, 0.0));
        rig.update(&[]);
        assert!((rig.transition_progress() - 0.1).abs() < 1e-6);
        assert!(rig.aim().distance(Vec3::new(1.0, 0.0, 0.0)) < 1e-5);
        // rate = (100 / (100 + 0.1 + 0.1)) / 90
        let expected = (100.0 / 100.2) / 90.0;
        assert!((rig.transition_rate() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_eye_follows_aim_while_easing() {
        let mut rig = rig();
        let offset = rig.eye() - rig.aim();
        rig.look_at(Vec3::new(5.0, 5.0, 0.0));
        for _ in 0..10 {
            rig.update(&[]);
            assert!((rig.eye() - rig.aim()).distance(offset) < 1e-4);
        }
    }

    #[test]
    fn test_look_at_current_aim_snaps() {
        let mut rig = rig();
        rig.look_at(Vec3::ZERO);
        assert!(!rig.is_transitioning());
        let before = rig.clone();
        rig.update(&[]);
        assert_eq!(rig, before);
    }

    #[test]
    fn test_look_at_tiny_distance_completes() {
        let mut rig = rig();
        let target = Vec3::new(1e-4, 0.0, 0.0);
        rig.look_at(target);
        assert!(rig.is_transitioning());

        let mut previous = rig.transition_progress();
        for _ in 0..100 {
            rig.update(&[]);
            if !rig.is_transitioning() {
                break;
            }
            assert!(rig.transition_progress() > previous, "progress stalled");
            previous = rig.transition_progress();
        }

        assert!(!rig.is_transitioning());
        assert_eq!(rig.aim(), target);
        assert_eq!(rig.transition_rate(), DEFAULT_TRANSITION_RATE);
    }

    #[test]
    fn test_look_at_overwrites_in_flight_transition() {
        let mut rig = rig();
        rig.look_at(Vec3::new(10.0, 0.0, 0.0));
        rig.update(&[]);
        rig.update(&[]);
        let aim = rig.aim();

        rig.look_at(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(rig.look_at_target(), Some(Vec3::new(0.0, 10.0, 0.0)));
        assert_eq!(rig.last_target(), aim);
        assert_eq!(rig.transition_progress(), 0.0);
        assert_eq!(rig.transition_rate(), DEFAULT_TRANSITION_RATE);
    }

    #[test]
    fn test_lock_rejects_bad_distance() {
        let mut rig = rig();
        assert!(rig.lock_at(0, Vec3::ONE, -1.0).is_err());
        assert!(rig.lock_at(0, Vec3::ONE, f32::INFINITY).is_err());
        assert!(rig.locked_body().is_none());
    }

    #[test]
    fn test_lock_on_eye_position_is_degenerate() {
        let mut rig = rig();
        let eye = rig.eye();
        assert!(matches!(
            rig.lock_at(0, eye, 5.0),
            Err(SimError::DegenerateConfiguration { .. })
        ));
    }

    #[test]
    fn test_unlock_resumes_transition() {
        let mut body = Body::new("b", 1.0, None, Vec3::new(0.0, 0.0, 5.0)).unwrap();
        let mut rig = rig();
        rig.look_at(Vec3::new(10.0, 0.0, 0.0));
        rig.lock_at(0, body.position, 3.0).unwrap();

        body.set_position(Vec3::new(0.0, 0.0, 6.0));
        rig.update(std::slice::from_ref(&body));
        // Locked: the transition does not advance
        assert_eq!(rig.transition_progress(), 0.0);
        assert!(rig.is_transitioning());
        assert_eq!(rig.aim(), body.position);

        rig.unlock();
        rig.update(&[]);
        assert!(rig.transition_progress() > 0.0);
    }
}
