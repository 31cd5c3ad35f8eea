//! Movement and jump rules for the player ball.
//!
//! `MovementController` turns axis input into forces relative to a camera
//! frame, turns jump requests into upward impulses while jump charges
//! remain, and refills the charges whenever the ball touches an upward
//! facing surface. The body and camera are borrowed per call; the
//! controller owns nothing but its tuning and the jump counter.

use bevy::prelude::*;

use crate::physics::PhysicsBody;
use crate::player::camera::CameraFrame;

/// Unscaled tuning, per unit mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementConfig {
    pub move_force: f32,
    pub jump_impulse: f32,
}

/// Jump charges used since the last ground contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpState {
    pub jump_count: u32,
    pub max_jump_count: u32,
}

impl JumpState {
    #[must_use]
    pub fn new(max_jump_count: u32) -> Self {
        Self { jump_count: 0, max_jump_count }
    }

    #[must_use]
    pub fn can_jump(&self) -> bool {
        self.jump_count < self.max_jump_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementController {
    move_force: f32,
    jump_impulse: f32,
    jumps: JumpState,
}

impl MovementController {
    /// Bind tuning to `body`: both magnitudes are multiplied by the body's
    /// mass so the same config gives the same acceleration for any mass.
    /// Also switches simulation on for the body.
    pub fn initialize<B: PhysicsBody + ?Sized>(body: &mut B, config: MovementConfig, max_jump_count: u32) -> Self {
        body.set_simulate_physics(true);
        let mass = body.mass();
        Self {
            move_force: config.move_force * mass,
            jump_impulse: config.jump_impulse * mass,
            jumps: JumpState::new(max_jump_count),
        }
    }

    /// Re-scale tuning against the body's current mass, keeping the jumps
    /// already spent. Used when settings are reloaded mid-game.
    pub fn retune<B: PhysicsBody + ?Sized>(&mut self, body: &mut B, config: MovementConfig, max_jump_count: u32) {
        let jump_count = self.jumps.jump_count;
        *self = Self::initialize(body, config, max_jump_count);
        self.jumps.jump_count = jump_count;
    }

    #[must_use]
    pub fn move_force(&self) -> f32 { self.move_force }

    #[must_use]
    pub fn jump_impulse(&self) -> f32 { self.jump_impulse }

    #[must_use]
    pub fn jumps(&self) -> JumpState { self.jumps }

    /// Force for the given axes in `camera`'s frame. Axes are not clamped and
    /// the camera vectors are used as-is, pitch included.
    #[must_use]
    pub fn lateral_force<C: CameraFrame + ?Sized>(&self, axis_right: f32, axis_forward: f32, camera: &C) -> Vec3 {
        camera.right() * self.move_force * axis_right + camera.forward() * self.move_force * axis_forward
    }

    /// Push the body along the camera's right/forward axes for this physics step.
    pub fn apply_lateral_input<B, C>(&self, body: &mut B, axis_right: f32, axis_forward: f32, camera: &C)
    where
        B: PhysicsBody + ?Sized,
        C: CameraFrame + ?Sized,
    {
        body.add_force(self.lateral_force(axis_right, axis_forward, camera));
    }

    /// Spend a jump charge on an upward impulse.
    ///
    /// # Returns
    /// `false` (and does nothing) when every charge is already spent.
    pub fn try_jump<B: PhysicsBody + ?Sized>(&mut self, body: &mut B) -> bool {
        if !self.jumps.can_jump() {
            return false;
        }
        body.add_impulse(Vec3::Y * self.jump_impulse);
        self.jumps.jump_count += 1;
        true
    }

    /// Refill jump charges when the contacted surface faces upward.
    ///
    /// `normal_up` is the vertical component of the contact normal. Walls
    /// (`0`) and overhangs (negative) leave the count alone. Applies to every
    /// contact, airborne or not.
    pub fn on_collision(&mut self, normal_up: f32) {
        if normal_up > 0.0 {
            self.jumps.jump_count = 0;
        }
    }

    /// Forget spent jumps, e.g. after a respawn.
    pub fn reset_jumps(&mut self) {
        self.jumps.jump_count = 0;
    }
}
