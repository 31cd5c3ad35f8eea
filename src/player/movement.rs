//! Keyboard input to ball movement.
//!
//! Input is sampled every frame into `MovementInput` and consumed by the
//! fixed physics step: the axes become a continuous force for that step and
//! a latched jump press becomes one jump attempt.

use bevy::prelude::*;

use crate::physics::RigidBody;
use crate::player::camera::SpringArm;
use crate::player::Player;
use crate::settings::Settings;

/// Input sampled since the last physics step.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct MovementInput {
    pub axis_right: f32,
    pub axis_forward: f32,
    /// Set on the frame the jump key goes down, cleared once a physics step consumes it.
    pub jump_requested: bool,
}

/// Keys driving the two movement axes and the jump action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementBindings {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
}

impl MovementBindings {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            forward: settings.key_for("forward", KeyCode::KeyW),
            back: settings.key_for("back", KeyCode::KeyS),
            left: settings.key_for("left", KeyCode::KeyA),
            right: settings.key_for("right", KeyCode::KeyD),
            jump: settings.key_for("jump", KeyCode::Space),
        }
    }
}

/// `1` while only `positive` is held, `-1` while only `negative` is, else `0`.
#[must_use]
pub fn axis_value(keys: &ButtonInput<KeyCode>, positive: KeyCode, negative: KeyCode) -> f32 {
    let mut value = 0.0;
    if keys.pressed(positive) {
        value += 1.0;
    }
    if keys.pressed(negative) {
        value -= 1.0;
    }
    value
}

/// Sample the movement axes and latch jump presses.
#[allow(clippy::needless_pass_by_value)]
pub fn read_movement_input(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut input: ResMut<MovementInput>,
) {
    let bindings = MovementBindings::from_settings(&settings);
    input.axis_right = axis_value(&keys, bindings.right, bindings.left);
    input.axis_forward = axis_value(&keys, bindings.forward, bindings.back);
    if keys.just_pressed(bindings.jump) {
        input.jump_requested = true;
    }
}

/// Queue this step's movement force and jump impulse on each player ball.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_movement_input(
    mut input: ResMut<MovementInput>,
    cameras: Query<&Transform, With<SpringArm>>,
    mut players: Query<(&mut Player, &mut RigidBody)>,
) {
    let jump = std::mem::take(&mut input.jump_requested);

    for (mut player, mut body) in &mut players {
        if let Ok(camera) = cameras.get(player.camera) {
            player
                .controller
                .apply_lateral_input(&mut *body, input.axis_right, input.axis_forward, camera);
        }

        if jump && player.controller.try_jump(&mut *body) {
            let jumps = player.controller.jumps();
            debug!("jump {}/{}", jumps.jump_count, jumps.max_jump_count);
        }
    }
}
