//! Spring-arm camera rig and cursor helpers.
//!
//! The camera is its own entity carrying a `SpringArm` that points at the
//! ball. `follow_spring_arm` places it behind the ball every frame using the
//! yaw/pitch in `PlayerLook`, so the camera never inherits the ball's roll.
//! `camera_look` feeds mouse motion into `PlayerLook` while the cursor is
//! grabbed and `cursor_grab` toggles the grab.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::settings::Settings;

const CAMERA_MAX_PITCH_DEG: f32 = 85.0;

/// Directional reference used to turn input axes into world-space directions.
pub trait CameraFrame {
    /// Unit vector the camera looks along.
    fn forward(&self) -> Vec3;
    /// Unit vector to the camera's right.
    fn right(&self) -> Vec3;
}

impl CameraFrame for Transform {
    fn forward(&self) -> Vec3 {
        Transform::forward(self).into()
    }

    fn right(&self) -> Vec3 {
        Transform::right(self).into()
    }
}

impl CameraFrame for GlobalTransform {
    fn forward(&self) -> Vec3 {
        GlobalTransform::forward(self).into()
    }

    fn right(&self) -> Vec3 {
        GlobalTransform::right(self).into()
    }
}

/// Keeps the camera at a fixed distance behind `target`.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpringArm {
    pub target: Entity,
    pub length: f32,
}

/// Stores the camera's look orientation (yaw and pitch) in radians.
///
/// - `yaw`: horizontal rotation around the Y axis.
/// - `pitch`: vertical rotation around the X axis, clamped to ±85°.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerLook {
    pub yaw: f32,
    pub pitch: f32,
}

impl PlayerLook {
    #[must_use]
    pub fn from_degrees(yaw: f32, pitch: f32) -> Self {
        let mut look = Self { yaw: yaw.to_radians(), pitch: 0.0 };
        look.set_pitch(pitch.to_radians());
        look
    }

    /// Apply a raw mouse delta (updates yaw/pitch and clamps pitch).
    pub fn apply_delta(&mut self, delta: Vec2, sensitivity: f32) {
        let scale = sensitivity / 10_000.0;
        self.yaw -= delta.x * scale;
        let pitch = self.pitch - delta.y * scale;
        self.set_pitch(pitch);
    }

    fn set_pitch(&mut self, pitch: f32) {
        let max_pitch = CAMERA_MAX_PITCH_DEG.to_radians();
        self.pitch = pitch.clamp(-max_pitch, max_pitch);
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Camera transform for an arm of `length` anchored at `target`.
    #[must_use]
    pub fn arm_transform(&self, target: Vec3, length: f32) -> Transform {
        let rotation = self.rotation();
        Transform { translation: target + rotation * Vec3::new(0.0, 0.0, length), rotation, ..default() }
    }
}

/// Accumulate this update's mouse motion into every `PlayerLook`.
///
/// Ignored while the cursor is visible so UI clicks don't spin the camera.
#[allow(clippy::needless_pass_by_value)]
pub fn camera_look(
    windows: Query<&Window, With<PrimaryWindow>>,
    motion_events: Res<Events<MouseMotion>>,
    mut query: Query<&mut PlayerLook>,
    settings: Res<Settings>,
) {
    let mut delta = Vec2::ZERO;
    for ev in motion_events.iter_current_update_events() {
        let mut axis = ev.delta;
        if settings.controls.invert_x { axis.x = -axis.x; }
        if settings.controls.invert_y { axis.y = -axis.y; }
        delta += axis;
    }

    if delta == Vec2::ZERO {
        return;
    }

    let Ok(window) = windows.get_single() else { return };
    if window.cursor.visible {
        return;
    }

    for mut look in &mut query {
        look.apply_delta(delta, settings.controls.mouse_sensitivity);
    }
}

/// Move each spring-arm camera behind its target.
///
/// Runs in `Update`, after the frame's fixed steps, so camera and ball move
/// together. Neither is interpolated between fixed steps.
#[allow(clippy::needless_pass_by_value)]
pub fn follow_spring_arm(
    targets: Query<&Transform, Without<SpringArm>>,
    mut cameras: Query<(&mut Transform, &SpringArm, &PlayerLook)>,
) {
    for (mut tf, arm, look) in &mut cameras {
        let Ok(target) = targets.get(arm.target) else { continue };
        *tf = look.arm_transform(target.translation, arm.length);
    }
}

/// Copy the arm length from `Settings` when it changes.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_camera_settings(settings: Res<Settings>, mut arms: Query<&mut SpringArm>) {
    if !settings.is_changed() {
        return;
    }
    for mut arm in &mut arms {
        if arm.length != settings.camera.arm_length {
            arm.length = settings.camera.arm_length;
        }
    }
}

/// Left click grabs and hides the cursor, the pause key releases it.
#[allow(clippy::needless_pass_by_value)]
pub fn cursor_grab(
    mut wq: Query<&mut Window, With<PrimaryWindow>>,
    mb: Res<ButtonInput<MouseButton>>,
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let Ok(mut w) = wq.get_single_mut() else { return };
    if mb.just_pressed(MouseButton::Left) {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }

    if kb.just_pressed(settings.key_for("pause", KeyCode::Escape)) {
        w.cursor.grab_mode = CursorGrabMode::None;
        w.cursor.visible = true;
    }
}
