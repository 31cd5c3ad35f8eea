//! Debug overlay and contact gizmos.
//!
//! The overlay (F1 by default) periodically shows FPS, the ball's position
//! and velocity, jump charges and the last contact normal. The contact view
//! (F2) draws each contact normal as it happens, green when it refills jumps
//! and red when it doesn't.

use crate::physics::{CollisionHit, RigidBody};
use crate::player::Player;
use crate::settings::Settings;
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    pub visible: bool,
}

#[derive(Resource)]
pub struct DebugOverlayTimer(pub Timer);

impl Default for DebugOverlayTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(0.25, TimerMode::Repeating))
    }
}

#[derive(Resource, Default)]
pub struct ContactGizmosVisible(pub bool);

#[derive(Component)]
pub struct DebugOverlayText;

pub struct DebugOverlayPlugin;

impl Plugin for DebugOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugOverlayState>()
            .init_resource::<DebugOverlayTimer>()
            .init_resource::<ContactGizmosVisible>()
            .add_systems(Startup, spawn_debug_overlay)
            .add_systems(
                Update,
                (toggle_debug_views, update_debug_overlay, draw_contact_gizmos).chain(),
            );
    }
}

/// Flip the overlay and contact view on their bound keys.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_views(
    mut state: ResMut<DebugOverlayState>,
    mut contacts: ResMut<ContactGizmosVisible>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.key_for("toggle_debug", KeyCode::F1)) {
        state.visible = !state.visible;
    }
    if input.just_pressed(settings.key_for("toggle_contacts", KeyCode::F2)) {
        contacts.0 = !contacts.0;
    }
}

/// Build the overlay text for one player.
#[must_use]
pub fn describe_player(tf: &Transform, body: &RigidBody, player: &Player) -> String {
    let pos = tf.translation;
    let vel = body.linear_velocity;
    let jumps = player.controller.jumps();
    let contact = player
        .last_contact_normal
        .map_or_else(|| "none".to_string(), |n| format!("({:.2}, {:.2}, {:.2})", n.x, n.y, n.z));
    format!(
        "Pos: ({:.1}, {:.1}, {:.1})\nVel: ({:.1}, {:.1}, {:.1}) | Speed: {:.2}\nJumps: {}/{}\nLast contact: {}",
        pos.x, pos.y, pos.z, vel.x, vel.y, vel.z, vel.length(), jumps.jump_count, jumps.max_jump_count, contact,
    )
}

/// Refresh the overlay text once per timer interval.
#[allow(clippy::needless_pass_by_value)]
pub fn update_debug_overlay(
    diagnostics: Res<DiagnosticsStore>,
    state: Res<DebugOverlayState>,
    time: Res<Time>,
    mut timer: ResMut<DebugOverlayTimer>,
    mut text: Query<&mut Text, With<DebugOverlayText>>,
    players: Query<(&Transform, &RigidBody, &Player)>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = text.get_single_mut() else { return };

    if !state.visible {
        text.sections[0].value.clear();
        return;
    }

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let player_text = players
        .get_single()
        .map_or_else(|_| "Player: N/A".to_string(), |(tf, body, player)| describe_player(tf, body, player));

    text.sections[0].value = format!("FPS: {fps:.1}\nFrame Time: {frame_time:.2} ms\n{player_text}");
}

/// Spawn the (initially empty) overlay text in the top-left corner.
pub fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle {
                    font_size: 18.0,
                    color: Color::srgb(1.0, 1.0, 0.0),
                    ..default()
                },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        DebugOverlayText,
    ));
}

/// Draw this frame's contact normals at the ball.
#[allow(clippy::needless_pass_by_value)]
pub fn draw_contact_gizmos(
    visible: Res<ContactGizmosVisible>,
    mut hits: EventReader<CollisionHit>,
    bodies: Query<&Transform>,
    mut gizmos: Gizmos,
) {
    if !visible.0 {
        hits.clear();
        return;
    }

    let grounded = Color::srgb(0.0, 1.0, 0.0);
    let blocked = Color::srgb(1.0, 0.0, 0.0);
    for hit in hits.read() {
        let Ok(tf) = bodies.get(hit.body) else { continue };
        let color = if hit.normal.y > 0.0 { grounded } else { blocked };
        gizmos.arrow(tf.translation, tf.translation + hit.normal * 1.5, color);
    }
}
