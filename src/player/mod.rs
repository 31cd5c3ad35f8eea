//! Player components and systems (controller, input, camera, contact handling).
//!
//! The ball entity carries a `Player` next to its `RigidBody`; the camera is
//! a separate entity with a `SpringArm` pointing back at the ball. `Player`
//! remembers the camera entity so movement can be expressed in its frame.
//!
//! # Example
//!
//! ```ignore
//! let mut body = RigidBody::new(settings.player.mass);
//! let controller = MovementController::initialize(&mut body, config, 1);
//! let ball = commands.spawn((TransformBundle::default(), body, BallCollider { radius: 0.5 })).id();
//! let camera = commands.spawn((Camera3dBundle::default(), SpringArm { target: ball, length: 8.0 }, PlayerLook::default())).id();
//! commands.entity(ball).insert(Player::new(controller, camera, Vec3::ZERO));
//! app.add_plugins((PhysicsPlugin, PlayerPlugin));
//! ```
pub mod camera;
pub mod controller;
pub mod movement;
pub mod physics;

use bevy::prelude::*;

pub use camera::*;
pub use controller::*;
pub use movement::*;
pub use physics::*;

use crate::physics::PhysicsSet;

/// Player state attached to the ball entity.
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub controller: MovementController,
    /// Camera whose frame defines "forward" and "right".
    pub camera: Entity,
    /// Where the ball returns to after falling out of the level.
    pub spawn_point: Vec3,
    /// Normal of the most recent contact, for diagnostics.
    pub last_contact_normal: Option<Vec3>,
}

impl Player {
    #[must_use]
    pub fn new(controller: MovementController, camera: Entity, spawn_point: Vec3) -> Self {
        Self { controller, camera, spawn_point, last_contact_normal: None }
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementInput>()
            .add_systems(
                Update,
                (
                    read_movement_input,
                    sync_player_settings,
                    sync_camera_settings,
                    cursor_grab,
                    (camera_look, follow_spring_arm).chain(),
                ),
            )
            .add_systems(FixedUpdate, apply_movement_input.in_set(PhysicsSet::ApplyForces))
            .add_systems(
                FixedUpdate,
                (reset_jumps_on_contact, respawn_fallen_players)
                    .chain()
                    .in_set(PhysicsSet::HandleContacts),
            );
    }
}
