//! Startup system that builds the play area and spawns the player rig.
//!
//! The level is a handful of static boxes: a floor open on one side (rolling
//! off it exercises the respawn), three boundary walls, a ramp, a raised
//! block to double-jump onto and an overhang to bump into from below.
use bevy::prelude::*;
use rollaball::physics::{BallCollider, BoxCollider, RigidBody};
use rollaball::player::{MovementConfig, MovementController, Player, PlayerLook, SpringArm};
use rollaball::settings::Settings;

const SPAWN_POINT: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// A piece of static level geometry.
struct Block {
    name: &'static str,
    center: Vec3,
    half_extents: Vec3,
    tilt_z: f32,
    color: Color,
}

fn level_blocks() -> [Block; 7] {
    let ground = Color::srgb(0.35, 0.55, 0.35);
    let wall = Color::srgb(0.55, 0.52, 0.48);
    let prop = Color::srgb(0.75, 0.45, 0.25);
    [
        Block { name: "floor", center: Vec3::new(0.0, -0.5, 0.0), half_extents: Vec3::new(15.0, 0.5, 15.0), tilt_z: 0.0, color: ground },
        Block { name: "wall_west", center: Vec3::new(-15.5, 1.0, 0.0), half_extents: Vec3::new(0.5, 1.5, 15.0), tilt_z: 0.0, color: wall },
        Block { name: "wall_east", center: Vec3::new(15.5, 1.0, 0.0), half_extents: Vec3::new(0.5, 1.5, 15.0), tilt_z: 0.0, color: wall },
        Block { name: "wall_north", center: Vec3::new(0.0, 1.0, -15.5), half_extents: Vec3::new(16.0, 1.5, 0.5), tilt_z: 0.0, color: wall },
        Block { name: "ramp", center: Vec3::new(7.0, 0.6, -4.0), half_extents: Vec3::new(3.5, 0.2, 2.0), tilt_z: 0.3, color: prop },
        Block { name: "plinth", center: Vec3::new(-6.0, 1.0, 6.0), half_extents: Vec3::new(2.0, 1.0, 2.0), tilt_z: 0.0, color: prop },
        Block { name: "overhang", center: Vec3::new(-6.0, 2.2, -5.0), half_extents: Vec3::new(2.5, 0.25, 2.5), tilt_z: 0.0, color: wall },
    ]
}

/// Spawn the level, the ball with its controller, the spring-arm camera and lights.
///
/// The controller is initialized against the freshly built body so its
/// force and impulse are scaled by the configured mass before the first step.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
) {
    for block in level_blocks() {
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::from_size(block.half_extents * 2.0)),
                material: materials.add(StandardMaterial {
                    base_color: block.color,
                    perceptual_roughness: 0.9,
                    ..default()
                }),
                transform: Transform::from_translation(block.center)
                    .with_rotation(Quat::from_rotation_z(block.tilt_z)),
                ..default()
            },
            BoxCollider { half_extents: block.half_extents },
            Name::new(block.name),
        ));
    }

    let tuning = &settings.player;
    let mut body = RigidBody::new(tuning.mass);
    let controller = MovementController::initialize(&mut body, MovementConfig::from(tuning), tuning.max_jump_count);

    let ball = commands
        .spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(1.0).mesh().uv(32, 18)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(0.85, 0.85, 0.9),
                    metallic: 0.6,
                    perceptual_roughness: 0.3,
                    ..default()
                }),
                transform: Transform::from_translation(SPAWN_POINT).with_scale(Vec3::splat(tuning.radius)),
                ..default()
            },
            body,
            BallCollider { radius: tuning.radius },
            Name::new("player_ball"),
        ))
        .id();

    let look = PlayerLook::from_degrees(0.0, settings.camera.pitch_degrees);
    let camera = commands
        .spawn((
            Camera3dBundle {
                transform: look.arm_transform(SPAWN_POINT, settings.camera.arm_length),
                ..default()
            },
            SpringArm { target: ball, length: settings.camera.arm_length },
            look,
        ))
        .id();

    commands.entity(ball).insert(Player::new(controller, camera, SPAWN_POINT));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: true,
            illuminance: 8_000.0,
            ..default()
        },
        transform: Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });

    info!("level ready: ball mass {:.2}, {} jump(s)", tuning.mass, tuning.max_jump_count);
}
