//! Player reactions to the physics step: jump refills on contact, respawning
//! after a fall, and re-applying tuning when settings change.

use bevy::prelude::*;

use crate::physics::{BallCollider, CollisionHit, RigidBody};
use crate::player::controller::MovementConfig;
use crate::player::Player;
use crate::settings::{PlayerSettings, Settings};

impl From<&PlayerSettings> for MovementConfig {
    fn from(s: &PlayerSettings) -> Self {
        Self { move_force: s.move_force, jump_impulse: s.jump_impulse }
    }
}

/// Feed every contact this step into the owning player's controller.
pub fn reset_jumps_on_contact(mut hits: EventReader<CollisionHit>, mut players: Query<&mut Player>) {
    for hit in hits.read() {
        let Ok(mut player) = players.get_mut(hit.body) else { continue };
        player.controller.on_collision(hit.normal.y);
        player.last_contact_normal = Some(hit.normal);
    }
}

/// Put balls that fell below the kill height back at their spawn point.
#[allow(clippy::needless_pass_by_value)]
pub fn respawn_fallen_players(
    settings: Res<Settings>,
    mut players: Query<(&mut Transform, &mut RigidBody, &mut Player)>,
) {
    let kill_height = settings.player.kill_height;
    for (mut tf, mut body, mut player) in &mut players {
        if tf.translation.y >= kill_height {
            continue;
        }
        info!("player fell below {kill_height:.1}, respawning at {}", player.spawn_point);
        tf.translation = player.spawn_point;
        body.linear_velocity = Vec3::ZERO;
        player.controller.reset_jumps();
        player.last_contact_normal = None;
    }
}

/// Re-apply mass, radius and movement tuning after a settings reload.
///
/// The ball mesh is a unit sphere scaled by the radius, so the scale follows too.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_player_settings(
    settings: Res<Settings>,
    mut players: Query<(&mut Transform, &mut RigidBody, &mut BallCollider, &mut Player)>,
) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    let tuning = &settings.player;
    for (mut tf, mut body, mut collider, mut player) in &mut players {
        body.mass = tuning.mass;
        collider.radius = tuning.radius;
        tf.scale = Vec3::splat(tuning.radius);
        player.controller.retune(&mut *body, MovementConfig::from(tuning), tuning.max_jump_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::controller::MovementController;
    use bevy::ecs::event::Events;

    fn spawn_player(world: &mut World, spent: u32) -> Entity {
        let mut body = RigidBody::new(1.0);
        let config = MovementConfig { move_force: 1.0, jump_impulse: 1.0 };
        let mut controller = MovementController::initialize(&mut body, config, 3);
        for _ in 0..spent {
            controller.try_jump(&mut body);
        }
        world
            .spawn((Transform::default(), body, Player::new(controller, Entity::PLACEHOLDER, Vec3::new(0.0, 2.0, 0.0))))
            .id()
    }

    fn hit(body: Entity, normal: Vec3) -> CollisionHit {
        CollisionHit { body, other: Entity::PLACEHOLDER, normal, normal_impulse: Vec3::ZERO }
    }

    fn run_contacts(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(reset_jumps_on_contact);
        schedule.run(world);
    }

    #[test]
    fn wall_and_ceiling_hits_keep_jump_count() {
        let mut world = World::new();
        world.init_resource::<Events<CollisionHit>>();
        let ball = spawn_player(&mut world, 2);

        world.send_event(hit(ball, Vec3::X));
        world.send_event(hit(ball, Vec3::NEG_Y));
        run_contacts(&mut world);

        let player = world.get::<Player>(ball).unwrap();
        assert_eq!(player.controller.jumps().jump_count, 2);
        assert_eq!(player.last_contact_normal, Some(Vec3::NEG_Y));
    }

    #[test]
    fn ground_hit_resets_only_the_hit_player() {
        let mut world = World::new();
        world.init_resource::<Events<CollisionHit>>();
        let grounded = spawn_player(&mut world, 2);
        let airborne = spawn_player(&mut world, 1);

        world.send_event(hit(grounded, Vec3::new(0.0, 0.7, 0.7).normalize()));
        run_contacts(&mut world);

        assert_eq!(world.get::<Player>(grounded).unwrap().controller.jumps().jump_count, 0);
        assert_eq!(world.get::<Player>(airborne).unwrap().controller.jumps().jump_count, 1);
    }

    #[test]
    fn fallen_player_respawns_with_fresh_jumps() {
        let mut world = World::new();
        world.insert_resource(Settings::default());
        let ball = spawn_player(&mut world, 1);
        let below = Settings::default().player.kill_height - 1.0;
        world.get_mut::<Transform>(ball).unwrap().translation.y = below;
        world.get_mut::<RigidBody>(ball).unwrap().linear_velocity = Vec3::new(1.0, -30.0, 0.0);

        let mut schedule = Schedule::default();
        schedule.add_systems(respawn_fallen_players);
        schedule.run(&mut world);

        assert_eq!(world.get::<Transform>(ball).unwrap().translation, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(world.get::<RigidBody>(ball).unwrap().linear_velocity, Vec3::ZERO);
        assert_eq!(world.get::<Player>(ball).unwrap().controller.jumps().jump_count, 0);
    }

    #[test]
    fn reload_retunes_player_but_startup_does_not() {
        let mut world = World::new();
        let mut settings = Settings::default();
        settings.player.mass = 4.0;
        settings.player.radius = 2.0;
        world.insert_resource(settings);
        let ball = spawn_player(&mut world, 1);
        world.entity_mut(ball).insert(BallCollider { radius: 0.5 });

        let mut schedule = Schedule::default();
        schedule.add_systems(sync_player_settings);

        // The freshly inserted settings were already applied at spawn.
        schedule.run(&mut world);
        assert_eq!(world.get::<BallCollider>(ball).unwrap().radius, 0.5);
        assert_eq!(world.get::<RigidBody>(ball).unwrap().mass, 1.0);
        assert_eq!(world.get::<Player>(ball).unwrap().controller.move_force(), 1.0);

        world.resource_mut::<Settings>().player.move_force = 12.0;
        schedule.run(&mut world);

        assert_eq!(world.get::<BallCollider>(ball).unwrap().radius, 2.0);
        assert_eq!(world.get::<Transform>(ball).unwrap().scale, Vec3::splat(2.0));
        assert_eq!(world.get::<RigidBody>(ball).unwrap().mass, 4.0);
        let controller = world.get::<Player>(ball).unwrap().controller;
        assert_eq!(controller.move_force(), 48.0);
        assert_eq!(controller.jumps().jump_count, 1);
        assert_eq!(controller.jumps().max_jump_count, Settings::default().player.max_jump_count);
    }
}
