//! Minimal rigid-body simulation for the player ball.
//!
//! Dynamic bodies are spheres (`RigidBody` + `BallCollider`); the level is
//! made of static, possibly rotated boxes (`BoxCollider`). Each fixed step
//! integrates forces and impulses, pushes balls out of the boxes they overlap
//! and raises a `CollisionHit` event per contact. Game code queues forces
//! through the `PhysicsBody` trait and reacts to hits in
//! `PhysicsSet::HandleContacts`.
//!
//! Dynamic-vs-dynamic contacts and angular motion are not simulated.

pub mod collision;

use bevy::prelude::*;

use crate::physics::collision::{sphere_box_contact, Contact};
use crate::settings::{PhysicsSettings, Settings};

pub const PHYSICS_TICK_RATE: f64 = 60.0;

/// The subset of a rigid body that gameplay code drives.
pub trait PhysicsBody {
    fn set_simulate_physics(&mut self, simulate: bool);
    /// Queue a continuous force for the next physics step.
    fn add_force(&mut self, force: Vec3);
    /// Queue an instantaneous change in momentum for the next physics step.
    fn add_impulse(&mut self, impulse: Vec3);
    fn mass(&self) -> f32;
}

/// Simulated body state. Forces and impulses accumulate until the next step
/// consumes them.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub mass: f32,
    pub linear_velocity: Vec3,
    simulate: bool,
    force: Vec3,
    impulse: Vec3,
}

impl RigidBody {
    /// A body at rest. Simulation starts disabled until the owner enables it.
    #[must_use]
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            linear_velocity: Vec3::ZERO,
            simulate: false,
            force: Vec3::ZERO,
            impulse: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn is_simulating(&self) -> bool { self.simulate }

    #[must_use]
    pub fn pending_force(&self) -> Vec3 { self.force }

    #[must_use]
    pub fn pending_impulse(&self) -> Vec3 { self.impulse }

    /// Advance the body by `dt`, consuming queued forces and impulses.
    ///
    /// Bodies that are not simulating stay put and drop whatever was queued.
    pub fn step(&mut self, translation: &mut Vec3, config: &PhysicsConfig, dt: f32) {
        let force = std::mem::take(&mut self.force);
        let impulse = std::mem::take(&mut self.impulse);
        if !self.simulate {
            return;
        }

        let inv_mass = if self.mass > 0.0 { self.mass.recip() } else { 0.0 };
        self.linear_velocity += config.gravity * dt + force * inv_mass * dt + impulse * inv_mass;
        self.linear_velocity *= (1.0 - config.linear_damping * dt).max(0.0);
        *translation += self.linear_velocity * dt;
    }

    /// Separate the body from a surface and remove its approaching velocity.
    ///
    /// # Returns
    /// The impulse the surface applied to the body (zero when it was already separating).
    pub fn respond_to_contact(&mut self, translation: &mut Vec3, contact: Contact, config: &PhysicsConfig, dt: f32) -> Vec3 {
        let n = contact.normal;
        *translation += n * contact.depth;

        let approach = self.linear_velocity.dot(n);
        let mut delta_v = Vec3::ZERO;
        if approach < 0.0 {
            delta_v -= n * approach * (1.0 + config.restitution);
        }

        let tangential = self.linear_velocity - n * approach;
        delta_v -= tangential * (config.rolling_friction * dt).min(1.0);

        self.linear_velocity += delta_v;
        n * (delta_v.dot(n) * self.mass)
    }
}

impl PhysicsBody for RigidBody {
    fn set_simulate_physics(&mut self, simulate: bool) {
        self.simulate = simulate;
    }

    fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    fn add_impulse(&mut self, impulse: Vec3) {
        self.impulse += impulse;
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}

/// Sphere collision shape for dynamic bodies.
#[derive(Component, Debug, Clone, Copy)]
pub struct BallCollider {
    pub radius: f32,
}

/// Box collision shape for static level geometry, oriented by the entity's `Transform`.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoxCollider {
    pub half_extents: Vec3,
}

/// Raised once per fixed step for every contact a body is in.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    pub body: Entity,
    pub other: Entity,
    /// Surface normal at the contact, pointing toward `body`.
    pub normal: Vec3,
    pub normal_impulse: Vec3,
}

/// World-wide simulation parameters.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    pub restitution: f32,
    pub rolling_friction: f32,
    pub linear_damping: f32,
}

impl From<&PhysicsSettings> for PhysicsConfig {
    fn from(s: &PhysicsSettings) -> Self {
        Self {
            gravity: Vec3::Y * s.gravity,
            restitution: s.restitution.max(0.0),
            rolling_friction: s.rolling_friction.max(0.0),
            linear_damping: s.linear_damping.max(0.0),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::from(&PhysicsSettings::default())
    }
}

/// Ordering of the fixed-step physics pipeline.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicsSet {
    /// Gameplay queues forces and impulses.
    ApplyForces,
    Integrate,
    ResolveContacts,
    /// Gameplay reacts to `CollisionHit` events raised this step.
    HandleContacts,
}

impl PhysicsSet {
    /// The sets in the order they run within one fixed step.
    #[must_use]
    pub fn pipeline() -> impl IntoSystemSetConfigs {
        (Self::ApplyForces, Self::Integrate, Self::ResolveContacts, Self::HandleContacts).chain()
    }
}

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(PHYSICS_TICK_RATE))
            .init_resource::<PhysicsConfig>()
            .add_event::<CollisionHit>()
            .configure_sets(FixedUpdate, PhysicsSet::pipeline())
            .add_systems(FixedUpdate, (integrate_bodies, roll_balls).chain().in_set(PhysicsSet::Integrate))
            .add_systems(FixedUpdate, resolve_contacts.in_set(PhysicsSet::ResolveContacts));
    }
}

/// Apply gravity, queued forces and impulses to every rigid body.
#[allow(clippy::needless_pass_by_value)]
pub fn integrate_bodies(
    time: Res<Time>,
    config: Res<PhysicsConfig>,
    mut bodies: Query<(&mut Transform, &mut RigidBody)>,
) {
    let dt = time.delta_seconds();
    for (mut tf, mut body) in &mut bodies {
        body.step(&mut tf.translation, &config, dt);
    }
}

/// Spin balls to match their horizontal travel. Visual only: contacts ignore
/// the ball's rotation.
#[allow(clippy::needless_pass_by_value)]
pub fn roll_balls(time: Res<Time>, mut balls: Query<(&mut Transform, &RigidBody, &BallCollider)>) {
    let dt = time.delta_seconds();
    for (mut tf, body, ball) in &mut balls {
        let v = body.linear_velocity;
        let axis = Vec3::Y.cross(Vec3::new(v.x, 0.0, v.z));
        if ball.radius > 0.0 && axis.length_squared() > 1e-8 {
            tf.rotation = (Quat::from_scaled_axis(axis * dt / ball.radius) * tf.rotation).normalize();
        }
    }
}

/// Push balls out of static boxes and report each contact.
#[allow(clippy::needless_pass_by_value)]
pub fn resolve_contacts(
    time: Res<Time>,
    config: Res<PhysicsConfig>,
    mut bodies: Query<(Entity, &mut Transform, &mut RigidBody, &BallCollider)>,
    statics: Query<(Entity, &Transform, &BoxCollider), Without<RigidBody>>,
    mut hits: EventWriter<CollisionHit>,
) {
    let dt = time.delta_seconds();
    for (entity, mut tf, mut body, ball) in &mut bodies {
        if !body.is_simulating() {
            continue;
        }
        for (other, box_tf, shape) in &statics {
            let half = shape.half_extents * box_tf.scale;
            let Some(contact) = sphere_box_contact(tf.translation, ball.radius, box_tf, half) else {
                continue;
            };
            let normal_impulse = body.respond_to_contact(&mut tf.translation, contact, &config, dt);
            hits.send(CollisionHit { body: entity, other, normal: contact.normal, normal_impulse });
        }
    }
}

/// Copy physics tuning from `Settings` whenever it changes.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_physics_settings(settings: Res<Settings>, mut config: ResMut<PhysicsConfig>) {
    if !settings.is_changed() {
        return;
    }
    let desired = PhysicsConfig::from(&settings.physics);
    if *config != desired {
        *config = desired;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::event::Events;
    use std::time::Duration;

    const DT: f32 = 1.0 / 60.0;

    fn still_config() -> PhysicsConfig {
        PhysicsConfig { gravity: Vec3::ZERO, restitution: 0.0, rolling_friction: 0.0, linear_damping: 0.0 }
    }

    #[test]
    fn force_accelerates_by_force_over_mass() {
        let mut body = RigidBody::new(2.0);
        body.set_simulate_physics(true);
        let mut pos = Vec3::ZERO;
        body.add_force(Vec3::new(4.0, 0.0, 0.0));
        body.step(&mut pos, &still_config(), 0.5);
        assert!((body.linear_velocity - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(body.pending_force(), Vec3::ZERO);
    }

    #[test]
    fn impulse_changes_velocity_instantly() {
        let mut body = RigidBody::new(4.0);
        body.set_simulate_physics(true);
        let mut pos = Vec3::ZERO;
        body.add_impulse(Vec3::new(0.0, 8.0, 0.0));
        body.step(&mut pos, &still_config(), DT);
        assert!((body.linear_velocity.y - 2.0).abs() < 1e-6);
        assert_eq!(body.pending_impulse(), Vec3::ZERO);
    }

    #[test]
    fn forces_accumulate_within_a_step() {
        let mut body = RigidBody::new(1.0);
        body.add_force(Vec3::X);
        body.add_force(Vec3::Z * 2.0);
        assert_eq!(body.pending_force(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn non_simulating_body_drops_queued_input() {
        let mut body = RigidBody::new(1.0);
        let mut pos = Vec3::ZERO;
        body.add_force(Vec3::X * 10.0);
        body.add_impulse(Vec3::Y * 10.0);
        body.step(&mut pos, &PhysicsConfig::default(), DT);
        assert_eq!(pos, Vec3::ZERO);
        assert_eq!(body.linear_velocity, Vec3::ZERO);
        assert_eq!(body.pending_force(), Vec3::ZERO);
    }

    #[test]
    fn contact_cancels_approach_velocity() {
        let mut body = RigidBody::new(2.0);
        body.linear_velocity = Vec3::new(0.0, -3.0, 0.0);
        let mut pos = Vec3::new(0.0, 0.4, 0.0);
        let contact = Contact { normal: Vec3::Y, depth: 0.1 };
        let impulse = body.respond_to_contact(&mut pos, contact, &still_config(), DT);
        assert!((pos.y - 0.5).abs() < 1e-6);
        assert!(body.linear_velocity.y.abs() < 1e-6);
        assert!((impulse - Vec3::Y * 6.0).length() < 1e-5);
    }

    fn physics_world() -> (World, Schedule) {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.insert_resource(PhysicsConfig::default());
        world.init_resource::<Events<CollisionHit>>();
        let mut schedule = Schedule::default();
        schedule.add_systems((integrate_bodies, resolve_contacts).chain());
        (world, schedule)
    }

    fn tick(world: &mut World, schedule: &mut Schedule) {
        world.resource_mut::<Time>().advance_by(Duration::from_secs_f32(DT));
        schedule.run(world);
    }

    #[test]
    fn ball_settles_on_floor_and_reports_upward_hits() {
        let (mut world, mut schedule) = physics_world();
        let floor = world
            .spawn((Transform::from_xyz(0.0, -0.5, 0.0), BoxCollider { half_extents: Vec3::new(10.0, 0.5, 10.0) }))
            .id();
        let mut body = RigidBody::new(1.0);
        body.set_simulate_physics(true);
        let ball = world.spawn((Transform::from_xyz(0.0, 2.0, 0.0), body, BallCollider { radius: 0.5 })).id();

        let mut hit_seen = false;
        for _ in 0..240 {
            tick(&mut world, &mut schedule);
            let events = world.resource::<Events<CollisionHit>>();
            for hit in events.iter_current_update_events() {
                assert_eq!(hit.body, ball);
                assert_eq!(hit.other, floor);
                assert!(hit.normal.y > 0.99);
                hit_seen = true;
            }
        }

        assert!(hit_seen);
        let y = world.get::<Transform>(ball).unwrap().translation.y;
        assert!((y - 0.5).abs() < 0.05, "ball rests on the floor, got y = {y}");
    }

    #[test]
    fn reload_replaces_physics_config() {
        let mut world = World::new();
        world.insert_resource(Settings::default());
        world.insert_resource(PhysicsConfig::default());
        let mut schedule = Schedule::default();
        schedule.add_systems(sync_physics_settings);
        schedule.run(&mut world);
        assert_eq!(*world.resource::<PhysicsConfig>(), PhysicsConfig::default());

        {
            let mut settings = world.resource_mut::<Settings>();
            settings.physics.gravity = -5.0;
            settings.physics.restitution = -1.0;
        }
        schedule.run(&mut world);

        let config = world.resource::<PhysicsConfig>();
        assert_eq!(config.gravity, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(config.restitution, 0.0);
        assert_eq!(config.linear_damping, PhysicsSettings::default().linear_damping);
    }
}
