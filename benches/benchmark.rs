use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::f32::consts::TAU;

use bevy::prelude::{Quat, Transform, Vec2, Vec3};
use rollaball::physics::collision::sphere_box_contact;
use rollaball::physics::{PhysicsBody, PhysicsConfig, RigidBody};
use rollaball::player::camera::PlayerLook;
use rollaball::player::controller::{MovementConfig, MovementController};

fn controller(body: &mut RigidBody, max_jumps: u32) -> MovementController {
    MovementController::initialize(body, MovementConfig { move_force: 12.0, jump_impulse: 6.5 }, max_jumps)
}

/// Camera-relative force for a sweep of camera headings and axis values.
fn bench_lateral_input(c: &mut Criterion) {
    let mut body = RigidBody::new(2.0);
    let ctl = controller(&mut body, 1);
    let frames: Vec<Transform> = (0..64)
        .map(|i| PlayerLook { yaw: i as f32 / 64.0 * TAU, pitch: -0.4 }.arm_transform(Vec3::ZERO, 8.0))
        .collect();

    c.bench_function("lateral_input_sweep", |b| {
        b.iter(|| {
            for (i, frame) in frames.iter().enumerate() {
                let axis = (i % 3) as f32 - 1.0;
                ctl.apply_lateral_input(&mut body, black_box(axis), black_box(1.0), frame);
            }
            black_box(body.pending_force());
        })
    });
}

/// Jump/land churn through the jump counter.
fn bench_jump_cycle(c: &mut Criterion) {
    c.bench_function("jump_cycle", |b| {
        b.iter(|| {
            let mut body = RigidBody::new(2.0);
            let mut ctl = controller(&mut body, 2);
            for i in 0..1_000usize {
                ctl.try_jump(&mut body);
                let normal_up = if i % 3 == 0 { 1.0 } else { -0.5 };
                ctl.on_collision(black_box(normal_up));
            }
            black_box((ctl.jumps(), body.pending_impulse()));
        })
    });
}

/// Sphere/box tests against rotated boxes at varying distances.
fn bench_sphere_box_contact(c: &mut Criterion) {
    let boxes: Vec<Transform> = (0..32)
        .map(|i| Transform::from_xyz(i as f32, 0.0, 0.0).with_rotation(Quat::from_rotation_z(i as f32 * 0.1)))
        .collect();
    let half = Vec3::new(1.0, 0.25, 1.0);

    c.bench_function("sphere_box_contact", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for tf in &boxes {
                for y in 0..16 {
                    let center = tf.translation + Vec3::new(0.1, y as f32 * 0.1, 0.0);
                    if sphere_box_contact(black_box(center), 0.5, tf, half).is_some() {
                        hits += 1;
                    }
                }
            }
            black_box(hits);
        })
    });
}

/// Simulate a ball rolling and bouncing on a floor for many fixed steps.
fn bench_physics_steps(c: &mut Criterion) {
    let config = PhysicsConfig::default();
    let floor = Transform::from_xyz(0.0, -0.5, 0.0);
    let floor_half = Vec3::new(50.0, 0.5, 50.0);
    let dt = 1.0f32 / 60.0;

    c.bench_function("physics_many_steps", |b| {
        b.iter(|| {
            let mut body = RigidBody::new(2.0);
            let mut ctl = controller(&mut body, 1);
            let mut pos = Vec3::new(0.0, 3.0, 0.0);
            for step in 0..5_000 {
                ctl.apply_lateral_input(&mut body, 1.0, 0.0, &Transform::IDENTITY);
                if step % 90 == 0 {
                    ctl.try_jump(&mut body);
                }
                body.step(&mut pos, &config, dt);
                if let Some(contact) = sphere_box_contact(pos, 0.5, &floor, floor_half) {
                    body.respond_to_contact(&mut pos, contact, &config, dt);
                    ctl.on_collision(contact.normal.y);
                }
            }
            black_box((pos, body.mass()));
        })
    });
}

/// Test out large/extreme camera movement deltas
fn bench_camera_look_extreme(c: &mut Criterion) {
    c.bench_function("camera_look_extreme", |b| {
        b.iter(|| {
            let mut look = PlayerLook::default();
            for i in 0..1_000usize {
                let d = if (i & 1) == 0 { 1000.0 } else { -1000.0 };
                look.apply_delta(black_box(Vec2::new(d, -d)), 20.0);
            }
            black_box((look.yaw, look.pitch));
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_lateral_input,
        bench_jump_cycle,
        bench_sphere_box_contact,
        bench_physics_steps,
        bench_camera_look_extreme
}
criterion_main!(benches);
