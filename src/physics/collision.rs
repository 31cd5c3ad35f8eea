//! Sphere-versus-box contact geometry.
//!
//! Boxes may be arbitrarily rotated; the test runs in the box's local frame
//! and the resulting normal is rotated back to world space.

use bevy::prelude::*;

/// A single contact between a ball and a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit surface normal at the contact, pointing from the surface toward the ball.
    pub normal: Vec3,
    /// How far the ball overlaps the surface along `normal`.
    pub depth: f32,
}

/// Test a sphere against an oriented box.
///
/// # Arguments
/// * `center` - sphere centre in world space
/// * `radius` - sphere radius
/// * `box_tf` - box translation and rotation (scale is ignored, fold it into `half_extents`)
/// * `half_extents` - half size of the box along its local axes
///
/// # Returns
/// `None` when the sphere does not touch the box.
#[must_use]
pub fn sphere_box_contact(center: Vec3, radius: f32, box_tf: &Transform, half_extents: Vec3) -> Option<Contact> {
    let inv = box_tf.rotation.inverse();
    let local = inv * (center - box_tf.translation);
    let closest = local.clamp(-half_extents, half_extents);
    let delta = local - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return None;
    }

    let (local_normal, depth) = if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        (delta / dist, radius - dist)
    } else {
        // Centre is inside the box: leave through the nearest face.
        let room = half_extents - local.abs();
        let (axis, penetration) = if room.x <= room.y && room.x <= room.z {
            (Vec3::X * sign(local.x), room.x)
        } else if room.y <= room.z {
            (Vec3::Y * sign(local.y), room.y)
        } else {
            (Vec3::Z * sign(local.z), room.z)
        };
        (axis, penetration + radius)
    };

    Some(Contact { normal: box_tf.rotation * local_normal, depth })
}

fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
