//! Timed interpolation helpers.
//!
//! Routines describe motion as a position function of time. The helpers here
//! sample that function at `t` and `t + dt` and derive velocity as the finite
//! difference `(pos(t + dt) - pos(t)) / dt`, so no closed-form derivative is
//! needed.
//!
//! The result is exact only as `dt -> 0`. Use the simulation's own tick
//! length for `dt`; the helpers do not compensate for jitter between the
//! nominal `dt` and the actual spacing of ticks.

use glam::{Mat3, Vec3};

use crate::choreography::error::{ChoreographyError, Result};

/// Fixed simulation step of a 60 Hz arena.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Position and velocity requested for a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematic {
    pub position: Vec3,
    pub velocity: Vec3,
}

fn check_dt(dt: f32) -> Result<()> {
    if dt.is_nan() || dt <= 0.0 {
        return Err(ChoreographyError::InvalidTimeStep(dt));
    }
    Ok(())
}

/// Forward-difference velocity of `pos` at time `t`.
pub fn finite_difference_velocity<F>(pos: F, t: f32, dt: f32) -> Result<Vec3>
where
    F: Fn(f32) -> Vec3,
{
    check_dt(dt)?;
    Ok((pos(t + dt) - pos(t)) / dt)
}

/// Sample position at `t` together with its finite-difference velocity.
pub fn sample_kinematics<F>(pos: F, t: f32, dt: f32) -> Result<Kinematic>
where
    F: Fn(f32) -> Vec3,
{
    check_dt(dt)?;
    let position = pos(t);
    let velocity = (pos(t + dt) - position) / dt;
    Ok(Kinematic { position, velocity })
}

/// Rotate `point` by `angle` radians about `axis` through `center`.
///
/// `axis` does not need to be normalised; a zero axis leaves the point alone.
pub fn rotate_about(point: Vec3, center: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let Some(axis) = axis.try_normalize() else {
        return point;
    };
    Mat3::from_axis_angle(axis, angle) * (point - center) + center
}

/// Component-wise linear interpolation.
pub(crate) fn lerp_v3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}
