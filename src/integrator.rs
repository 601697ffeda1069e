use cgmath::Vector3;
use std::ops::{AddAssign, Mul};

pub type Vec3 = Vector3<f64>;

/// Semi-implicit (symplectic) Euler.
///
/// Velocity is advanced first and the updated velocity moves the position.
/// Generic so the one-dimensional labs can use plain `f64`.
pub fn semi_implicit_euler<T>(position: &mut T, velocity: &mut T, acceleration: T, dt: f64)
where
  T: Copy + AddAssign + Mul<f64, Output = T>,
{
  *velocity += acceleration * dt;
  *position += *velocity * dt;
}

/// Acceleration acting on a body, given its position and velocity.
pub trait AccelerationField {
  fn acceleration(&self, position: Vec3, velocity: Vec3) -> Vec3;
}

impl<F> AccelerationField for F
where
  F: Fn(Vec3, Vec3) -> Vec3,
{
  fn acceleration(&self, position: Vec3, velocity: Vec3) -> Vec3 {
    self(position, velocity)
  }
}

/// Position, velocity and the acceleration cached from the previous step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyState {
  pub pos: Vec3,
  pub vel: Vec3,
  pub acc: Vec3,
}

impl BodyState {
  pub fn new(pos: Vec3, vel: Vec3, field: &dyn AccelerationField) -> Self {
    Self {
      pos,
      vel,
      acc: field.acceleration(pos, vel),
    }
  }
}

/// Velocity-Verlet step:
/// 1. x(t+dt) = x(t) + v(t)*dt + 0.5*a(t)*dt^2
/// 2. a(t+dt) from the field at the new position
/// 3. v(t+dt) = v(t) + 0.5*(a(t) + a(t+dt))*dt
///
/// The velocity handed to the field in step 2 is still v(t), so velocity
/// dependent terms (drag, thrust direction) lag by one step.
pub fn velocity_verlet(state: &mut BodyState, field: &dyn AccelerationField, dt: f64) {
  let next_pos = state.pos + state.vel * dt + state.acc * (0.5 * dt * dt);
  let next_acc = field.acceleration(next_pos, state.vel);
  state.vel += (state.acc + next_acc) * (0.5 * dt);
  state.pos = next_pos;
  state.acc = next_acc;
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::InnerSpace;

  #[test]
  fn test_semi_implicit_euler_updates_velocity_first() {
    let mut x = 0.0;
    let mut v = 1.0;
    semi_implicit_euler(&mut x, &mut v, 2.0, 0.5);
    assert_eq!(v, 2.0);
    // position uses the new velocity
    assert_eq!(x, 1.0);
  }

  #[test]
  fn test_semi_implicit_euler_vector() {
    let mut position = Vec3::new(1.0, 0.0, 0.0);
    let mut velocity = Vec3::new(0.0, 1.0, 0.0);
    semi_implicit_euler(&mut position, &mut velocity, Vec3::new(0.0, 0.0, -9.81), 0.01);
    assert!((velocity - Vec3::new(0.0, 1.0, -0.0981)).magnitude() < 1e-12);
    assert!((position - Vec3::new(1.0, 0.01, -0.000981)).magnitude() < 1e-12);
  }

  #[test]
  fn test_velocity_verlet_constant_field() {
    let field = |_: Vec3, _: Vec3| Vec3::new(0.0, 0.0, -9.81);
    let mut state = BodyState::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), &field);
    velocity_verlet(&mut state, &field, 0.01);
    assert!((state.pos - Vec3::new(1.0, 0.01, -0.0004905)).magnitude() < 1e-12);
    assert!((state.vel - Vec3::new(0.0, 1.0, -0.0981)).magnitude() < 1e-12);
  }

  #[test]
  fn test_velocity_verlet_field_sees_pre_step_velocity() {
    // a = v, so the new acceleration echoes whichever velocity the field got
    let field = |_: Vec3, v: Vec3| v;
    let mut state = BodyState::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), &field);
    velocity_verlet(&mut state, &field, 0.1);
    assert_eq!(state.acc, Vec3::new(1.0, 0.0, 0.0));
    assert!((state.vel - Vec3::new(1.1, 0.0, 0.0)).magnitude() < 1e-12);
    velocity_verlet(&mut state, &field, 0.1);
    assert!((state.acc - Vec3::new(1.1, 0.0, 0.0)).magnitude() < 1e-12);
  }

  #[test]
  fn test_velocity_verlet_spring_energy() {
    let field = |p: Vec3, _: Vec3| -p;
    let mut state = BodyState::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0), &field);
    let initial = 0.5 * state.pos.magnitude2();
    for _ in 0..1000 {
      velocity_verlet(&mut state, &field, 0.01);
    }
    let energy = 0.5 * state.vel.magnitude2() + 0.5 * state.pos.magnitude2();
    assert!(((energy - initial) / initial).abs() < 1e-3, "energy = {energy}");
  }
}
