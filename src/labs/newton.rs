use super::{wrap_corridor, Lab, LabKind};
use crate::telemetry::Sample;
use crate::NewtonParams;

/// Floor under the mass so that F/m stays finite.
const MIN_MASS: f64 = 1e-6;
/// Scales the friction slider into a per-second damping rate.
const DAMPING_RATE: f64 = 6.0;

/// F = ma on a box pushed along the corridor. Friction acts as velocity
/// damping applied between the velocity and position updates.
pub struct NewtonLab {
  params: NewtonParams,
  t: f64,
  x: f64,
  v: f64,
}

impl NewtonLab {
  pub fn new(params: NewtonParams) -> Self {
    Self {
      params,
      t: 0.0,
      x: 0.0,
      v: 0.0,
    }
  }

  pub fn set_params(&mut self, params: NewtonParams) {
    self.params = params;
    self.reset();
  }

  pub fn acceleration(&self) -> f64 {
    self.params.force / self.params.mass.max(MIN_MASS)
  }

  /// Velocity at which the per-tick damping cancels the push.
  pub fn terminal_velocity(&self, dt: f64) -> Option<f64> {
    let keep = (1.0 - self.params.friction * dt * DAMPING_RATE).max(0.0);
    if keep >= 1.0 {
      None
    } else {
      Some(self.acceleration() * dt * keep / (1.0 - keep))
    }
  }

  pub fn velocity(&self) -> f64 {
    self.v
  }

  pub fn position(&self) -> f64 {
    self.x
  }
}

impl Lab for NewtonLab {
  fn kind(&self) -> LabKind {
    LabKind::NewtonLaws
  }

  fn reset(&mut self) {
    self.t = 0.0;
    self.x = 0.0;
    self.v = 0.0;
  }

  fn initial_sample(&self) -> Sample {
    Sample {
      t: 0.0,
      x: 0.0,
      v: 0.0,
      a: self.acceleration(),
    }
  }

  fn tick(&mut self, dt: f64) -> Sample {
    let a = self.acceleration();
    self.v += a * dt;
    self.v *= (1.0 - self.params.friction * dt * DAMPING_RATE).max(0.0);
    self.x = wrap_corridor(self.x + self.v * dt);
    self.t += dt;
    Sample {
      t: self.t,
      x: self.x,
      v: self.v,
      a,
    }
  }

  fn describe(&self) -> String {
    format!(
      "m = {} kg, F = {} N, a = F/m = {:.3} m/s^2, v = {:.3} m/s",
      self.params.mass,
      self.params.force,
      self.acceleration(),
      self.v
    )
  }
}
