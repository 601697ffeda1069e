use super::{Lab, LabKind};
use crate::integrator::semi_implicit_euler;
use crate::telemetry::Sample;
use crate::{BuoyancyParams, GRAVITY};

/// Height of the water surface.
pub const WATER_LEVEL: f64 = 0.2;
/// Height of the tank floor.
pub const FLOOR_LEVEL: f64 = -0.7;
/// Height the cube is released from.
pub const RELEASE_HEIGHT: f64 = 2.2;

const MIN_VOLUME: f64 = 0.0005;
const MIN_MASS: f64 = 0.0001;
const LINEAR_DAMPING: f64 = 0.25;
const RESTITUTION: f64 = 0.05;

/// A cube dropped into a water tank. Archimedes' force scales with the
/// submerged fraction of the cube.
pub struct BuoyancyLab {
  params: BuoyancyParams,
  t: f64,
  y: f64,
  vy: f64,
}

impl BuoyancyLab {
  pub fn new(params: BuoyancyParams) -> Self {
    Self {
      params,
      t: 0.0,
      y: RELEASE_HEIGHT,
      vy: 0.0,
    }
  }

  pub fn set_params(&mut self, params: BuoyancyParams) {
    self.params = params;
    self.reset();
  }

  pub fn side(&self) -> f64 {
    self.params.volume.max(MIN_VOLUME).cbrt()
  }

  pub fn mass(&self) -> f64 {
    self.params.object_density * self.params.volume
  }

  pub fn height(&self) -> f64 {
    self.y
  }

  /// Share of the cube below the water surface, 0..1.
  pub fn submerged_fraction(&self) -> f64 {
    let side = self.side();
    let bottom = self.y - side / 2.0;
    ((WATER_LEVEL - bottom) / side).clamp(0.0, 1.0)
  }

  pub fn buoyant_force(&self) -> f64 {
    self.params.fluid_density * GRAVITY * self.params.volume * self.submerged_fraction()
  }

  /// Submerged fraction at which a floating cube comes to rest, or `None`
  /// when the cube is too dense to float.
  pub fn equilibrium_fraction(&self) -> Option<f64> {
    let ratio = self.params.object_density / self.params.fluid_density;
    if ratio.is_finite() && ratio < 1.0 {
      Some(ratio)
    } else {
      None
    }
  }

  /// Buoyancy minus weight per unit mass, without damping.
  fn net_acceleration(&self) -> f64 {
    self.buoyant_force() / self.mass().max(MIN_MASS) - GRAVITY
  }

  fn sample(&self, a: f64) -> Sample {
    Sample {
      t: self.t,
      x: self.y,
      v: self.vy.abs(),
      a,
    }
  }
}

impl Lab for BuoyancyLab {
  fn kind(&self) -> LabKind {
    LabKind::Buoyancy
  }

  fn reset(&mut self) {
    self.t = 0.0;
    self.y = RELEASE_HEIGHT;
    self.vy = 0.0;
  }

  fn initial_sample(&self) -> Sample {
    self.sample(self.net_acceleration())
  }

  fn tick(&mut self, dt: f64) -> Sample {
    let a = self.net_acceleration();
    let damped = a - LINEAR_DAMPING * self.vy;
    semi_implicit_euler(&mut self.y, &mut self.vy, damped, dt);

    let rest = FLOOR_LEVEL + self.side() / 2.0;
    if self.y < rest {
      self.y = rest;
      if self.vy < 0.0 {
        self.vy = -self.vy * RESTITUTION;
      }
    }
    self.t += dt;
    self.sample(a)
  }

  fn describe(&self) -> String {
    format!(
      "y = {:.3} m, submerged {:.0}%, Fb = {:.2} N, weight = {:.2} N",
      self.y,
      self.submerged_fraction() * 100.0,
      self.buoyant_force(),
      self.mass() * GRAVITY
    )
  }
}
