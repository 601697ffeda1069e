use super::{Lab, LabKind};
use crate::integrator::{velocity_verlet, BodyState, Vec3};
use crate::orbit::{self, LaunchBasis, OrbitalElements, EARTH_RADIUS_KM, MU_EARTH};
use crate::telemetry::Sample;
use crate::RocketParams;
use cgmath::{InnerSpace, Zero};
use log::{info, warn};
use std::collections::VecDeque;

/// Highest launch altitude accepted, km
pub const MAX_LAUNCH_HEIGHT: f64 = 60_000.0;
pub const MIN_TIME_SCALE: f64 = 0.05;
pub const MAX_TIME_SCALE: f64 = 50.0;
pub const DEFAULT_TIME_SCALE: f64 = 20.0;
pub const MAX_SUBSTEPS: u32 = 60;
/// Trail points kept for drawing the path.
pub const TRAIL_LENGTH: usize = 9000;

/// Drag coefficient folded together with area and mass, 1/km
const DRAG_K: f64 = 0.0035;

/// Thrust, drag and gravity acting on the rocket.
fn acceleration(params: &RocketParams, pos: Vec3, vel: Vec3) -> Vec3 {
  let mut total = orbit::gravity(pos, MU_EARTH);

  if params.thrust_on && params.thrust > 0.0 {
    let dir = if vel.magnitude2() > 1e-10 {
      vel.normalize()
    } else {
      pos.normalize()
    };
    total += dir * params.thrust;
  }

  if params.drag_on {
    let rho = orbit::air_density(pos.magnitude() - EARTH_RADIUS_KM);
    let speed = vel.magnitude();
    if speed > 1e-6 && rho > 1e-6 {
      total += vel * (-DRAG_K * rho * speed);
    }
  }
  total
}

/// Launch from the equator into orbit, or not. Positions in km, velocities in
/// km/s, time in seconds.
pub struct RocketLab {
  params: RocketParams,
  state: BodyState,
  t: f64,
  impacted: bool,
  elements: OrbitalElements,
  trail: VecDeque<Vec3>,
}

impl RocketLab {
  pub fn new(params: RocketParams) -> Self {
    let (state, elements) = Self::launch_state(&params);
    let mut trail = VecDeque::with_capacity(TRAIL_LENGTH);
    trail.push_back(state.pos);
    Self {
      params,
      state,
      t: 0.0,
      impacted: false,
      elements,
      trail,
    }
  }

  fn launch_state(params: &RocketParams) -> (BodyState, OrbitalElements) {
    let start = EARTH_RADIUS_KM + params.height.clamp(0.0, MAX_LAUNCH_HEIGHT);
    let pos = Vec3::new(start, 0.0, 0.0);
    let heading = LaunchBasis::at(pos).heading(params.azimuth_deg);
    let vel = heading * params.v0.max(0.0);
    // the first step starts from gravity alone
    let state = BodyState {
      pos,
      vel,
      acc: orbit::gravity(pos, MU_EARTH),
    };
    (state, OrbitalElements::from_state(pos, vel, MU_EARTH))
  }

  pub fn params(&self) -> &RocketParams {
    &self.params
  }

  pub fn set_params(&mut self, params: RocketParams) {
    self.params = params;
    self.reset();
  }

  /// Engine toggles apply mid-flight without restarting.
  pub fn set_thrust(&mut self, on: bool, thrust: f64) {
    self.params.thrust_on = on;
    self.params.thrust = thrust;
  }

  pub fn set_drag(&mut self, on: bool) {
    self.params.drag_on = on;
  }

  pub fn state(&self) -> &BodyState {
    &self.state
  }

  pub fn altitude(&self) -> f64 {
    self.state.pos.magnitude() - EARTH_RADIUS_KM
  }

  pub fn speed(&self) -> f64 {
    self.state.vel.magnitude()
  }

  pub fn elements(&self) -> &OrbitalElements {
    &self.elements
  }

  pub fn impacted(&self) -> bool {
    self.impacted
  }

  pub fn trail(&self) -> impl Iterator<Item = &Vec3> {
    self.trail.iter()
  }

  pub fn trail_len(&self) -> usize {
    self.trail.len()
  }

  fn substeps(&self) -> u32 {
    self.params.substeps.clamp(1, MAX_SUBSTEPS)
  }

  fn sample(&self) -> Sample {
    Sample {
      t: self.t,
      x: self.altitude(),
      v: self.speed(),
      a: self.state.acc.magnitude(),
    }
  }

  fn land(&mut self) {
    self.state.pos = self.state.pos.normalize() * EARTH_RADIUS_KM;
    self.state.vel = Vec3::zero();
    self.state.acc = Vec3::zero();
    self.impacted = true;
    warn!("rocket hit the surface at t = {:.1} s", self.t);
  }
}

impl Lab for RocketLab {
  fn kind(&self) -> LabKind {
    LabKind::RocketOrbit
  }

  fn reset(&mut self) {
    let (state, elements) = Self::launch_state(&self.params);
    self.state = state;
    self.elements = elements;
    self.t = 0.0;
    self.impacted = false;
    self.trail.clear();
    self.trail.push_back(state.pos);
    info!(
      "launch: v0 = {} km/s, h = {} km, azimuth = {} deg, {}",
      self.params.v0,
      self.params.height,
      self.params.azimuth_deg,
      elements.verdict()
    );
  }

  fn initial_sample(&self) -> Sample {
    Sample {
      t: 0.0,
      ..self.sample()
    }
  }

  fn tick(&mut self, dt: f64) -> Sample {
    if self.impacted {
      return self.sample();
    }
    let steps = self.substeps();
    let h = dt / f64::from(steps);
    let params = self.params;
    let field = move |pos: Vec3, vel: Vec3| acceleration(&params, pos, vel);

    for _ in 0..steps {
      velocity_verlet(&mut self.state, &field, h);
      if self.state.pos.magnitude() <= EARTH_RADIUS_KM {
        self.land();
        break;
      }
      self.trail.push_back(self.state.pos);
      while self.trail.len() > TRAIL_LENGTH {
        self.trail.pop_front();
      }
      self.t += h;
    }

    self.elements = OrbitalElements::from_state(self.state.pos, self.state.vel, MU_EARTH);
    self.sample()
  }

  fn halted(&self) -> bool {
    self.impacted
  }

  fn clamp_time_scale(&self, time_scale: f64) -> f64 {
    time_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
  }

  /// The orbit is only interesting sped up.
  fn default_time_scale(&self) -> f64 {
    DEFAULT_TIME_SCALE
  }

  fn describe(&self) -> String {
    if self.impacted {
      return format!("impact at t = {:.1} s", self.t);
    }
    let el = &self.elements;
    let fmt_km = |value: Option<f64>| match value {
      Some(km) if km.is_finite() => format!("{km:.0} km"),
      _ => "-".to_string(),
    };
    format!(
      "alt {:.0} km, v {:.2} km/s, eps {:.3} km^2/s^2, a {}, e {:.4}, peri alt {}, apo alt {}: {}",
      self.altitude(),
      self.speed(),
      el.energy,
      fmt_km(el.semi_major_axis),
      el.eccentricity,
      fmt_km(el.periapsis_altitude()),
      fmt_km(el.apoapsis_altitude()),
      el.verdict()
    )
  }
}
