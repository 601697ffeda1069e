pub mod clock;
pub mod error;
pub mod game;
pub mod integrator;
pub mod labs;
pub mod methods;
pub mod orbit;
pub mod quiz;
pub mod store;
pub mod telemetry;

pub use error::LabError;

/// Standard gravity used by the ground-level labs, m/s^2.
pub const GRAVITY: f64 = 9.81;

/// Labs drive a single body along x and wrap it back to the start of the corridor.
pub const CORRIDOR_END: f64 = 8.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MotionMode {
  /// Constant velocity, acceleration ignored.
  Uniform,
  Accelerated,
}

#[derive(Copy, Clone, Debug)]
pub struct UniformParams {
  pub mode: MotionMode,
  pub v0: f64,
  pub a: f64,
}

impl Default for UniformParams {
  fn default() -> Self {
    Self {
      mode: MotionMode::Uniform,
      v0: 2.0,
      a: 1.0,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct NewtonParams {
  pub mass: f64,
  pub force: f64,
  /// Velocity damping coefficient, 0..1
  pub friction: f64,
}

impl Default for NewtonParams {
  fn default() -> Self {
    Self {
      mass: 2.0,
      force: 4.0,
      friction: 0.15,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct FrictionParams {
  pub mass: f64,
  /// Coefficient of friction between block and floor
  pub mu: f64,
  pub push: f64,
}

impl Default for FrictionParams {
  fn default() -> Self {
    Self {
      mass: 2.0,
      mu: 0.3,
      push: 10.0,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct PressureParams {
  pub force: f64,
  pub area: f64,
}

impl Default for PressureParams {
  fn default() -> Self {
    Self {
      force: 40.0,
      area: 10.0,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct BuoyancyParams {
  /// kg/m^3
  pub object_density: f64,
  /// kg/m^3
  pub fluid_density: f64,
  /// m^3
  pub volume: f64,
}

impl Default for BuoyancyParams {
  fn default() -> Self {
    Self {
      object_density: 600.0,
      fluid_density: 1000.0,
      volume: 0.003,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct RocketParams {
  /// Launch speed, km/s
  pub v0: f64,
  /// Launch altitude above the surface, km
  pub height: f64,
  /// Heading in the local horizontal plane, degrees from east towards north
  pub azimuth_deg: f64,
  pub substeps: u32,
  pub thrust_on: bool,
  /// Thrust acceleration along the velocity, km/s^2
  pub thrust: f64,
  pub drag_on: bool,
}

impl Default for RocketParams {
  fn default() -> Self {
    Self {
      v0: 7.8,
      height: 0.0,
      azimuth_deg: 90.0,
      substeps: 12,
      thrust_on: false,
      thrust: 0.0,
      drag_on: true,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct RunParams {
  pub time_scale: f64,
  /// Real seconds fed through the fixed-step clock
  pub duration: f64,
  /// Frame interval fed to the fixed-step clock in headless runs
  pub frame_dt: f64,
}

impl Default for RunParams {
  fn default() -> Self {
    Self {
      time_scale: 1.0,
      duration: 10.0,
      frame_dt: 1.0 / 60.0,
    }
  }
}
