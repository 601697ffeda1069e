//! Two-body orbit helpers for the rocket lab. Units are km, km/s and km/s^2.

use crate::integrator::Vec3;
use cgmath::InnerSpace;
use serde::Serialize;

/// Earth's gravitational parameter, km^3/s^2
pub const MU_EARTH: f64 = 398_600.4418;
/// Mean Earth radius, km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Energies closer to zero than this count as parabolic.
const PARABOLIC_EPS: f64 = 1e-9;
/// Atmosphere scale height, km
const SCALE_HEIGHT_KM: f64 = 7.5;
/// Density is only modelled below this altitude, km
const ATMOSPHERE_TOP_KM: f64 = 120.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Trajectory {
  Bound,
  Parabolic,
  Escape,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct OrbitalElements {
  /// Specific orbital energy, km^2/s^2
  pub energy: f64,
  /// Semi-major axis, km. `None` for parabolic trajectories.
  pub semi_major_axis: Option<f64>,
  pub eccentricity: f64,
  /// Periapsis radius, km
  pub periapsis: Option<f64>,
  /// Apoapsis radius, km. `None` unless the orbit is bound.
  pub apoapsis: Option<f64>,
  pub trajectory: Trajectory,
}

impl OrbitalElements {
  pub fn from_state(r: Vec3, v: Vec3, mu: f64) -> Self {
    let r_mag = r.magnitude();
    let v_mag = v.magnitude();
    let energy = v_mag * v_mag / 2.0 - mu / r_mag;

    let h = r.cross(v);
    let h_mag = h.magnitude();
    let e_vec = v.cross(h) / mu - r / r_mag;
    let eccentricity = e_vec.magnitude();

    let trajectory = if energy.abs() < PARABOLIC_EPS {
      Trajectory::Parabolic
    } else if energy > 0.0 {
      Trajectory::Escape
    } else {
      Trajectory::Bound
    };

    let semi_major_axis = if energy.abs() >= PARABOLIC_EPS {
      Some(-mu / (2.0 * energy))
    } else {
      None
    };

    let (periapsis, apoapsis) = match (trajectory, semi_major_axis) {
      (Trajectory::Bound, Some(a)) => (Some(a * (1.0 - eccentricity)), Some(a * (1.0 + eccentricity))),
      _ => (Some(h_mag * h_mag / (mu * (1.0 + eccentricity))), None),
    };

    Self {
      energy,
      semi_major_axis,
      eccentricity,
      periapsis,
      apoapsis,
      trajectory,
    }
  }

  /// Altitude of the periapsis above the Earth's surface, km.
  pub fn periapsis_altitude(&self) -> Option<f64> {
    self
      .periapsis
      .filter(|rp| rp.is_finite())
      .map(|rp| rp - EARTH_RADIUS_KM)
  }

  pub fn apoapsis_altitude(&self) -> Option<f64> {
    self
      .apoapsis
      .filter(|ra| ra.is_finite())
      .map(|ra| ra - EARTH_RADIUS_KM)
  }

  pub fn verdict(&self) -> Verdict {
    if !self.energy.is_finite() || !self.eccentricity.is_finite() {
      return Verdict::Undefined;
    }
    match self.trajectory {
      Trajectory::Escape => Verdict::Escape,
      Trajectory::Parabolic => Verdict::Marginal,
      Trajectory::Bound => match self.periapsis_altitude() {
        Some(alt) if alt < 0.0 => Verdict::Suborbital,
        _ => Verdict::Orbit,
      },
    }
  }
}

/// What the current state means for a launch from the surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
  Escape,
  Marginal,
  /// Bound, but the periapsis is inside the planet.
  Suborbital,
  Orbit,
  /// Energy or eccentricity is not finite, e.g. a body at the centre.
  Undefined,
}

impl std::fmt::Display for Verdict {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str(match self {
      Verdict::Escape => "escape: energy > 0",
      Verdict::Marginal => "marginal: energy ~ 0",
      Verdict::Suborbital => "periapsis below the surface, impact expected",
      Verdict::Orbit => "bound orbit: energy < 0",
      Verdict::Undefined => "no orbit defined for this state",
    })
  }
}

/// Inverse-square gravity towards the origin.
pub fn gravity(r: Vec3, mu: f64) -> Vec3 {
  let r_mag = r.magnitude();
  let r3 = (r_mag * r_mag * r_mag).max(1e-9);
  r * (-mu / r3)
}

/// Relative air density, 1.0 at the surface.
pub fn air_density(alt_km: f64) -> f64 {
  let h = alt_km.clamp(0.0, ATMOSPHERE_TOP_KM);
  (-h / SCALE_HEIGHT_KM).exp()
}

/// Local horizon frame at a point on or above the surface.
#[derive(Copy, Clone, Debug)]
pub struct LaunchBasis {
  pub up: Vec3,
  pub east: Vec3,
  pub north: Vec3,
}

impl LaunchBasis {
  pub fn at(position: Vec3) -> Self {
    let up = position.normalize();
    let world_north = Vec3::unit_y();

    let mut east = world_north.cross(up);
    if east.magnitude2() < 1e-10 {
      east = Vec3::unit_z().cross(up);
    }
    let east = east.normalize();
    let north = up.cross(east).normalize();
    Self { up, east, north }
  }

  /// Horizontal unit vector `azimuth_deg` degrees from east towards north.
  pub fn heading(&self, azimuth_deg: f64) -> Vec3 {
    let az = azimuth_deg.to_radians();
    (self.east * az.cos() + self.north * az.sin()).normalize()
  }
}
