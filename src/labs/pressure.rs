use crate::PressureParams;

const MIN_AREA: f64 = 1e-6;
/// Deepest imprint the plate can leave.
const MAX_DEPTH: f64 = 2.2;
/// Pressure per unit of imprint depth.
const DEPTH_SCALE: f64 = 10.0;

/// P = F/S. There is no motion here, only the result and a depth for the
/// imprint the plate leaves.
#[derive(Copy, Clone, Debug)]
pub struct PressureLab {
  pub params: PressureParams,
}

impl PressureLab {
  pub fn new(params: PressureParams) -> Self {
    Self { params }
  }

  pub fn pressure(&self) -> f64 {
    self.params.force / self.params.area.max(MIN_AREA)
  }

  pub fn imprint_depth(&self) -> f64 {
    (self.pressure() / DEPTH_SCALE).min(MAX_DEPTH)
  }

  /// Plate edge length for a square plate of the configured area.
  pub fn plate_side(&self) -> f64 {
    (self.params.area / 10.0).max(0.4)
  }

  pub fn describe(&self) -> String {
    format!(
      "F = {} N over S = {} m^2 gives P = {:.2} Pa, imprint depth ~ {:.2}",
      self.params.force,
      self.params.area,
      self.pressure(),
      self.imprint_depth()
    )
  }
}
