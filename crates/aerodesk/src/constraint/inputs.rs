//! Input schema and defaults for the constraint analysis.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::techpack::AeroDeltas;

/// Aerodrome environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Aerodrome altitude in metres.
    pub alt_aerodrome_m: f64,
    /// Temperature offset from ISA in degrees Celsius.
    pub isa_delta_t_c: f64,
    /// Available takeoff runway length in metres.
    pub runway_takeoff_m: f64,
    /// Available landing runway length in metres.
    pub runway_landing_m: f64,
    /// Runway slope in percent.
    pub slope_percent: f64,
    /// Headwind component in knots.
    pub headwind_kts: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            alt_aerodrome_m: 0.0,
            isa_delta_t_c: 0.0,
            runway_takeoff_m: 1500.0,
            runway_landing_m: 1200.0,
            slope_percent: 0.0,
            headwind_kts: 0.0,
        }
    }
}

/// Mass and aerodynamic baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassAero {
    /// Design takeoff mass in kg, when known.
    pub w0_kg: Option<f64>,
    /// Wing reference area in m², when known.
    pub s_m2: Option<f64>,
    /// Wing aspect ratio.
    pub aspect_ratio: f64,
    /// Oswald span efficiency.
    pub oswald_e: f64,
    /// Zero-lift drag coefficient.
    pub cd0: f64,
    /// Maximum lift coefficient in takeoff configuration.
    pub cl_max_takeoff: f64,
    /// Maximum lift coefficient in landing configuration.
    pub cl_max_landing: f64,
}

impl Default for MassAero {
    fn default() -> Self {
        Self {
            w0_kg: None,
            s_m2: None,
            aspect_ratio: 8.5,
            oswald_e: 0.8,
            cd0: 0.025,
            cl_max_takeoff: 1.8,
            cl_max_landing: 2.2,
        }
    }
}

impl MassAero {
    /// Apply technology deltas to the aerodynamic baseline.
    #[must_use]
    pub fn with_deltas(mut self, deltas: AeroDeltas) -> Self {
        self.cl_max_takeoff += deltas.cl_max_takeoff;
        self.cl_max_landing += deltas.cl_max_landing;
        self.cd0 += deltas.cd0;
        self.oswald_e += deltas.oswald_e;
        self
    }
}

/// Propulsion type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropulsionType {
    /// Turbojet or turbofan.
    Turbojet,
    /// Turboprop.
    #[default]
    Turboprop,
    /// Piston engine.
    Piston,
    /// Electric motor.
    Electric,
}

/// Propulsion installation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Propulsion {
    /// Propulsion type.
    #[serde(rename = "type")]
    pub kind: PropulsionType,
    /// Maximum installed thrust in newtons, when known.
    pub t_max_n: Option<f64>,
    /// Maximum installed shaft power in watts, when known.
    pub p_max_w: Option<f64>,
    /// Propeller efficiency.
    pub eta_prop: f64,
}

impl Default for Propulsion {
    fn default() -> Self {
        Self {
            kind: PropulsionType::default(),
            t_max_n: None,
            p_max_w: Some(900_000.0),
            eta_prop: 0.80,
        }
    }
}

/// Performance requirements driving the constraint curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceReqs {
    /// Balanced field length in metres.
    pub bfl_m: f64,
    /// Landing distance in metres.
    pub ldg_m: f64,
    /// Required initial rate of climb in m/s.
    pub roc_init_mps: f64,
    /// Required climb gradient in percent (0 disables).
    pub climb_gradient_percent: f64,
    /// Cruise altitude in feet.
    pub cruise_alt_ft: f64,
    /// Cruise speed in knots.
    pub cruise_speed_kts: f64,
    /// Sustained-turn load factor.
    pub turn_n: f64,
    /// Service ceiling in feet.
    pub ceiling_ft: f64,
    /// Residual rate of climb at the ceiling in m/s.
    pub roc_at_ceiling_mps: f64,
}

impl Default for PerformanceReqs {
    fn default() -> Self {
        Self {
            bfl_m: 1500.0,
            ldg_m: 1200.0,
            roc_init_mps: 6.0,
            climb_gradient_percent: 0.0,
            cruise_alt_ft: 15_000.0,
            cruise_speed_kts: 240.0,
            turn_n: 2.5,
            ceiling_ft: 25_000.0,
            roc_at_ceiling_mps: 0.5,
        }
    }
}

/// Modelling assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Minimum-power speed in m/s; climb and ceiling evaluate at 1.2x.
    pub v_min_power_mps: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            v_min_power_mps: 20.0,
        }
    }
}

/// The full input set for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisInputs {
    /// Aerodrome environment.
    pub environment: Environment,
    /// Mass and aerodynamic baseline.
    pub mass_aero: MassAero,
    /// Propulsion installation.
    pub propulsion: Propulsion,
    /// Performance requirements.
    pub requirements: PerformanceReqs,
    /// Modelling assumptions.
    pub assumptions: Assumptions,
}

impl AnalysisInputs {
    /// Validate the inputs before computation.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let checks: [(&str, f64); 10] = [
            ("aspect_ratio", self.mass_aero.aspect_ratio),
            ("oswald_e", self.mass_aero.oswald_e),
            ("cd0", self.mass_aero.cd0),
            ("cl_max_takeoff", self.mass_aero.cl_max_takeoff),
            ("cl_max_landing", self.mass_aero.cl_max_landing),
            ("bfl_m", self.requirements.bfl_m),
            ("ldg_m", self.requirements.ldg_m),
            ("cruise_speed_kts", self.requirements.cruise_speed_kts),
            ("turn_n", self.requirements.turn_n),
            ("v_min_power_mps", self.assumptions.v_min_power_mps),
        ];
        for (name, value) in checks {
            if value <= 0.0 {
                return Err(Error::validation(format!("{name} must be positive")));
            }
        }
        if self.requirements.roc_init_mps < 0.0 {
            return Err(Error::validation("roc_init_mps must not be negative"));
        }
        Ok(())
    }
}

/// Wing-loading sweep in N/m².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sweep {
    /// Lowest wing loading.
    pub ws_min: f64,
    /// Highest wing loading.
    pub ws_max: f64,
    /// Step size.
    pub ws_step: f64,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            ws_min: 50.0,
            ws_max: 1200.0,
            ws_step: 5.0,
        }
    }
}

impl Sweep {
    /// Validate the sweep bounds.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the bounds are empty or non-positive.
    pub fn validate(&self) -> Result<()> {
        if self.ws_min <= 0.0 {
            return Err(Error::validation("ws_min must be positive"));
        }
        if self.ws_min >= self.ws_max {
            return Err(Error::validation("ws_min must be less than ws_max"));
        }
        if self.ws_step <= 0.0 {
            return Err(Error::validation("ws_step must be positive"));
        }
        Ok(())
    }

    /// Wing-loading values from min to max, inclusive within a small
    /// epsilon.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        let mut values = Vec::new();
        let mut ws = self.ws_min;
        while ws <= self.ws_max + 1e-4 {
            values.push(ws);
            ws += self.ws_step;
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_schema() {
        let inputs = AnalysisInputs::default();
        assert!((inputs.mass_aero.aspect_ratio - 8.5).abs() < 1e-12);
        assert!((inputs.mass_aero.cl_max_landing - 2.2).abs() < 1e-12);
        assert_eq!(inputs.propulsion.kind, PropulsionType::Turboprop);
        assert_eq!(inputs.propulsion.p_max_w, Some(900_000.0));
        assert!((inputs.requirements.turn_n - 2.5).abs() < 1e-12);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nonpositive() {
        let mut inputs = AnalysisInputs::default();
        inputs.mass_aero.oswald_e = 0.0;
        assert!(inputs.validate().is_err());

        let mut inputs = AnalysisInputs::default();
        inputs.requirements.bfl_m = -1.0;
        assert!(inputs.validate().is_err());
    }

    #[test]
    fn test_with_deltas() {
        let aero = MassAero::default().with_deltas(AeroDeltas {
            cl_max_takeoff: 0.3,
            cl_max_landing: 0.4,
            cd0: -0.002,
            oswald_e: 0.05,
        });
        assert!((aero.cl_max_takeoff - 2.1).abs() < 1e-12);
        assert!((aero.cl_max_landing - 2.6).abs() < 1e-12);
        assert!((aero.cd0 - 0.023).abs() < 1e-12);
        assert!((aero.oswald_e - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_values_inclusive() {
        let sweep = Sweep {
            ws_min: 100.0,
            ws_max: 120.0,
            ws_step: 5.0,
        };
        let values = sweep.values();
        assert_eq!(values.len(), 5);
        assert!((values[0] - 100.0).abs() < 1e-9);
        assert!((values[4] - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_validation() {
        assert!(Sweep::default().validate().is_ok());
        assert!(Sweep { ws_min: 0.0, ..Sweep::default() }.validate().is_err());
        assert!(Sweep { ws_min: 500.0, ws_max: 100.0, ..Sweep::default() }
            .validate()
            .is_err());
        assert!(Sweep { ws_step: 0.0, ..Sweep::default() }.validate().is_err());
    }

    #[test]
    fn test_propulsion_type_serde_names() {
        let json = serde_json::to_string(&PropulsionType::Turboprop).unwrap();
        assert_eq!(json, "\"turboprop\"");
        let back: PropulsionType = serde_json::from_str("\"turbojet\"").unwrap();
        assert_eq!(back, PropulsionType::Turbojet);
    }
}
