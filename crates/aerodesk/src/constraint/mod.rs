//! Constraint analysis core.
//!
//! Sweeps wing loading and computes five thrust-to-weight constraint
//! curves (takeoff, climb, cruise, sustained turn, ceiling) plus a landing
//! wing-loading cap. The feasible region lies above every curve, so the
//! envelope is the pointwise maximum over the curves; the recommended
//! design point is the envelope point with the lowest thrust-to-weight.

pub mod export;
pub mod inputs;
pub mod state;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::atmosphere::{ft_to_m, isa_properties, kts_to_mps, G0};
use crate::error::Result;
use crate::techpack::AeroDeltas;

pub use inputs::{
    AnalysisInputs, Assumptions, Environment, MassAero, PerformanceReqs, Propulsion,
    PropulsionType, Sweep,
};

/// One point on a constraint curve: wing loading vs thrust-to-weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Wing loading in N/m².
    pub ws: f64,
    /// Required thrust-to-weight ratio.
    pub tw: f64,
}

/// The five constraint curves over the sweep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintCurves {
    /// Takeoff field-length constraint.
    pub takeoff: Vec<CurvePoint>,
    /// Initial climb constraint.
    pub climb: Vec<CurvePoint>,
    /// Cruise constraint.
    pub cruise: Vec<CurvePoint>,
    /// Sustained-turn constraint.
    pub turn: Vec<CurvePoint>,
    /// Service-ceiling constraint.
    pub ceiling: Vec<CurvePoint>,
}

impl ConstraintCurves {
    /// Curve names in display order, paired with their points.
    #[must_use]
    pub fn named(&self) -> [(&'static str, &[CurvePoint]); 5] {
        [
            ("takeoff", self.takeoff.as_slice()),
            ("climb", self.climb.as_slice()),
            ("cruise", self.cruise.as_slice()),
            ("turn", self.turn.as_slice()),
            ("ceiling", self.ceiling.as_slice()),
        ]
    }
}

/// Recommended design point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    /// Wing loading in N/m².
    pub ws: f64,
    /// Thrust-to-weight ratio.
    pub tw: f64,
    /// Whether the envelope was non-empty. A `false` here means the
    /// landing cap fell below the sweep and the zeros are placeholders.
    pub feasible: bool,
}

/// Full result set of one analysis run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResults {
    /// The constraint curves.
    pub curves: ConstraintCurves,
    /// Maximum wing loading admitted by the landing requirement.
    pub ws_max_landing: f64,
    /// Pointwise maximum of the curves over admissible wing loadings.
    pub envelope: Vec<CurvePoint>,
    /// Lowest-thrust point on the envelope.
    pub recommendation: Recommendation,
}

/// Maximum wing loading from the landing distance requirement.
///
/// Simplified Raymer relationship: `S_landing ≈ 0.3 · V_ref² / g`, solved
/// for the reference speed and converted to a wing loading at aerodrome
/// density.
fn landing_ws_max(inputs: &AnalysisInputs) -> f64 {
    let props = isa_properties(
        inputs.environment.alt_aerodrome_m,
        inputs.environment.isa_delta_t_c,
    );
    let v_ref = (inputs.requirements.ldg_m * G0 / 0.3).sqrt();
    0.5 * props.density * v_ref * v_ref * inputs.mass_aero.cl_max_landing
}

/// Compute the constraint curves, landing cap, envelope and
/// recommendation for the given inputs and sweep, with technology deltas
/// applied to the aerodynamic baseline.
///
/// # Errors
///
/// Returns a validation error if the inputs or sweep are out of range
/// (including after deltas are applied).
pub fn compute(
    inputs: &AnalysisInputs,
    sweep: &Sweep,
    deltas: AeroDeltas,
) -> Result<AnalysisResults> {
    sweep.validate()?;

    let mut inputs = *inputs;
    inputs.mass_aero = inputs.mass_aero.with_deltas(deltas);
    inputs.validate()?;

    let env = &inputs.environment;
    let aero = &inputs.mass_aero;
    let req = &inputs.requirements;

    let props_site = isa_properties(env.alt_aerodrome_m, env.isa_delta_t_c);
    let sigma = props_site.sigma;
    let rho_site = props_site.density;

    let ws_max_landing = landing_ws_max(&inputs);
    let k = 1.0 / (std::f64::consts::PI * aero.oswald_e * aero.aspect_ratio);

    let v_climb = inputs.assumptions.v_min_power_mps * 1.2;
    let q_climb = 0.5 * rho_site * v_climb * v_climb;

    let v_cruise = kts_to_mps(req.cruise_speed_kts);
    let rho_cruise = isa_properties(ft_to_m(req.cruise_alt_ft), 0.0).density;
    let q_cruise = 0.5 * rho_cruise * v_cruise * v_cruise;
    let q_turn = 0.5 * rho_site * v_cruise * v_cruise;

    let rho_ceiling = isa_properties(ft_to_m(req.ceiling_ft), 0.0).density;
    let q_ceiling = 0.5 * rho_ceiling * v_climb * v_climb;

    let ws_values = sweep.values();
    debug!("Sweeping {} wing-loading points", ws_values.len());

    let mut curves = ConstraintCurves::default();
    for &ws in &ws_values {
        // Takeoff, Raymer-like field-length approximation.
        let k_bfl = req.bfl_m / 37.5;
        curves.takeoff.push(CurvePoint {
            ws,
            tw: ws / (sigma * aero.cl_max_takeoff * k_bfl),
        });

        // Climb at 1.2x minimum-power speed; ROC requirement is the max of
        // the initial-ROC and gradient requirements.
        let cd = aero.cd0 + k * (ws / q_climb).powi(2);
        let d_w = cd / (ws / q_climb);
        let mut roc = req.roc_init_mps;
        if req.climb_gradient_percent > 0.0 {
            roc = roc.max(v_climb * req.climb_gradient_percent / 100.0);
        }
        curves.climb.push(CurvePoint {
            ws,
            tw: d_w + roc / v_climb,
        });

        // Cruise.
        curves.cruise.push(CurvePoint {
            ws,
            tw: aero.cd0 * q_cruise / ws + k * ws / q_cruise,
        });

        // Sustained turn at cruise speed, site density.
        let cl = req.turn_n * ws / q_turn;
        let cd = aero.cd0 + k * cl * cl;
        curves.turn.push(CurvePoint { ws, tw: cd / cl });

        // Ceiling: climb form at ceiling density with residual ROC.
        let cl = ws / q_ceiling;
        let cd = aero.cd0 + k * cl * cl;
        curves.ceiling.push(CurvePoint {
            ws,
            tw: cd / cl + req.roc_at_ceiling_mps / v_climb,
        });
    }

    let mut envelope = Vec::new();
    for (i, &ws) in ws_values.iter().enumerate() {
        if ws > ws_max_landing {
            continue;
        }
        let tw = curves
            .named()
            .iter()
            .map(|(_, points)| points[i].tw)
            .fold(f64::NEG_INFINITY, f64::max);
        envelope.push(CurvePoint { ws, tw });
    }

    let recommendation = envelope
        .iter()
        .min_by(|a, b| a.tw.total_cmp(&b.tw))
        .map_or(Recommendation::default(), |best| Recommendation {
            ws: best.ws,
            tw: best.tw,
            feasible: true,
        });

    info!(
        "Constraint analysis done: {} envelope points, recommendation W/S={:.1} T/W={:.3}",
        envelope.len(),
        recommendation.ws,
        recommendation.tw
    );

    Ok(AnalysisResults {
        curves,
        ws_max_landing,
        envelope,
        recommendation,
    })
}
