//! International Standard Atmosphere model and unit conversions.
//!
//! Provides ISA properties (temperature, pressure, density, speed of sound)
//! at a given geometric altitude, with an optional ISA temperature offset,
//! plus the small set of unit conversions the sizing calculations need.

/// Standard gravitational acceleration, m/s^2.
pub const G0: f64 = 9.806_65;
/// Specific gas constant for dry air, J/(kg*K).
pub const R_AIR: f64 = 287.052_87;
/// Sea-level standard temperature, K.
pub const T0: f64 = 288.15;
/// Sea-level standard pressure, Pa.
pub const P0: f64 = 101_325.0;
/// Sea-level standard density, kg/m^3.
pub const RHO0: f64 = 1.225;
/// Temperature lapse rate in the troposphere, K/m.
pub const LAPSE_RATE: f64 = -0.0065;
/// Tropopause altitude, m.
const TROPOPAUSE_M: f64 = 11_000.0;

/// Atmospheric properties at a given altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsaProperties {
    /// Static temperature, K.
    pub temperature: f64,
    /// Static pressure, Pa.
    pub pressure: f64,
    /// Air density, kg/m^3.
    pub density: f64,
    /// Speed of sound, m/s.
    pub speed_of_sound: f64,
    /// Density ratio relative to sea level.
    pub sigma: f64,
}

/// Compute ISA properties at `alt_m` metres with an ISA temperature offset.
///
/// Below the tropopause the standard lapse-rate relations apply; above it
/// the pressure decays exponentially at the tropopause temperature.
#[must_use]
pub fn isa_properties(alt_m: f64, isa_delta_t_c: f64) -> IsaProperties {
    let exponent = -G0 / (LAPSE_RATE * R_AIR);
    let (temperature, pressure) = if alt_m < TROPOPAUSE_M {
        let t = T0 + LAPSE_RATE * alt_m + isa_delta_t_c;
        (t, P0 * (t / T0).powf(exponent))
    } else {
        // Isothermal above the tropopause.
        let t = T0 + LAPSE_RATE * TROPOPAUSE_M + isa_delta_t_c;
        let p_trop = P0 * (t / T0).powf(exponent);
        (t, p_trop * (-G0 * (alt_m - TROPOPAUSE_M) / (R_AIR * t)).exp())
    };
    let density = pressure / (R_AIR * temperature);
    let speed_of_sound = (1.4 * R_AIR * temperature).sqrt();
    let sigma = density / RHO0;
    IsaProperties {
        temperature,
        pressure,
        density,
        speed_of_sound,
        sigma,
    }
}

/// Convert knots to metres per second.
#[must_use]
pub fn kts_to_mps(kts: f64) -> f64 {
    kts * 0.514_444
}

/// Convert metres per second to knots.
#[must_use]
pub fn mps_to_kts(mps: f64) -> f64 {
    mps / 0.514_444
}

/// Convert feet to metres.
#[must_use]
pub fn ft_to_m(ft: f64) -> f64 {
    ft * 0.3048
}

/// Convert metres to feet.
#[must_use]
pub fn m_to_ft(m: f64) -> f64 {
    m / 0.3048
}

/// Convert a mass in kilograms to its weight in newtons.
#[must_use]
pub fn kg_to_newton(kg: f64) -> f64 {
    kg * G0
}

/// Convert a weight in newtons to the equivalent mass in kilograms.
#[must_use]
pub fn newton_to_kg(n: f64) -> f64 {
    n / G0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_sea_level_standard_day() {
        let props = isa_properties(0.0, 0.0);
        assert!(close(props.temperature, 288.15, 1e-9));
        assert!(close(props.pressure, 101_325.0, 1e-6));
        assert!(close(props.density, 1.225, 1e-3));
        assert!(close(props.sigma, 1.0, 1e-3));
        // a = sqrt(1.4 * R * T) ~ 340.3 m/s
        assert!(close(props.speed_of_sound, 340.3, 0.1));
    }

    #[test]
    fn test_altitude_decreases_density() {
        let sl = isa_properties(0.0, 0.0);
        let cruise = isa_properties(ft_to_m(15_000.0), 0.0);
        assert!(cruise.density < sl.density);
        assert!(cruise.pressure < sl.pressure);
        assert!(cruise.temperature < sl.temperature);
        assert!(cruise.sigma < 1.0);
    }

    #[test]
    fn test_known_point_5000m() {
        // ISA tables: T = 255.65 K, p ~ 54019 Pa, rho ~ 0.7361 kg/m^3
        let props = isa_properties(5_000.0, 0.0);
        assert!(close(props.temperature, 255.65, 1e-9));
        assert!(close(props.pressure, 54_019.0, 50.0));
        assert!(close(props.density, 0.7361, 1e-3));
    }

    #[test]
    fn test_hot_day_lowers_density() {
        let std_day = isa_properties(0.0, 0.0);
        let hot_day = isa_properties(0.0, 15.0);
        assert!(hot_day.density < std_day.density);
        assert!(hot_day.temperature > std_day.temperature);
    }

    #[test]
    fn test_above_tropopause_continuous() {
        // Pressure keeps decreasing through the tropopause.
        let below = isa_properties(10_999.0, 0.0);
        let above = isa_properties(11_001.0, 0.0);
        assert!(above.pressure < below.pressure);
    }

    #[test]
    fn test_speed_conversions_roundtrip() {
        assert!(close(mps_to_kts(kts_to_mps(240.0)), 240.0, 1e-9));
        assert!(close(kts_to_mps(1.0), 0.514_444, 1e-9));
    }

    #[test]
    fn test_length_conversions_roundtrip() {
        assert!(close(m_to_ft(ft_to_m(15_000.0)), 15_000.0, 1e-9));
        assert!(close(ft_to_m(1.0), 0.3048, 1e-12));
    }

    #[test]
    fn test_weight_conversions() {
        assert!(close(kg_to_newton(1.0), 9.806_65, 1e-9));
        assert!(close(newton_to_kg(kg_to_newton(5_700.0)), 5_700.0, 1e-9));
    }
}
