//! Physical-heuristic ventilation rules
//!
//! Constants are fixed; changing any of them changes every verdict.

use classvent_types::{Observation, RuleVerdict, WindowState};

/// CO2 exhaled per student per second (liters)
pub const CO2_LITERS_PER_STUDENT_SECOND: f64 = 0.005;
/// Ventilation is needed above this much accumulated CO2 (liters)
pub const CO2_THRESHOLD_LITERS: f64 = 9000.0;
/// Indoor set-point the heat-loss index is measured against (Celsius)
pub const COMFORT_TEMPERATURE_CELSIUS: f64 = 22.0;
pub const OPEN_WINDOW_LOSS_FACTOR: f64 = 1.0;
pub const CLOSED_WINDOW_LOSS_FACTOR: f64 = 0.3;
/// Liters of CO2 to kilograms, via cubic meters
pub const CO2_KG_PER_LITER: f64 = 0.000001 * 1.96;
/// Heat-loss index above which the diagnostic flag is raised
pub const HEAT_LOSS_THRESHOLD: f64 = 5.0;

/// Compute CO2 accumulation, heat loss and carbon emission for one lesson
pub fn evaluate_rules(obs: &Observation) -> RuleVerdict {
    let co2_total_liters = CO2_LITERS_PER_STUDENT_SECOND
        * f64::from(obs.student_count)
        * f64::from(obs.lesson_duration_minutes)
        * 60.0;

    let heat_loss_raw = if obs.climate_mode.is_active() {
        (f64::from(obs.outside_temperature_celsius) - COMFORT_TEMPERATURE_CELSIUS).abs()
    } else {
        0.0
    };
    let loss_factor = match obs.window_state {
        WindowState::Open => OPEN_WINDOW_LOSS_FACTOR,
        WindowState::Closed => CLOSED_WINDOW_LOSS_FACTOR,
    };
    let heat_loss_index = heat_loss_raw * loss_factor;

    RuleVerdict {
        co2_total_liters,
        heat_loss_index,
        carbon_emission_kg: co2_total_liters * CO2_KG_PER_LITER,
        needs_ventilation: co2_total_liters > CO2_THRESHOLD_LITERS,
        needs_ventilation_by_heat_loss: obs.climate_mode.is_active()
            && heat_loss_index > HEAT_LOSS_THRESHOLD,
    }
}
