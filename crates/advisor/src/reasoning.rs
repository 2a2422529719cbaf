//! Human-readable contributing factors for a decision

use classvent_types::{ClimateMode, Observation, WindowState};

pub const REASON_CLOSED_WINDOW: &str = "closed window, possible air stagnation";
pub const REASON_LONG_LESSON: &str = "long lesson, possible CO2 accumulation";
pub const REASON_COOLING_IN_HEAT: &str =
    "cooling during high external heat, possible heat-loss concern";
pub const REASON_HEATING_IN_COLD: &str =
    "heating during low external temperature, possible energy waste";
pub const REASON_STABLE: &str = "input conditions relatively stable";

pub const LONG_LESSON_MINUTES: i32 = 50;
pub const HOT_OUTSIDE_CELSIUS: i32 = 28;
pub const COLD_OUTSIDE_CELSIUS: i32 = 15;

fn closed_window(o: &Observation) -> bool {
    o.window_state == WindowState::Closed
}

fn long_lesson(o: &Observation) -> bool {
    o.lesson_duration_minutes >= LONG_LESSON_MINUTES
}

fn cooling_in_heat(o: &Observation) -> bool {
    o.climate_mode == ClimateMode::Cooling && o.outside_temperature_celsius >= HOT_OUTSIDE_CELSIUS
}

fn heating_in_cold(o: &Observation) -> bool {
    o.climate_mode == ClimateMode::Heating && o.outside_temperature_celsius <= COLD_OUTSIDE_CELSIUS
}

/// Reason predicates, checked in this order.
const PREDICATES: [(fn(&Observation) -> bool, &str); 4] = [
    (closed_window, REASON_CLOSED_WINDOW),
    (long_lesson, REASON_LONG_LESSON),
    (cooling_in_heat, REASON_COOLING_IN_HEAT),
    (heating_in_cold, REASON_HEATING_IN_COLD),
];

/// List every factor that holds for `obs`; never empty.
pub fn generate_reasons(obs: &Observation) -> Vec<String> {
    let mut reasons: Vec<String> = PREDICATES
        .iter()
        .filter(|(holds, _)| holds(obs))
        .map(|(_, text)| text.to_string())
        .collect();

    if reasons.is_empty() {
        reasons.push(REASON_STABLE.to_string());
    }
    reasons
}
