use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Inclusive bounds accepted for each numeric observation field.
pub const STUDENT_COUNT_RANGE: (i32, i32) = (20, 35);
pub const LESSON_DURATION_RANGE: (i32, i32) = (30, 60);
pub const OUTSIDE_TEMPERATURE_RANGE: (i32, i32) = (-10, 40);

/// Errors raised while validating or parsing an observation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObservationError {
    #[error("{field} = {value} is outside the accepted range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("unknown {field} value: {value:?}")]
    UnknownVariant { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowState {
    Open,
    Closed,
}

impl WindowState {
    /// Declared domain, in schema order.
    pub const ALL: [WindowState; 2] = [WindowState::Open, WindowState::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowState::Open => "OPEN",
            WindowState::Closed => "CLOSED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClimateMode {
    Cooling,
    Heating,
    None,
}

impl ClimateMode {
    /// Declared domain, in schema order.
    pub const ALL: [ClimateMode; 3] = [ClimateMode::Cooling, ClimateMode::Heating, ClimateMode::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateMode::Cooling => "COOLING",
            ClimateMode::Heating => "HEATING",
            ClimateMode::None => "NONE",
        }
    }

    /// True when heating or cooling is running.
    pub fn is_active(&self) -> bool {
        !matches!(self, ClimateMode::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VentilationLabel {
    No,
    Yes,
}

impl VentilationLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VentilationLabel::No => "NO",
            VentilationLabel::Yes => "YES",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, VentilationLabel::Yes)
    }
}

macro_rules! impl_text_enum {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ObservationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::variants()
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ObservationError::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl WindowState {
    fn variants() -> &'static [WindowState] {
        &Self::ALL
    }
}

impl ClimateMode {
    fn variants() -> &'static [ClimateMode] {
        &Self::ALL
    }
}

impl VentilationLabel {
    fn variants() -> &'static [VentilationLabel] {
        &[VentilationLabel::No, VentilationLabel::Yes]
    }
}

impl_text_enum!(WindowState, "window_state");
impl_text_enum!(ClimateMode, "climate_mode");
impl_text_enum!(VentilationLabel, "ventilation_label");

/// Classroom conditions for one lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub student_count: i32,
    pub lesson_duration_minutes: i32,
    pub window_state: WindowState,
    pub climate_mode: ClimateMode,
    pub outside_temperature_celsius: i32,
}

impl Observation {
    pub fn new(
        student_count: i32,
        lesson_duration_minutes: i32,
        window_state: WindowState,
        climate_mode: ClimateMode,
        outside_temperature_celsius: i32,
    ) -> Self {
        Self {
            student_count,
            lesson_duration_minutes,
            window_state,
            climate_mode,
            outside_temperature_celsius,
        }
    }

    /// Check every numeric field against its documented range.
    pub fn validate(&self) -> Result<(), ObservationError> {
        check_range("student_count", self.student_count, STUDENT_COUNT_RANGE)?;
        check_range(
            "lesson_duration_minutes",
            self.lesson_duration_minutes,
            LESSON_DURATION_RANGE,
        )?;
        check_range(
            "outside_temperature_celsius",
            self.outside_temperature_celsius,
            OUTSIDE_TEMPERATURE_RANGE,
        )?;
        Ok(())
    }

    pub fn with_label(self, ventilation_label: VentilationLabel) -> LabeledObservation {
        LabeledObservation {
            observation: self,
            ventilation_label,
        }
    }
}

fn check_range(field: &'static str, value: i32, (min, max): (i32, i32)) -> Result<(), ObservationError> {
    if value < min || value > max {
        return Err(ObservationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// A historical observation together with its ventilation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabeledObservation {
    #[serde(flatten)]
    pub observation: Observation,
    pub ventilation_label: VentilationLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Observation {
        Observation::new(30, 45, WindowState::Closed, ClimateMode::Cooling, 32)
    }

    #[test]
    fn accepts_bounds() {
        assert!(Observation::new(20, 30, WindowState::Open, ClimateMode::None, -10)
            .validate()
            .is_ok());
        assert!(Observation::new(35, 60, WindowState::Closed, ClimateMode::Heating, 40)
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let mut obs = sample();
        obs.student_count = 19;
        assert_eq!(
            obs.validate(),
            Err(ObservationError::OutOfRange {
                field: "student_count",
                value: 19,
                min: 20,
                max: 35
            })
        );

        let mut obs = sample();
        obs.lesson_duration_minutes = 61;
        assert!(matches!(
            obs.validate(),
            Err(ObservationError::OutOfRange { field: "lesson_duration_minutes", .. })
        ));

        let mut obs = sample();
        obs.outside_temperature_celsius = -11;
        assert!(matches!(
            obs.validate(),
            Err(ObservationError::OutOfRange { field: "outside_temperature_celsius", .. })
        ));
    }

    #[test]
    fn parses_enum_text_case_insensitively() {
        assert_eq!("open".parse::<WindowState>(), Ok(WindowState::Open));
        assert_eq!(" HEATING ".parse::<ClimateMode>(), Ok(ClimateMode::Heating));
        assert_eq!("Yes".parse::<VentilationLabel>(), Ok(VentilationLabel::Yes));
        assert!(matches!(
            "ajar".parse::<WindowState>(),
            Err(ObservationError::UnknownVariant { field: "window_state", .. })
        ));
    }

    #[test]
    fn serializes_enums_upper_case() {
        let labeled = sample().with_label(VentilationLabel::No);
        let json = serde_json::to_value(labeled).unwrap();
        assert_eq!(json["window_state"], "CLOSED");
        assert_eq!(json["climate_mode"], "COOLING");
        assert_eq!(json["ventilation_label"], "NO");
        assert_eq!(json["student_count"], 30);

        let back: LabeledObservation = serde_json::from_value(json).unwrap();
        assert_eq!(back, labeled);
    }

    #[test]
    fn climate_mode_activity() {
        assert!(ClimateMode::Cooling.is_active());
        assert!(ClimateMode::Heating.is_active());
        assert!(!ClimateMode::None.is_active());
    }
}
