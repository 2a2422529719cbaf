use serde::{Deserialize, Serialize};
use std::fmt;

use crate::observation::{Observation, VentilationLabel};

/// Outcome of the physical-heuristic rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleVerdict {
    /// CO2 exhaled during the lesson (liters).
    pub co2_total_liters: f64,
    /// Unitless estimate of heat lost through the window.
    pub heat_loss_index: f64,
    /// CO2 mass equivalent (kilograms).
    pub carbon_emission_kg: f64,
    pub needs_ventilation: bool,
    /// Diagnostic only. Never folded into `needs_ventilation`.
    pub needs_ventilation_by_heat_loss: bool,
}

/// Outcome of the decision-tree classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    pub predicted_label: VentilationLabel,
    /// Fraction of YES training examples at the reached leaf.
    pub probability_yes: f64,
}

impl ClassifierVerdict {
    pub fn needs_ventilation(&self) -> bool {
        self.predicted_label.is_yes()
    }
}

/// What the operator should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VentilationAction {
    VentilateNow,
    DeferUntilNextLesson,
}

impl VentilationAction {
    pub fn message(&self) -> &'static str {
        match self {
            VentilationAction::VentilateNow => {
                "ventilation is recommended now; if the lesson is still running, start by partially opening a window"
            }
            VentilationAction::DeferUntilNextLesson => {
                "no urgent need to ventilate; a short ventilation before the next lesson is enough"
            }
        }
    }
}

impl fmt::Display for VentilationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub observation: Observation,
    pub rule_verdict: RuleVerdict,
    pub classifier_verdict: ClassifierVerdict,
    /// Contributing factors, never empty.
    pub reasons: Vec<String>,
    pub agreement: bool,
    pub recommendation: String,
    pub action: VentilationAction,
}
