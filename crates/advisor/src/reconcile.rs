//! Fusion of the rule and classifier verdicts

use classvent_types::{ClassifierVerdict, RuleVerdict, VentilationAction};
use serde::{Deserialize, Serialize};

pub const AGREEMENT_TEXT: &str = "both judgments agree; this is a high-confidence result";
pub const CONFLICT_TEXT: &str =
    "judgments disagree; use your own judgment and adjust to the situation";

/// Outcome of comparing both verdicts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub agreement: bool,
    pub recommendation: String,
    pub action: VentilationAction,
}

/// Compare the two verdicts. Ventilation wins whenever either side asks for it.
pub fn reconcile(rule: &RuleVerdict, classifier: &ClassifierVerdict) -> Reconciliation {
    let classifier_says_yes = classifier.needs_ventilation();
    let agreement = rule.needs_ventilation == classifier_says_yes;

    let recommendation = if agreement {
        AGREEMENT_TEXT
    } else {
        CONFLICT_TEXT
    };

    let action = if rule.needs_ventilation || classifier_says_yes {
        VentilationAction::VentilateNow
    } else {
        VentilationAction::DeferUntilNextLesson
    };

    Reconciliation {
        agreement,
        recommendation: recommendation.to_string(),
        action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classvent_types::VentilationLabel;

    fn rule(needs_ventilation: bool) -> RuleVerdict {
        RuleVerdict {
            co2_total_liters: if needs_ventilation { 10_800.0 } else { 540.0 },
            heat_loss_index: 0.0,
            carbon_emission_kg: 0.0,
            needs_ventilation,
            needs_ventilation_by_heat_loss: false,
        }
    }

    fn classifier(label: VentilationLabel) -> ClassifierVerdict {
        ClassifierVerdict {
            predicted_label: label,
            probability_yes: if label.is_yes() { 1.0 } else { 0.0 },
        }
    }

    #[test]
    fn truth_table() {
        use VentilationAction::{DeferUntilNextLesson, VentilateNow};
        use VentilationLabel::{No, Yes};

        let cases = [
            (true, Yes, true, VentilateNow),
            (true, No, false, VentilateNow),
            (false, Yes, false, VentilateNow),
            (false, No, true, DeferUntilNextLesson),
        ];

        for (rule_yes, label, agreement, action) in cases {
            let result = reconcile(&rule(rule_yes), &classifier(label));
            assert_eq!(result.agreement, agreement, "{} {:?}", rule_yes, label);
            assert_eq!(result.action, action, "{} {:?}", rule_yes, label);
            let expected_text = if agreement { AGREEMENT_TEXT } else { CONFLICT_TEXT };
            assert_eq!(result.recommendation, expected_text);
        }
    }
}
