//! Plain-text report for a ventilation decision

use classvent_advisor::rules::{CO2_THRESHOLD_LITERS, HEAT_LOSS_THRESHOLD};
use classvent_types::FinalDecision;
use std::fmt;

const SEPARATOR: &str = "───────────────────────────────────────────";

const CARBON_EXPLANATION: &str = "Total CO2 converted to mass. It quantifies the \
environmental impact, not just the indoor concentration. For scale, 1 kgCO2 is \
roughly what an air conditioner produces in 30 minutes.";

const CO2_EXPLANATION: &str = "Carbon dioxide exhaled by the students during the \
lesson, in liters. Higher values mean worse air quality and a stronger need to \
ventilate. 9,000 L is a common classroom ventilation guideline.";

const HEAT_LOSS_EXPLANATION: &str = "How much heat escapes while climate control \
is running. Larger values mean more wasted energy and can argue against opening \
windows. Above 8, an open window largely cancels the air conditioner.";

fn needs(flag: bool) -> &'static str {
    if flag {
        "ventilation needed"
    } else {
        "not needed"
    }
}

/// Format a non-negative quantity as a thousands-separated integer
pub fn thousands(value: f64) -> String {
    let digits = (value.trunc() as i64).to_string();
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

/// Full text report: rule verdict, classifier verdict, reasons, comparison
/// and recommended action.
pub struct Report<'a>(pub &'a FinalDecision);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decision = self.0;
        let rule = &decision.rule_verdict;
        let classifier = &decision.classifier_verdict;

        writeln!(f, "1. Rule-based judgment")?;
        if rule.needs_ventilation {
            writeln!(f, "   -> CO2 above threshold: ventilation needed")?;
        } else {
            writeln!(f, "   -> CO2 below threshold: ventilation not needed")?;
        }
        writeln!(f, "   - Carbon emission: {:.3} kgCO2", rule.carbon_emission_kg)?;
        writeln!(f, "     {}", CARBON_EXPLANATION)?;
        writeln!(
            f,
            "   - Total CO2: {}L (threshold: {}L)",
            thousands(rule.co2_total_liters),
            thousands(CO2_THRESHOLD_LITERS)
        )?;
        writeln!(f, "     {}", CO2_EXPLANATION)?;
        writeln!(
            f,
            "   - Heat-loss index: {:.2} (reference: {} or more)",
            rule.heat_loss_index, HEAT_LOSS_THRESHOLD
        )?;
        writeln!(f, "     {}", HEAT_LOSS_EXPLANATION)?;
        if rule.needs_ventilation_by_heat_loss {
            writeln!(f, "     Heat loss is above the reference for the active climate mode.")?;
        }

        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f, "2. Classifier judgment")?;
        writeln!(
            f,
            "   -> {} (probability of ventilation: {:.1}%)",
            needs(classifier.needs_ventilation()),
            classifier.probability_yes * 100.0
        )?;
        writeln!(f, "   Contributing factors:")?;
        for reason in &decision.reasons {
            writeln!(f, "   - {}", reason)?;
        }

        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f, "3. Rule vs classifier")?;
        writeln!(f, "   - Rule-based: {}", needs(rule.needs_ventilation))?;
        writeln!(f, "   - Classifier: {}", needs(classifier.needs_ventilation()))?;
        writeln!(f, "   -> {}", decision.recommendation)?;

        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f, "4. Recommended action")?;
        writeln!(f, "   {}", decision.action)
    }
}
