//! Classvent Advisor - hybrid classroom ventilation decisions
//!
//! Combines a fixed physical rule engine with a decision tree trained on
//! labeled observations, explains the contributing factors and reconciles
//! both verdicts into a single recommended action.

pub mod config;
pub mod errors;
pub mod reasoning;
pub mod reconcile;
pub mod rules;

use classvent_classifier::{ClassifierTrainer, Dataset, ModelCache};
use classvent_types::{ClassifierVerdict, FinalDecision, Observation};
use std::sync::Arc;
use tracing::{info, warn};

pub use config::AdvisorConfig;
pub use errors::{AdvisorError, Result};
pub use reasoning::generate_reasons;
pub use reconcile::{reconcile, Reconciliation};
pub use rules::evaluate_rules;

/// Evaluate one observation against `training_set` with default settings.
///
/// The observation is validated, and a fresh tree is trained for the request.
pub fn evaluate(query: &Observation, training_set: &Dataset) -> Result<FinalDecision> {
    query.validate()?;
    let verdict = ClassifierTrainer::default().train(training_set)?.predict(query)?;
    Ok(decide(query, verdict))
}

/// Configured advisor sharing one read-only training set
#[derive(Debug)]
pub struct Advisor {
    config: AdvisorConfig,
    dataset: Arc<Dataset>,
    trainer: ClassifierTrainer,
    cache: Option<ModelCache>,
}

impl Advisor {
    pub fn new(config: AdvisorConfig, dataset: Arc<Dataset>) -> Self {
        let trainer = ClassifierTrainer::new(config.tree_config());
        let cache = config.classifier.cache_models.then(ModelCache::new);
        Self {
            config,
            dataset,
            trainer,
            cache,
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Model cache, present when `classifier.cache_models` is set
    pub fn cache(&self) -> Option<&ModelCache> {
        self.cache.as_ref()
    }

    /// Produce the final decision for one observation
    pub fn evaluate(&self, query: &Observation) -> Result<FinalDecision> {
        if self.config.validation.validate_inputs {
            query.validate()?;
        }

        let verdict = self.classify(query)?;
        Ok(decide(query, verdict))
    }

    fn classify(&self, query: &Observation) -> Result<ClassifierVerdict> {
        let verdict = match &self.cache {
            Some(cache) => cache.get_or_train(&self.trainer, &self.dataset)?.predict(query)?,
            None => self.trainer.train(&self.dataset)?.predict(query)?,
        };
        Ok(verdict)
    }
}

fn decide(query: &Observation, classifier_verdict: ClassifierVerdict) -> FinalDecision {
    let rule_verdict = evaluate_rules(query);
    let reasons = generate_reasons(query);
    let Reconciliation {
        agreement,
        recommendation,
        action,
    } = reconcile(&rule_verdict, &classifier_verdict);

    info!(
        co2_total_liters = rule_verdict.co2_total_liters,
        rule_ventilate = rule_verdict.needs_ventilation,
        classifier_label = %classifier_verdict.predicted_label,
        probability_yes = classifier_verdict.probability_yes,
        agreement,
        action = ?action,
        "ventilation decision"
    );
    if !agreement {
        warn!(
            rule_ventilate = rule_verdict.needs_ventilation,
            classifier_label = %classifier_verdict.predicted_label,
            "rule engine and classifier disagree"
        );
    }

    FinalDecision {
        observation: *query,
        rule_verdict,
        classifier_verdict,
        reasons,
        agreement,
        recommendation,
        action,
    }
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use classvent_types::{ClimateMode, VentilationAction, WindowState};

    fn scenario_a() -> Observation {
        Observation::new(30, 60, WindowState::Closed, ClimateMode::Cooling, 32)
    }

    #[test]
    fn out_of_range_query_is_rejected() {
        let query = Observation::new(50, 60, WindowState::Closed, ClimateMode::Cooling, 32);
        let err = evaluate(&query, &Dataset::builtin()).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidObservation(_)));
    }

    #[test]
    fn validation_can_be_disabled() {
        let mut config = AdvisorConfig::default();
        config.validation.validate_inputs = false;
        let advisor = Advisor::new(config, Arc::new(Dataset::builtin()));

        let query = Observation::new(50, 60, WindowState::Closed, ClimateMode::Cooling, 32);
        let decision = advisor.evaluate(&query).unwrap();
        assert_eq!(decision.rule_verdict.co2_total_liters, 900.0);
    }

    #[test]
    fn unvalidated_extreme_temperature_is_evaluated() {
        let mut config = AdvisorConfig::default();
        config.validation.validate_inputs = false;
        let advisor = Advisor::new(config, Arc::new(Dataset::builtin()));

        let query = Observation::new(25, 40, WindowState::Open, ClimateMode::Heating, i32::MIN);
        let decision = advisor.evaluate(&query).unwrap();
        assert!(decision.rule_verdict.heat_loss_index.is_finite());
        assert!(decision.rule_verdict.needs_ventilation_by_heat_loss);
    }

    #[test]
    fn empty_training_set_fails_atomically() {
        let err = evaluate(&scenario_a(), &Dataset::new(Vec::new())).unwrap_err();
        assert!(matches!(err, AdvisorError::Classifier(_)));
    }

    #[test]
    fn cached_advisor_matches_uncached() {
        let dataset = Arc::new(Dataset::builtin());
        let mut config = AdvisorConfig::default();
        config.classifier.cache_models = true;

        let cached = Advisor::new(config, Arc::clone(&dataset));
        let uncached = Advisor::new(AdvisorConfig::default(), dataset);
        assert!(uncached.cache().is_none());

        for _ in 0..3 {
            assert_eq!(
                cached.evaluate(&scenario_a()).unwrap(),
                uncached.evaluate(&scenario_a()).unwrap()
            );
        }

        let stats = cached.cache().map(ModelCache::stats).unwrap();
        assert_eq!((stats.hits, stats.misses, stats.entries), (2, 1, 1));
    }

    #[test]
    fn shallow_tree_config_reaches_the_trainer() {
        let mut config = AdvisorConfig::default();
        config.classifier.max_depth = Some(0);
        let advisor = Advisor::new(config, Arc::new(Dataset::builtin()));

        // A single leaf predicts the training majority (16 NO / 14 YES).
        let decision = advisor.evaluate(&scenario_a()).unwrap();
        assert!(!decision.classifier_verdict.needs_ventilation());
        assert!((decision.classifier_verdict.probability_yes - 14.0 / 30.0).abs() < 1e-12);
        assert!(decision.agreement);
        assert_eq!(decision.action, VentilationAction::DeferUntilNextLesson);
    }
}
