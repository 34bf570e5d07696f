use tracing::debug;

use crate::advice::{self, AdviceInputs};
use crate::config::EngineConfig;
use crate::error::PredictorError;
use crate::penalty::Penalties;
use crate::risk::risk_score;
use crate::types::{PredictionResult, WaterSample};

/// Predictor bound to one validated configuration.
#[derive(Debug, Clone, Default)]
pub struct Predictor {
    config: EngineConfig,
}

impl Predictor {
    pub fn new(config: EngineConfig) -> Result<Self, PredictorError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one sample. Never fails; negative inputs give defined but
    /// meaningless numbers.
    pub fn predict(&self, sample: &WaterSample) -> PredictionResult {
        let cfg = &self.config;

        let penalties = Penalties::evaluate(cfg, sample);
        let total = penalties.total();
        let lead_removal = cfg.lead.apply(total);
        let arsenic_removal = cfg.arsenic.apply(total);

        let lead_out_mg_l = sample.lead_mg_l * (1.0 - lead_removal);
        let arsenic_out_mg_l = sample.arsenic_mg_l * (1.0 - arsenic_removal);
        let lead_compliant = lead_out_mg_l <= cfg.guidelines.lead_mg_l;
        let arsenic_compliant = arsenic_out_mg_l <= cfg.guidelines.arsenic_mg_l;

        let risk_score = risk_score(cfg, sample);
        let life = cfg
            .life
            .estimate(sample, lead_removal, arsenic_removal, cfg.ph_target);

        let outcome = AdviceInputs {
            lead_out_mg_l,
            arsenic_out_mg_l,
            lead_compliant,
            arsenic_compliant,
            risk_score,
        };
        let recommendations = advice::recommendations(&cfg.advice, sample, &outcome);

        debug!(
            turbidity_penalty = penalties.turbidity,
            ph_penalty = penalties.ph,
            load_penalty = penalties.load,
            lead_removal,
            arsenic_removal,
            risk_score,
            life_days = life.days,
            model = cfg.life.name(),
            "prediction evaluated"
        );

        PredictionResult {
            lead_removal,
            arsenic_removal,
            lead_removal_pct: lead_removal * 100.0,
            arsenic_removal_pct: arsenic_removal * 100.0,
            lead_out_mg_l,
            arsenic_out_mg_l,
            lead_compliant,
            arsenic_compliant,
            risk_score,
            life_days: life.days,
            total_treatable_volume_l: life.total_volume_l,
            recommendations,
        }
    }
}

/// Evaluate with the default (column sorption) configuration.
pub fn predict(sample: &WaterSample) -> PredictionResult {
    Predictor::default().predict(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn invalid_config_is_refused() {
        let mut cfg = EngineConfig::default();
        cfg.risk.min = 0.9;
        cfg.risk.max = 0.1;
        assert!(Predictor::new(cfg).is_err());
    }

    #[test]
    fn clean_water_is_all_ok() {
        let r = predict(&WaterSample::new(0.0, 0.0, 7.5, 0.0, 100.0));
        assert!(r.is_compliant());
        assert_eq!(r.worst_severity(), Severity::Ok);
        assert_eq!(r.recommendations.len(), 4);
    }

    #[test]
    fn percentages_mirror_fractions() {
        let r = predict(&WaterSample::new(0.05, 0.05, 7.0, 200.0, 500.0));
        assert!((r.lead_removal_pct - r.lead_removal * 100.0).abs() < 1e-12);
        assert!((r.arsenic_removal_pct - r.arsenic_removal * 100.0).abs() < 1e-12);
    }

    #[test]
    fn field_kit_uses_heuristic_life() {
        let p = Predictor::new(EngineConfig::field_kit()).unwrap();
        let r = p.predict(&WaterSample::new(0.02, 0.05, 7.5, 100.0, 2000.0));
        assert!(r.total_treatable_volume_l.is_none());
        assert!((3.0..=30.0).contains(&r.life_days));
    }
}
