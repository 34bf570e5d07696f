//! Remaining media life.
//!
//! Two models exist and a deployment runs exactly one of them:
//!
//! * [`HeuristicLife`] maps a 0..1 stress index (turbidity, load, pH
//!   deviation) linearly onto a short day window, for cartridges whose media
//!   mass is unknown.
//! * [`CapacityLife`] divides fouled sorption capacity by the contaminant
//!   mass removed per day, for columns with known media charge.

use serde::{Deserialize, Serialize};

use crate::error::PredictorError;
use crate::penalty::clamp;
use crate::types::WaterSample;

/// Floor on the daily removed mass so zero flow cannot divide by zero.
pub const DAILY_MASS_EPSILON_MG: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicLife {
    pub min_days: f64,
    pub max_days: f64,
    pub turbidity_weight: f64,
    pub load_weight: f64,
    pub ph_weight: f64,
    pub turbidity_baseline_ntu: f64,
    pub turbidity_span_ntu: f64,
    pub load_ref_mg_l: f64,
    pub ph_span: f64,
}

impl Default for HeuristicLife {
    fn default() -> Self {
        Self {
            min_days: 3.0,
            max_days: 30.0,
            turbidity_weight: 0.5,
            load_weight: 0.3,
            ph_weight: 0.2,
            turbidity_baseline_ntu: 50.0,
            turbidity_span_ntu: 950.0,
            load_ref_mg_l: 0.5,
            ph_span: 3.0,
        }
    }
}

impl HeuristicLife {
    /// Stress index in [0, 1] when the weights sum to 1.
    pub fn stress(&self, sample: &WaterSample, ph_target: f64) -> f64 {
        let turb = clamp(
            (sample.turbidity_ntu - self.turbidity_baseline_ntu) / self.turbidity_span_ntu,
            0.0,
            1.0,
        );
        let load = clamp(sample.load_mg_l() / self.load_ref_mg_l, 0.0, 1.0);
        let ph = clamp((sample.ph - ph_target).abs() / self.ph_span, 0.0, 1.0);
        self.turbidity_weight * turb + self.load_weight * load + self.ph_weight * ph
    }

    pub fn days(&self, sample: &WaterSample, ph_target: f64) -> f64 {
        let stress = self.stress(sample, ph_target);
        let days = self.max_days - stress * (self.max_days - self.min_days);
        clamp(days, self.min_days, self.max_days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityLife {
    /// Used when the sample carries no media mass.
    pub default_media_mass_g: f64,
    /// Used when the sample carries no media capacity.
    pub default_capacity_mg_per_g: f64,
    pub fouling_baseline_ntu: f64,
    pub fouling_span_ntu: f64,
    pub fouling_floor: f64,
    pub max_days: f64,
}

impl Default for CapacityLife {
    fn default() -> Self {
        Self {
            default_media_mass_g: 3000.0,
            default_capacity_mg_per_g: 6.0,
            fouling_baseline_ntu: 50.0,
            fouling_span_ntu: 2000.0,
            fouling_floor: 0.30,
            max_days: 365.0,
        }
    }
}

impl CapacityLife {
    /// Fraction of nominal capacity still usable at this turbidity.
    pub fn fouling_factor(&self, turbidity_ntu: f64) -> f64 {
        let excess = (turbidity_ntu - self.fouling_baseline_ntu).max(0.0);
        clamp(1.0 - excess / self.fouling_span_ntu, self.fouling_floor, 1.0)
    }

    /// Usable sorption capacity, mg.
    pub fn usable_capacity_mg(&self, sample: &WaterSample) -> f64 {
        let mass = sample.media_mass_g.unwrap_or(self.default_media_mass_g);
        let per_g = sample
            .media_capacity_mg_per_g
            .unwrap_or(self.default_capacity_mg_per_g);
        mass * per_g * self.fouling_factor(sample.turbidity_ntu)
    }

    /// Contaminant mass captured per day, mg.
    pub fn daily_removed_mg(sample: &WaterSample, lead_removal: f64, arsenic_removal: f64) -> f64 {
        sample.flow_l_per_day
            * (sample.lead_mg_l * lead_removal + sample.arsenic_mg_l * arsenic_removal)
    }

    pub fn days(&self, sample: &WaterSample, lead_removal: f64, arsenic_removal: f64) -> f64 {
        let daily = Self::daily_removed_mg(sample, lead_removal, arsenic_removal)
            .max(DAILY_MASS_EPSILON_MG);
        clamp(self.usable_capacity_mg(sample) / daily, 0.0, self.max_days)
    }
}

/// Life model selected for a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LifeModel {
    Heuristic(HeuristicLife),
    Capacity(CapacityLife),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeEstimate {
    pub days: f64,
    pub total_volume_l: Option<f64>,
}

impl LifeModel {
    pub fn name(&self) -> &'static str {
        match self {
            LifeModel::Heuristic(_) => "heuristic",
            LifeModel::Capacity(_) => "capacity",
        }
    }

    pub fn estimate(
        &self,
        sample: &WaterSample,
        lead_removal: f64,
        arsenic_removal: f64,
        ph_target: f64,
    ) -> LifeEstimate {
        match self {
            LifeModel::Heuristic(h) => LifeEstimate {
                days: h.days(sample, ph_target),
                total_volume_l: None,
            },
            LifeModel::Capacity(c) => {
                let days = c.days(sample, lead_removal, arsenic_removal);
                LifeEstimate {
                    days,
                    total_volume_l: Some(days * sample.flow_l_per_day),
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), PredictorError> {
        match self {
            LifeModel::Heuristic(h) => {
                if !(h.min_days <= h.max_days) {
                    return Err(PredictorError::InvalidConfig(
                        "heuristic life min_days above max_days",
                    ));
                }
                if !(h.turbidity_span_ntu > 0.0 && h.load_ref_mg_l > 0.0 && h.ph_span > 0.0) {
                    return Err(PredictorError::InvalidConfig(
                        "heuristic life scales must be positive",
                    ));
                }
                let weights = [h.turbidity_weight, h.load_weight, h.ph_weight];
                if weights.iter().any(|w| !(*w >= 0.0)) {
                    return Err(PredictorError::InvalidConfig(
                        "heuristic life weights must be non-negative",
                    ));
                }
            }
            LifeModel::Capacity(c) => {
                if !(c.fouling_span_ntu > 0.0) {
                    return Err(PredictorError::InvalidConfig("fouling span must be positive"));
                }
                if !(0.0..=1.0).contains(&c.fouling_floor) {
                    return Err(PredictorError::InvalidConfig("fouling floor outside [0, 1]"));
                }
                if !(c.default_media_mass_g >= 0.0 && c.default_capacity_mg_per_g >= 0.0) {
                    return Err(PredictorError::InvalidConfig(
                        "default media mass and capacity must be non-negative",
                    ));
                }
                if !(c.max_days >= 0.0) {
                    return Err(PredictorError::InvalidConfig("capacity life max_days negative"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_clean_water_gets_full_window() {
        let h = HeuristicLife::default();
        assert_eq!(h.days(&WaterSample::default(), 7.5), 30.0);
    }

    #[test]
    fn heuristic_worst_case_gets_min_window() {
        let h = HeuristicLife::default();
        let s = WaterSample::new(1.0, 1.0, 3.0, 3000.0, 100.0);
        assert!((h.days(&s, 7.5) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn fouling_factor_floors() {
        let c = CapacityLife::default();
        assert_eq!(c.fouling_factor(0.0), 1.0);
        assert!((c.fouling_factor(500.0) - 0.775).abs() < 1e-12);
        assert_eq!(c.fouling_factor(10_000.0), 0.30);
    }

    #[test]
    fn capacity_uses_sample_media_when_present() {
        let c = CapacityLife::default();
        let s = WaterSample::new(0.1, 0.1, 7.5, 0.0, 100.0).with_media(1000.0, 2.0);
        assert_eq!(c.usable_capacity_mg(&s), 2000.0);
        // 100 L/day * (0.1*0.5 + 0.1*0.5) = 10 mg/day
        assert!((c.days(&s, 0.5, 0.5) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn zero_flow_saturates_at_max() {
        let model = LifeModel::Capacity(CapacityLife::default());
        let est = model.estimate(&WaterSample::new(0.2, 1.0, 7.5, 500.0, 0.0), 0.6, 0.55, 7.5);
        assert_eq!(est.days, 365.0);
        assert_eq!(est.total_volume_l, Some(0.0));
    }

    #[test]
    fn heuristic_has_no_volume() {
        let model = LifeModel::Heuristic(HeuristicLife::default());
        let est = model.estimate(&WaterSample::default(), 0.95, 0.9, 7.5);
        assert!(est.total_volume_l.is_none());
    }
}
