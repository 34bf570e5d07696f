use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PredictorError;
use crate::life::{CapacityLife, HeuristicLife, LifeModel};
use crate::penalty::clamp;

/// Affine penalty term: clamp((x - offset) / divisor, 0, cap).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyCurve {
    pub offset: f64,
    pub divisor: f64,
    pub cap: f64,
}

impl PenaltyCurve {
    pub const fn new(offset: f64, divisor: f64, cap: f64) -> Self {
        Self { offset, divisor, cap }
    }

    pub fn eval(&self, x: f64) -> f64 {
        clamp((x - self.offset) / self.divisor, 0.0, self.cap)
    }

    fn check(&self, what: &'static str) -> Result<(), PredictorError> {
        if !(self.divisor > 0.0) {
            return Err(PredictorError::InvalidConfig(what));
        }
        if !(self.cap >= 0.0) {
            return Err(PredictorError::InvalidConfig(what));
        }
        Ok(())
    }
}

/// Unpenalized removal and the band the penalized value is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemovalBand {
    pub base: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl RemovalBand {
    pub fn apply(&self, total_penalty: f64) -> f64 {
        clamp(self.base - total_penalty, self.floor, self.ceiling)
    }
}

/// Drinking-water guideline limits, mg/L.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Guidelines {
    pub lead_mg_l: f64,
    pub arsenic_mg_l: f64,
}

impl Default for Guidelines {
    fn default() -> Self {
        Self {
            lead_mg_l: 0.01,
            arsenic_mg_l: 0.01,
        }
    }
}

/// Weights and normalization scales for the composite risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub baseline: f64,
    pub turbidity: f64,
    pub load: f64,
    pub ph: f64,
    /// Zero for flow-unaware deployments.
    pub flow: f64,
    pub turbidity_baseline_ntu: f64,
    pub turbidity_span_ntu: f64,
    pub load_ref_mg_l: f64,
    pub ph_span: f64,
    pub flow_ref_l_per_day: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            baseline: 0.05,
            turbidity: 0.40,
            load: 0.30,
            ph: 0.15,
            flow: 0.10,
            turbidity_baseline_ntu: 50.0,
            turbidity_span_ntu: 950.0,
            load_ref_mg_l: 0.5,
            ph_span: 3.0,
            flow_ref_l_per_day: 5000.0,
            min: 0.05,
            max: 0.95,
        }
    }
}

/// Cut points for the advice list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceThresholds {
    pub turbidity_warn_ntu: f64,
    pub turbidity_bad_ntu: f64,
    pub ph_low: f64,
    pub ph_high: f64,
    pub risk_warn: f64,
    pub risk_bad: f64,
}

impl Default for AdviceThresholds {
    fn default() -> Self {
        Self {
            turbidity_warn_ntu: 300.0,
            turbidity_bad_ntu: 900.0,
            ph_low: 6.5,
            ph_high: 8.5,
            risk_warn: 0.33,
            risk_bad: 0.66,
        }
    }
}

/// Every tunable constant of the predictor.
///
/// JSON overrides are laid over a base config (see [`EngineConfig::overlay_json`]),
/// so a file only needs the fields it changes, at any nesting depth. An
/// explicit `null` for `ph_penalty` or `load_penalty` turns that term off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub turbidity_penalty: PenaltyCurve,
    pub ph_penalty: Option<PenaltyCurve>,
    pub load_penalty: Option<PenaltyCurve>,
    pub ph_target: f64,
    pub lead: RemovalBand,
    pub arsenic: RemovalBand,
    pub guidelines: Guidelines,
    pub risk: RiskWeights,
    pub life: LifeModel,
    pub advice: AdviceThresholds,
}

impl EngineConfig {
    /// Packed sorbent column sized by media mass and capacity.
    pub fn column_sorption() -> Self {
        Self {
            turbidity_penalty: PenaltyCurve::new(50.0, 1200.0, 0.40),
            ph_penalty: Some(PenaltyCurve::new(0.0, 20.0, 0.20)),
            load_penalty: Some(PenaltyCurve::new(0.0, 10.0, 0.12)),
            ph_target: 7.5,
            lead: RemovalBand {
                base: 0.95,
                floor: 0.60,
                ceiling: 0.98,
            },
            arsenic: RemovalBand {
                base: 0.90,
                floor: 0.55,
                ceiling: 0.97,
            },
            guidelines: Guidelines::default(),
            risk: RiskWeights::default(),
            life: LifeModel::Capacity(CapacityLife::default()),
            advice: AdviceThresholds::default(),
        }
    }

    /// Cartridge field kit: stress-based life, no pH removal penalty,
    /// risk ignores flow.
    pub fn field_kit() -> Self {
        Self {
            turbidity_penalty: PenaltyCurve::new(50.0, 1200.0, 0.30),
            ph_penalty: None,
            load_penalty: Some(PenaltyCurve::new(0.0, 10.0, 0.12)),
            ph_target: 7.5,
            lead: RemovalBand {
                base: 0.95,
                floor: 0.55,
                ceiling: 0.97,
            },
            arsenic: RemovalBand {
                base: 0.90,
                floor: 0.50,
                ceiling: 0.97,
            },
            guidelines: Guidelines::default(),
            risk: RiskWeights {
                flow: 0.0,
                ..RiskWeights::default()
            },
            life: LifeModel::Heuristic(HeuristicLife::default()),
            advice: AdviceThresholds::default(),
        }
    }

    /// Look up a preset by its CLI name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "column" | "column-sorption" => Some(Self::column_sorption()),
            "field-kit" | "field_kit" => Some(Self::field_kit()),
            _ => None,
        }
    }

    /// Overrides on top of the default (column sorption) preset.
    pub fn from_json_str(raw: &str) -> Result<Self, PredictorError> {
        Self::default().overlay_json(raw)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PredictorError> {
        Self::default().overlay_json_file(path)
    }

    /// Lay a partial JSON document over `self` and validate the result.
    ///
    /// Objects merge key by key; anything else replaces. A `life` block
    /// naming a different `model` replaces the base life block whole.
    pub fn overlay_json(&self, raw: &str) -> Result<Self, PredictorError> {
        let patch: Value = serde_json::from_str(raw)?;
        let mut merged = serde_json::to_value(self)?;
        merge_json(&mut merged, patch);
        let cfg: Self = serde_json::from_value(merged)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn overlay_json_file(&self, path: impl AsRef<Path>) -> Result<Self, PredictorError> {
        let raw = fs::read_to_string(path)?;
        self.overlay_json(&raw)
    }

    /// Reject parameter sets the formulas cannot honor.
    pub fn validate(&self) -> Result<(), PredictorError> {
        self.turbidity_penalty.check("turbidity penalty needs divisor > 0 and cap >= 0")?;
        if let Some(p) = &self.ph_penalty {
            p.check("pH penalty needs divisor > 0 and cap >= 0")?;
        }
        if let Some(p) = &self.load_penalty {
            p.check("load penalty needs divisor > 0 and cap >= 0")?;
        }
        for band in [&self.lead, &self.arsenic] {
            if !(band.floor <= band.ceiling) {
                return Err(PredictorError::InvalidConfig("removal floor above ceiling"));
            }
            if band.floor < 0.0 || band.ceiling > 1.0 {
                return Err(PredictorError::InvalidConfig("removal band outside [0, 1]"));
            }
        }
        if !(self.guidelines.lead_mg_l > 0.0 && self.guidelines.arsenic_mg_l > 0.0) {
            return Err(PredictorError::InvalidConfig("guideline limits must be positive"));
        }
        let r = &self.risk;
        if !(r.min <= r.max) {
            return Err(PredictorError::InvalidConfig("risk min above max"));
        }
        if !(r.turbidity_span_ntu > 0.0
            && r.load_ref_mg_l > 0.0
            && r.ph_span > 0.0
            && r.flow_ref_l_per_day > 0.0)
        {
            return Err(PredictorError::InvalidConfig("risk normalization scales must be positive"));
        }
        if [r.turbidity, r.load, r.ph, r.flow].iter().any(|w| !(*w >= 0.0)) {
            return Err(PredictorError::InvalidConfig("risk weights must be non-negative"));
        }
        let a = &self.advice;
        if !(a.turbidity_warn_ntu <= a.turbidity_bad_ntu
            && a.risk_warn <= a.risk_bad
            && a.ph_low <= a.ph_high)
        {
            return Err(PredictorError::InvalidConfig("advice thresholds out of order"));
        }
        self.life.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::column_sorption()
    }
}

fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(dst), Value::Object(src)) => {
            let retagged = matches!(
                (dst.get("model"), src.get("model")),
                (Some(a), Some(b)) if a != b
            );
            if retagged {
                dst.clear();
            }
            for (key, value) in src {
                if value.is_object() {
                    if let Some(slot) = dst.get_mut(&key) {
                        merge_json(slot, value);
                        continue;
                    }
                }
                dst.insert(key, value);
            }
        }
        (slot, patch) => *slot = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        EngineConfig::column_sorption().validate().unwrap();
        EngineConfig::field_kit().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{ "ph_target": 7.0 }"#).unwrap();
        assert_eq!(cfg.ph_target, 7.0);
        assert_eq!(cfg.lead, EngineConfig::default().lead);
        assert!(matches!(cfg.life, LifeModel::Capacity(_)));
    }

    #[test]
    fn null_disables_ph_penalty() {
        let cfg = EngineConfig::from_json_str(r#"{ "ph_penalty": null }"#).unwrap();
        assert!(cfg.ph_penalty.is_none());
        assert!(cfg.load_penalty.is_some());
    }

    #[test]
    fn heuristic_model_from_json() {
        let cfg = EngineConfig::from_json_str(r#"{ "life": { "model": "heuristic" } }"#).unwrap();
        assert_eq!(cfg.life, LifeModel::Heuristic(HeuristicLife::default()));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.lead.floor = 0.99;
        assert!(matches!(cfg.validate(), Err(PredictorError::InvalidConfig(_))));
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let mut cfg = EngineConfig::field_kit();
        cfg.turbidity_penalty.divisor = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn removal_band_clamps() {
        let band = RemovalBand { base: 0.95, floor: 0.60, ceiling: 0.98 };
        assert_eq!(band.apply(0.0), 0.95);
        assert_eq!(band.apply(0.9), 0.60);
        assert_eq!(band.apply(-0.5), 0.98);
    }

    #[test]
    fn nested_partial_override_keeps_siblings() {
        let cfg = EngineConfig::from_json_str(r#"{ "lead": { "floor": 0.5 } }"#).unwrap();
        assert_eq!(cfg.lead.floor, 0.5);
        assert_eq!(cfg.lead.base, 0.95);
        assert_eq!(cfg.lead.ceiling, 0.98);

        let cfg = EngineConfig::from_json_str(r#"{ "turbidity_penalty": { "cap": 0.3 } }"#).unwrap();
        assert_eq!(cfg.turbidity_penalty, PenaltyCurve::new(50.0, 1200.0, 0.3));
    }

    #[test]
    fn overlay_starts_from_given_preset() {
        let cfg = EngineConfig::field_kit()
            .overlay_json(r#"{ "arsenic": { "ceiling": 0.95 } }"#)
            .unwrap();
        assert!(cfg.ph_penalty.is_none());
        assert_eq!(cfg.arsenic.floor, 0.50);
        assert_eq!(cfg.arsenic.ceiling, 0.95);
        assert!(matches!(cfg.life, LifeModel::Heuristic(_)));
    }

    #[test]
    fn switching_life_model_drops_old_fields() {
        let cfg = EngineConfig::field_kit()
            .overlay_json(r#"{ "life": { "model": "capacity" } }"#)
            .unwrap();
        assert_eq!(cfg.life, LifeModel::Capacity(CapacityLife::default()));

        let cfg = EngineConfig::default()
            .overlay_json(r#"{ "life": { "max_days": 180 } }"#)
            .unwrap();
        match cfg.life {
            LifeModel::Capacity(c) => {
                assert_eq!(c.max_days, 180.0);
                assert_eq!(c.default_media_mass_g, 3000.0);
            }
            other => panic!("expected capacity model, got {other:?}"),
        }
    }

    #[test]
    fn negative_risk_weight_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "risk": { "turbidity": -0.4 } }"#);
        assert!(matches!(err, Err(PredictorError::InvalidConfig(_))));
        for field in ["load", "ph", "flow"] {
            let raw = format!(r#"{{ "risk": {{ "{field}": -0.1 }} }}"#);
            assert!(EngineConfig::from_json_str(&raw).is_err(), "{field}");
        }
    }

    #[test]
    fn negative_life_parameters_are_rejected() {
        let kit = EngineConfig::field_kit();
        assert!(kit.overlay_json(r#"{ "life": { "load_weight": -0.3 } }"#).is_err());
        assert!(kit.overlay_json(r#"{ "life": { "turbidity_weight": -1 } }"#).is_err());
        let column = EngineConfig::column_sorption();
        assert!(column
            .overlay_json(r#"{ "life": { "default_media_mass_g": -5 } }"#)
            .is_err());
        assert!(column
            .overlay_json(r#"{ "life": { "default_capacity_mg_per_g": -1 } }"#)
            .is_err());
    }

    #[test]
    fn unknown_preset() {
        assert!(EngineConfig::preset("column").is_some());
        assert!(EngineConfig::preset("field-kit").is_some());
        assert!(EngineConfig::preset("nope").is_none());
    }
}
