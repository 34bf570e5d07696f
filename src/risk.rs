use crate::config::EngineConfig;
use crate::penalty::clamp;
use crate::types::WaterSample;

/// Weighted stress terms over the baseline, projected onto [min, max].
pub fn risk_score(cfg: &EngineConfig, sample: &WaterSample) -> f64 {
    let w = &cfg.risk;
    let turb = clamp(
        (sample.turbidity_ntu - w.turbidity_baseline_ntu) / w.turbidity_span_ntu,
        0.0,
        1.0,
    );
    let load = clamp(sample.load_mg_l() / w.load_ref_mg_l, 0.0, 1.0);
    let ph = clamp((sample.ph - cfg.ph_target).abs() / w.ph_span, 0.0, 1.0);
    let flow = clamp(sample.flow_l_per_day / w.flow_ref_l_per_day, 0.0, 1.0);

    let raw = w.baseline + w.turbidity * turb + w.load * load + w.ph * ph + w.flow * flow;
    clamp(raw, w.min, w.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_water_sits_at_floor() {
        let cfg = EngineConfig::default();
        assert_eq!(risk_score(&cfg, &WaterSample::default()), 0.05);
    }

    #[test]
    fn worst_case_hits_ceiling() {
        let cfg = EngineConfig::default();
        let s = WaterSample::new(1.0, 1.0, 2.0, 4000.0, 20_000.0);
        assert_eq!(risk_score(&cfg, &s), 0.95);
    }

    #[test]
    fn flow_ignored_when_weight_zero() {
        let cfg = EngineConfig::field_kit();
        let a = WaterSample::new(0.05, 0.05, 7.0, 200.0, 0.0);
        let b = WaterSample { flow_l_per_day: 9000.0, ..a };
        assert_eq!(risk_score(&cfg, &a), risk_score(&cfg, &b));
    }

    #[test]
    fn turbidity_raises_risk() {
        let cfg = EngineConfig::default();
        let lo = risk_score(&cfg, &WaterSample::new(0.01, 0.01, 7.5, 100.0, 500.0));
        let hi = risk_score(&cfg, &WaterSample::new(0.01, 0.01, 7.5, 600.0, 500.0));
        assert!(hi > lo);
    }
}
