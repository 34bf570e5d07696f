use cybo_water_predictor::{EngineConfig, Predictor, WaterSample};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn sample() -> impl Strategy<Value = WaterSample> {
    (
        0.0_f64..2.0,
        0.0_f64..2.0,
        0.0_f64..14.0,
        0.0_f64..3000.0,
        0.0_f64..10_000.0,
    )
        .prop_map(|(pb, ars, ph, ntu, flow)| WaterSample::new(pb, ars, ph, ntu, flow))
}

fn presets() -> impl Strategy<Value = EngineConfig> {
    prop_oneof![
        Just(EngineConfig::column_sorption()),
        Just(EngineConfig::field_kit()),
    ]
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn removal_stays_in_band(cfg in presets(), s in sample()) {
        let p = Predictor::new(cfg.clone()).unwrap();
        let r = p.predict(&s);
        prop_assert!(r.lead_removal >= cfg.lead.floor && r.lead_removal <= cfg.lead.ceiling);
        prop_assert!(r.arsenic_removal >= cfg.arsenic.floor && r.arsenic_removal <= cfg.arsenic.ceiling);
        prop_assert!(r.risk_score >= 0.05 && r.risk_score <= 0.95);
    }

    #[test]
    fn outlet_rises_as_removal_falls(s in sample(), extra in 0.0_f64..3000.0) {
        let p = Predictor::default();
        let clear = p.predict(&s);
        let murky = p.predict(&WaterSample { turbidity_ntu: s.turbidity_ntu + extra, ..s });
        prop_assert!(murky.lead_removal <= clear.lead_removal);
        prop_assert!(murky.lead_out_mg_l >= clear.lead_out_mg_l);
        prop_assert!(murky.arsenic_out_mg_l >= clear.arsenic_out_mg_l);
    }

    #[test]
    fn risk_monotone_in_turbidity(cfg in presets(), s in sample(), extra in 0.0_f64..3000.0) {
        let p = Predictor::new(cfg).unwrap();
        let lo = p.predict(&s).risk_score;
        let hi = p.predict(&WaterSample { turbidity_ntu: s.turbidity_ntu + extra, ..s }).risk_score;
        prop_assert!(hi >= lo);
    }

    #[test]
    fn capacity_life_not_increasing_in_flow(s in sample(), extra in 0.0_f64..10_000.0) {
        let p = Predictor::default();
        let base = p.predict(&s).life_days;
        let more = p.predict(&WaterSample { flow_l_per_day: s.flow_l_per_day + extra, ..s }).life_days;
        prop_assert!(more <= base);
        prop_assert!((0.0..=365.0).contains(&more));
    }

    #[test]
    fn advice_is_reproducible(cfg in presets(), s in sample()) {
        let p = Predictor::new(cfg).unwrap();
        let a = p.predict(&s);
        let b = p.predict(&s);
        prop_assert_eq!(a.recommendations.len(), 4);
        prop_assert_eq!(a, b);
    }
}
