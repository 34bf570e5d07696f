use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::types::WaterSample;

/// Clamp `x` into [lo, hi]. NaN collapses to `lo`.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() || x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// The clamped removal penalties for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Penalties {
    pub turbidity: f64,
    pub ph: f64,
    pub load: f64,
}

impl Penalties {
    pub fn evaluate(cfg: &EngineConfig, sample: &WaterSample) -> Self {
        let turbidity = cfg.turbidity_penalty.eval(sample.turbidity_ntu);
        let ph = cfg
            .ph_penalty
            .map(|p| p.eval((sample.ph - cfg.ph_target).abs()))
            .unwrap_or(0.0);
        let load = cfg
            .load_penalty
            .map(|p| p.eval(sample.load_mg_l()))
            .unwrap_or(0.0);
        Self { turbidity, ph, load }
    }

    pub fn total(&self) -> f64 {
        self.turbidity + self.ph + self.load
    }
}
