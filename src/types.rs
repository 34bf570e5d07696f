use serde::{Deserialize, Serialize};

use crate::trend::make_trend;

/// Raw water reading for one evaluation.
///
/// Concentrations are mg/L, turbidity is NTU, flow is L/day. Values are
/// expected to be non-negative; the engine does not check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterSample {
    pub lead_mg_l: f64,
    pub arsenic_mg_l: f64,
    pub ph: f64,
    pub turbidity_ntu: f64,
    pub flow_l_per_day: f64,
    /// Sorbent charge in the cartridge, grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_mass_g: Option<f64>,
    /// Sorption capacity, mg contaminant per g media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_capacity_mg_per_g: Option<f64>,
}

impl WaterSample {
    pub fn new(
        lead_mg_l: f64,
        arsenic_mg_l: f64,
        ph: f64,
        turbidity_ntu: f64,
        flow_l_per_day: f64,
    ) -> Self {
        Self {
            lead_mg_l,
            arsenic_mg_l,
            ph,
            turbidity_ntu,
            flow_l_per_day,
            media_mass_g: None,
            media_capacity_mg_per_g: None,
        }
    }

    pub fn with_media(mut self, mass_g: f64, capacity_mg_per_g: f64) -> Self {
        self.media_mass_g = Some(mass_g);
        self.media_capacity_mg_per_g = Some(capacity_mg_per_g);
        self
    }

    /// Combined lead + arsenic load, mg/L.
    pub fn load_mg_l(&self) -> f64 {
        self.lead_mg_l + self.arsenic_mg_l
    }

    pub fn inlet(&self, c: Contaminant) -> f64 {
        match c {
            Contaminant::Lead => self.lead_mg_l,
            Contaminant::Arsenic => self.arsenic_mg_l,
        }
    }
}

impl Default for WaterSample {
    fn default() -> Self {
        Self::new(0.0, 0.0, 7.5, 0.0, 0.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contaminant {
    Lead,
    Arsenic,
}

impl Contaminant {
    pub const ALL: [Contaminant; 2] = [Contaminant::Lead, Contaminant::Arsenic];

    pub fn label(self) -> &'static str {
        match self {
            Contaminant::Lead => "lead",
            Contaminant::Arsenic => "arsenic",
        }
    }
}

/// Advice severity, ordered from harmless to actionable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warn,
    Bad,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warn => "warn",
            Severity::Bad => "bad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

impl Recommendation {
    pub fn new(severity: Severity, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Everything derived from one [`WaterSample`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub lead_removal: f64,
    pub arsenic_removal: f64,
    pub lead_removal_pct: f64,
    pub arsenic_removal_pct: f64,
    pub lead_out_mg_l: f64,
    pub arsenic_out_mg_l: f64,
    pub lead_compliant: bool,
    pub arsenic_compliant: bool,
    /// Composite operational risk in [0.05, 0.95].
    pub risk_score: f64,
    pub life_days: f64,
    /// Only reported by the capacity-based life model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_treatable_volume_l: Option<f64>,
    pub recommendations: Vec<Recommendation>,
}

impl PredictionResult {
    pub fn removal(&self, c: Contaminant) -> f64 {
        match c {
            Contaminant::Lead => self.lead_removal,
            Contaminant::Arsenic => self.arsenic_removal,
        }
    }

    pub fn outlet(&self, c: Contaminant) -> f64 {
        match c {
            Contaminant::Lead => self.lead_out_mg_l,
            Contaminant::Arsenic => self.arsenic_out_mg_l,
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.lead_compliant && self.arsenic_compliant
    }

    /// Worst severity in the advice list.
    pub fn worst_severity(&self) -> Severity {
        self.recommendations
            .iter()
            .map(|r| r.severity)
            .max()
            .unwrap_or(Severity::Ok)
    }

    /// Trend for this result. Models without a treatable-volume figure use
    /// `life_days * daily_flow` as the cap.
    pub fn trend(&self, daily_flow: f64) -> Vec<TrendPoint> {
        let total = self
            .total_treatable_volume_l
            .unwrap_or(self.life_days * daily_flow);
        make_trend(self.life_days, daily_flow, total)
    }
}

/// One day of the capacity trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub day: u32,
    pub remaining_pct: f64,
    pub treated_volume_l: f64,
    pub breakthrough_probability: f64,
}
