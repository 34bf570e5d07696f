use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::Predictor;
use crate::error::PredictorError;
use crate::types::{PredictionResult, TrendPoint, WaterSample};

/// Serializable snapshot of one evaluation: inputs echoed back next to the
/// result and its trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    /// RFC 3339, UTC.
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    pub model: String,
    pub inputs: WaterSample,
    pub result: PredictionResult,
    pub trend: Vec<TrendPoint>,
}

impl PredictionReport {
    pub fn build(
        predictor: &Predictor,
        sample: WaterSample,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let result = predictor.predict(&sample);
        let trend = result.trend(sample.flow_l_per_day);
        Self {
            generated_at,
            sample_id: None,
            model: predictor.config().life.name().to_string(),
            inputs: sample,
            result,
            trend,
        }
    }

    pub fn now(predictor: &Predictor, sample: WaterSample) -> Self {
        Self::build(predictor, sample, Utc::now())
    }

    pub fn with_sample_id(mut self, id: impl Into<String>) -> Self {
        self.sample_id = Some(id.into());
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, PredictorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_line(&self) -> Result<String, PredictorError> {
        Ok(serde_json::to_string(self)?)
    }
}
