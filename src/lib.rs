#![forbid(unsafe_code)]

//! Filter performance predictor for household arsenic/lead treatment units.
//!
//! A reading of the raw water (lead, arsenic, pH, turbidity, daily flow) goes
//! in; removal fractions, outlet concentrations, a risk score, remaining media
//! life and an ordered advice list come out. Everything is a pure function of
//! the sample and the [`EngineConfig`].

pub mod advice;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod life;
pub mod penalty;
pub mod report;
pub mod risk;
pub mod trend;
pub mod types;

pub use config::{
    AdviceThresholds, EngineConfig, Guidelines, PenaltyCurve, RemovalBand, RiskWeights,
};
pub use engine::{predict, Predictor};
pub use error::PredictorError;
pub use input::{coerce_reading, parse_batch_row, read_batch, sample_from_fields, BatchRow};
pub use life::{CapacityLife, HeuristicLife, LifeEstimate, LifeModel};
pub use report::PredictionReport;
pub use trend::{make_trend, TREND_DAYS};
pub use types::{
    Contaminant, PredictionResult, Recommendation, Severity, TrendPoint, WaterSample,
};
