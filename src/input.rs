//! Caller-side input handling: form/CSV text to [`WaterSample`].
//!
//! The engine does not validate, so anything unusable is coerced to 0 here.

use std::io::BufRead;

use tracing::{info, warn};

use crate::error::PredictorError;
use crate::types::WaterSample;

/// Parse one reading. Non-numeric, non-finite and negative values become 0.
pub fn coerce_reading(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

fn optional_reading(raw: Option<&str>) -> Option<f64> {
    match raw.map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(coerce_reading(s)),
    }
}

/// Build a sample from raw text fields, in the order
/// lead, arsenic, pH, turbidity, flow, and optionally media mass and
/// media capacity.
pub fn sample_from_fields(
    lead: &str,
    arsenic: &str,
    ph: &str,
    turbidity: &str,
    flow: &str,
    media_mass: Option<&str>,
    media_capacity: Option<&str>,
) -> WaterSample {
    WaterSample {
        lead_mg_l: coerce_reading(lead),
        arsenic_mg_l: coerce_reading(arsenic),
        ph: coerce_reading(ph),
        turbidity_ntu: coerce_reading(turbidity),
        flow_l_per_day: coerce_reading(flow),
        media_mass_g: optional_reading(media_mass),
        media_capacity_mg_per_g: optional_reading(media_capacity),
    }
}

/// One parsed batch line.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub line: usize,
    pub sample_id: String,
    pub sample: WaterSample,
}

/// `sample_id,lead,arsenic,ph,turbidity,flow[,media_mass,media_capacity]`,
/// no quoting or embedded commas.
pub fn parse_batch_row(line_no: usize, line: &str) -> Result<BatchRow, PredictorError> {
    let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if parts.len() < 6 {
        return Err(PredictorError::Csv {
            line: line_no,
            reason: "expected at least 6 columns",
        });
    }
    if parts.len() > 8 {
        return Err(PredictorError::Csv {
            line: line_no,
            reason: "expected at most 8 columns",
        });
    }
    let sample = sample_from_fields(
        parts[1],
        parts[2],
        parts[3],
        parts[4],
        parts[5],
        parts.get(6).copied(),
        parts.get(7).copied(),
    );
    Ok(BatchRow {
        line: line_no,
        sample_id: parts[0].to_string(),
        sample,
    })
}

/// Read a batch file. The first line is a header; blank lines are skipped.
pub fn read_batch<R: BufRead>(reader: R) -> Result<Vec<BatchRow>, PredictorError> {
    let mut rows = Vec::new();
    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        if idx == 0 {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_batch_row(idx + 1, &line)?;
        if row.sample_id.is_empty() {
            warn!(line = row.line, "batch row has empty sample id");
        }
        rows.push(row);
    }
    info!(rows = rows.len(), "batch loaded");
    Ok(rows)
}
