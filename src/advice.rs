use crate::config::AdviceThresholds;
use crate::types::{Contaminant, Recommendation, Severity, WaterSample};

/// Outcome of the removal step that the advice rules look at.
#[derive(Debug, Clone, Copy)]
pub struct AdviceInputs {
    pub lead_out_mg_l: f64,
    pub arsenic_out_mg_l: f64,
    pub lead_compliant: bool,
    pub arsenic_compliant: bool,
    pub risk_score: f64,
}

pub fn turbidity_rule(t: &AdviceThresholds, sample: &WaterSample) -> Recommendation {
    let ntu = sample.turbidity_ntu;
    if ntu >= t.turbidity_bad_ntu {
        Recommendation::new(
            Severity::Bad,
            "Pre-filter required",
            format!("Turbidity {ntu:.0} NTU will clog the media; settle or sand-filter first."),
        )
    } else if ntu >= t.turbidity_warn_ntu {
        Recommendation::new(
            Severity::Warn,
            "Elevated turbidity",
            format!("Turbidity {ntu:.0} NTU shortens media life; consider a coarse pre-filter."),
        )
    } else {
        Recommendation::new(
            Severity::Ok,
            "Turbidity acceptable",
            format!("Turbidity {ntu:.0} NTU is within the working range."),
        )
    }
}

pub fn ph_rule(t: &AdviceThresholds, sample: &WaterSample) -> Recommendation {
    let ph = sample.ph;
    if ph < t.ph_low || ph > t.ph_high {
        Recommendation::new(
            Severity::Warn,
            "pH out of range",
            format!(
                "pH {ph:.2} is outside {:.1}-{:.1}; sorption efficiency drops.",
                t.ph_low, t.ph_high
            ),
        )
    } else {
        Recommendation::new(
            Severity::Ok,
            "pH in range",
            format!("pH {ph:.2} supports normal sorption."),
        )
    }
}

pub fn compliance_rule(out: &AdviceInputs) -> Recommendation {
    if out.lead_compliant && out.arsenic_compliant {
        return Recommendation::new(
            Severity::Ok,
            "Outlet meets guideline",
            format!(
                "Predicted outlet lead {:.4} mg/L, arsenic {:.4} mg/L.",
                out.lead_out_mg_l, out.arsenic_out_mg_l
            ),
        );
    }
    let mut failing = Vec::new();
    if !out.lead_compliant {
        failing.push(format!("{} {:.4} mg/L", Contaminant::Lead.label(), out.lead_out_mg_l));
    }
    if !out.arsenic_compliant {
        failing.push(format!(
            "{} {:.4} mg/L",
            Contaminant::Arsenic.label(),
            out.arsenic_out_mg_l
        ));
    }
    Recommendation::new(
        Severity::Bad,
        "Outlet exceeds guideline",
        format!(
            "Predicted outlet {} above limit; add a polishing stage or do not drink.",
            failing.join(", ")
        ),
    )
}

pub fn risk_rule(t: &AdviceThresholds, out: &AdviceInputs) -> Recommendation {
    let r = out.risk_score;
    if r >= t.risk_bad {
        Recommendation::new(
            Severity::Bad,
            "High operational risk",
            format!("Risk {r:.2}; test outlet water before use and plan media replacement."),
        )
    } else if r >= t.risk_warn {
        Recommendation::new(
            Severity::Warn,
            "Moderate operational risk",
            format!("Risk {r:.2}; increase monitoring frequency."),
        )
    } else {
        Recommendation::new(
            Severity::Ok,
            "Low operational risk",
            format!("Risk {r:.2}; routine monitoring is enough."),
        )
    }
}

/// Turbidity, pH, compliance, risk: always four records in that order.
pub fn recommendations(
    t: &AdviceThresholds,
    sample: &WaterSample,
    out: &AdviceInputs,
) -> Vec<Recommendation> {
    vec![
        turbidity_rule(t, sample),
        ph_rule(t, sample),
        compliance_rule(out),
        risk_rule(t, out),
    ]
}
