use crate::penalty::clamp;
use crate::types::TrendPoint;

pub const TREND_DAYS: u32 = 14;

/// Fourteen-day outlook.
///
/// Remaining capacity decays linearly with the elapsed fraction of the
/// predicted life, `100 * (1 - day / life_days)`, clamped to [0, 100].
/// Treated volume accumulates at `daily_flow` until `total_volume` is
/// reached. A non-positive life reports 0 % from day one.
pub fn make_trend(life_days: f64, daily_flow: f64, total_volume: f64) -> Vec<TrendPoint> {
    (1..=TREND_DAYS)
        .map(|day| {
            let d = f64::from(day);
            let remaining_pct = if life_days > 0.0 {
                clamp(100.0 * (1.0 - d / life_days), 0.0, 100.0)
            } else {
                0.0
            };
            TrendPoint {
                day,
                remaining_pct,
                treated_volume_l: (d * daily_flow).min(total_volume),
                breakthrough_probability: 1.0 - remaining_pct / 100.0,
            }
        })
        .collect()
}
