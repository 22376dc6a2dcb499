//! Ratio formulas. Every function saturates out-of-range input instead of
//! failing: a zero or negative denominator yields 0 and results are clamped
//! to `[0, 1]`.

use super::types::{MeasurementInput, OeeResult};

fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// `(total_time - downtime) / total_time`.
pub fn availability(total_time: f64, downtime: f64) -> f64 {
    if total_time <= 0.0 {
        return 0.0;
    }
    clamp_ratio((total_time - downtime) / total_time)
}

/// Actual throughput over ideal throughput, i.e.
/// `(completed / total_time) / (1 / ideal_time_per_unit)`.
pub fn efficiency(completed: u64, total_time: f64, ideal_time_per_unit: f64) -> f64 {
    if total_time <= 0.0 || ideal_time_per_unit <= 0.0 {
        return 0.0;
    }
    clamp_ratio(completed as f64 * ideal_time_per_unit / total_time)
}

pub fn quality(total: u64, valid: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    clamp_ratio(valid as f64 / total as f64)
}

/// Plain product; inputs in `[0, 1]` keep the result in `[0, 1]`.
pub fn effectiveness(availability: f64, efficiency: f64, quality: f64) -> f64 {
    availability * efficiency * quality
}

pub fn calculate_all(input: &MeasurementInput) -> OeeResult {
    let availability = availability(input.total_time, input.downtime);
    let efficiency = efficiency(
        input.completed_simulations,
        input.total_time,
        input.ideal_time_per_simulation,
    );
    let quality = quality(input.total_simulations, input.valid_simulations);

    OeeResult {
        availability,
        efficiency,
        quality,
        effectiveness: effectiveness(availability, efficiency, quality),
    }
}
