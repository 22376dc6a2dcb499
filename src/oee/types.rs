use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw measurements for one run of a process. Times are in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementInput {
    pub total_time: f64,
    pub downtime: f64,
    pub completed_simulations: u64,
    pub ideal_time_per_simulation: f64,
    pub total_simulations: u64,
    pub valid_simulations: u64,
}

/// Rejections produced by [`MeasurementInput::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("total time must be positive (got {0})")]
    NonPositiveTotalTime(f64),

    #[error("ideal time per simulation must be positive (got {0})")]
    NonPositiveIdealTime(f64),

    #[error("total simulations must be positive")]
    NoSimulations,

    #[error("downtime must not be negative (got {0})")]
    NegativeDowntime(f64),

    #[error("downtime ({downtime}) cannot exceed total time ({total_time})")]
    DowntimeExceedsTotal { downtime: f64, total_time: f64 },

    #[error("valid simulations ({valid}) cannot exceed total simulations ({total})")]
    ValidExceedsTotal { valid: u64, total: u64 },
}

impl MeasurementInput {
    /// Stricter checks for callers that want to reject suspicious input
    /// instead of letting the calculator saturate it.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.total_time <= 0.0 {
            return Err(InputError::NonPositiveTotalTime(self.total_time));
        }
        if self.ideal_time_per_simulation <= 0.0 {
            return Err(InputError::NonPositiveIdealTime(
                self.ideal_time_per_simulation,
            ));
        }
        if self.total_simulations == 0 {
            return Err(InputError::NoSimulations);
        }
        if self.downtime < 0.0 {
            return Err(InputError::NegativeDowntime(self.downtime));
        }
        if self.downtime > self.total_time {
            return Err(InputError::DowntimeExceedsTotal {
                downtime: self.downtime,
                total_time: self.total_time,
            });
        }
        if self.valid_simulations > self.total_simulations {
            return Err(InputError::ValidExceedsTotal {
                valid: self.valid_simulations,
                total: self.total_simulations,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OeeResult {
    pub availability: f64,
    pub efficiency: f64,
    pub quality: f64,
    pub effectiveness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectivenessStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl EffectivenessStatus {
    pub fn from_effectiveness(effectiveness: f64) -> Self {
        if effectiveness >= 0.85 {
            EffectivenessStatus::Excellent
        } else if effectiveness >= 0.70 {
            EffectivenessStatus::Good
        } else if effectiveness >= 0.60 {
            EffectivenessStatus::Fair
        } else {
            EffectivenessStatus::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectivenessStatus::Excellent => "EXCELLENT",
            EffectivenessStatus::Good => "GOOD",
            EffectivenessStatus::Fair => "FAIR",
            EffectivenessStatus::Poor => "POOR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EffectivenessStatus::Excellent => "World-class computational efficiency",
            EffectivenessStatus::Good => "Typical computational performance",
            EffectivenessStatus::Fair => "Room for optimization",
            EffectivenessStatus::Poor => "Significant optimization needed",
        }
    }
}
