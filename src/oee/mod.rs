mod calculator;
mod report;
mod types;

pub use calculator::{availability, calculate_all, effectiveness, efficiency, quality};
pub use report::{improvement_suggestions, render_report, render_report_at, render_summary};
pub use types::{EffectivenessStatus, InputError, MeasurementInput, OeeResult};
