use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Local, TimeZone};

use super::types::{EffectivenessStatus, OeeResult};

const AVAILABILITY_TARGET: f64 = 0.90;
const EFFICIENCY_TARGET: f64 = 0.95;
const QUALITY_TARGET: f64 = 0.99;

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// One line per factor that is below its target.
pub fn improvement_suggestions(result: &OeeResult) -> Vec<&'static str> {
    let mut suggestions = Vec::new();
    if result.availability < AVAILABILITY_TARGET {
        suggestions.push("Availability: Optimize resource allocation and reduce system downtime");
    }
    if result.efficiency < EFFICIENCY_TARGET {
        suggestions.push("Efficiency: Optimize algorithms and computational efficiency");
    }
    if result.quality < QUALITY_TARGET {
        suggestions.push("Quality: Improve model validation and error handling");
    }
    suggestions
}

pub fn render_report(result: &OeeResult, process_name: &str) -> String {
    render_report_at(result, process_name, Local::now())
}

pub fn render_report_at<Tz>(result: &OeeResult, process_name: &str, generated_at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let status = EffectivenessStatus::from_effectiveness(result.effectiveness);

    // Writing into a String cannot fail.
    let mut out = String::new();
    let _ = writeln!(out, "OEE REPORT - {process_name}");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{}\n", "=".repeat(50));

    let _ = writeln!(out, "Availability (A): {}", percent(result.availability));
    let _ = writeln!(out, "Efficiency (B): {}", percent(result.efficiency));
    let _ = writeln!(out, "Quality (C): {}", percent(result.quality));
    let _ = writeln!(out, "{}", "=".repeat(30));
    let _ = writeln!(out, "Overall Effectiveness (Z): {}\n", percent(result.effectiveness));

    let _ = writeln!(out, "Status: {} - {}", status.as_str(), status.description());

    let _ = writeln!(out, "\nAreas for Improvement:");
    for suggestion in improvement_suggestions(result) {
        let _ = writeln!(out, "- {suggestion}");
    }

    out
}

/// Summary over several stored runs, fed by `db::average`.
pub fn render_summary(
    process_name: &str,
    days: i64,
    runs: usize,
    averages: &BTreeMap<String, f64>,
) -> String {
    let avg = |field: &str| averages.get(field).copied().unwrap_or(0.0);

    let mut out = String::new();
    let _ = writeln!(out, "OEE REPORT - {process_name}");
    let _ = writeln!(out, "Data from the last {days} days");
    let _ = writeln!(out, "Number of simulation runs: {runs}");
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out, "Average Availability: {}", percent(avg("availability")));
    let _ = writeln!(out, "Average Efficiency: {}", percent(avg("efficiency")));
    let _ = writeln!(out, "Average Quality: {}", percent(avg("quality")));
    let _ = writeln!(out, "{}", "=".repeat(30));
    let _ = writeln!(out, "Average Effectiveness: {}", percent(avg("effectiveness")));
    out
}
