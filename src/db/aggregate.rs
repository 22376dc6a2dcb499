use std::collections::BTreeMap;

use super::models::Record;

/// Payload fields averaged by [`average`].
pub const AVERAGED_FIELDS: [&str; 10] = [
    "total_time",
    "downtime",
    "completed_simulations",
    "ideal_time_per_simulation",
    "total_simulations",
    "valid_simulations",
    "availability",
    "efficiency",
    "quality",
    "effectiveness",
];

/// Per-field arithmetic mean. Each field only counts the records where it is
/// present and numeric; a field no record carries averages to 0. An empty
/// record set yields an empty map.
pub fn average(records: &[Record]) -> BTreeMap<String, f64> {
    if records.is_empty() {
        return BTreeMap::new();
    }

    AVERAGED_FIELDS
        .iter()
        .map(|&field| {
            let (sum, count) = records
                .iter()
                .filter_map(|record| record.value(field))
                .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
            let mean = if count > 0 { sum / count as f64 } else { 0.0 };
            (field.to_string(), mean)
        })
        .collect()
}
