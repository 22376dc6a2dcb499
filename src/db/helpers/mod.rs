use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Accepts RFC 3339, and naive ISO-8601 timestamps (read as UTC) written
/// by older tooling.
pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .with_context(|| format!("failed to parse {field} '{value}'"))
}

pub fn parse_payload(value: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(value).context("payload is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("payload is not a JSON object: {other}")),
    }
}
