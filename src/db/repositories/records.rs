use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    helpers::{parse_datetime, parse_payload},
    models::{NewRecord, ProcessCatalog, Record},
    Database, StoreError,
};

/// Look-back window used by the history and latest-record views.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_LIMIT: usize = 100;

fn row_to_record(row: &Row) -> Result<Record> {
    let created_at: String = row.get("created_at")?;
    let payload: String = row.get("payload")?;

    Ok(Record {
        id: row.get("id")?,
        process_name: row.get("process_name")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        notes: row.get("notes")?,
        fields: parse_payload(&payload)?,
    })
}

/// Corrupt rows are logged and dropped so one bad record cannot hide the rest.
fn collect_records(rows: &mut rusqlite::Rows<'_>) -> Result<Vec<Record>, StoreError> {
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        match row_to_record(row) {
            Ok(record) => records.push(record),
            Err(err) => {
                let id: String = row.get("id").unwrap_or_else(|_| "<unknown>".into());
                warn!("Skipping corrupt record {id}: {err:#}");
            }
        }
    }
    Ok(records)
}

impl Database {
    /// Persist a record and return its generated identifier.
    pub async fn append(&self, record: NewRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let process_name = record.resolved_process_name();
        let created_at = record.created_at.unwrap_or_else(Utc::now);
        let payload = record.payload_json()?;
        let notes = record.notes;

        let record_id = id.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO records (id, process_name, created_at, notes, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record_id,
                    process_name,
                    created_at.to_rfc3339(),
                    notes,
                    payload,
                ],
            )?;
            info!("Saved record {record_id} for process '{process_name}'");
            Ok(())
        })
        .await?;

        Ok(id)
    }

    pub async fn get_record(&self, id: &str) -> Result<Option<Record>, StoreError> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, process_name, created_at, notes, payload
                 FROM records
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![id])?;
            Ok(collect_records(&mut rows)?.into_iter().next())
        })
        .await
    }

    /// Records created within `since` of now, newest first, at most `limit`.
    pub async fn list_by(
        &self,
        process_name: Option<&str>,
        since: Duration,
        limit: usize,
    ) -> Result<Vec<Record>, StoreError> {
        self.list_by_at(process_name, since, limit, Utc::now()).await
    }

    /// [`Database::list_by`] against an explicit clock.
    pub async fn list_by_at(
        &self,
        process_name: Option<&str>,
        since: Duration,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Record>, StoreError> {
        let process_name = process_name.map(str::to_owned);
        let mut records = self
            .execute(move |conn| {
                // rowid order breaks created_at ties in favour of the later save.
                let mut stmt = match process_name {
                    Some(_) => conn.prepare(
                        "SELECT id, process_name, created_at, notes, payload
                         FROM records
                         WHERE process_name = ?1
                         ORDER BY rowid DESC",
                    )?,
                    None => conn.prepare(
                        "SELECT id, process_name, created_at, notes, payload
                         FROM records
                         ORDER BY rowid DESC",
                    )?,
                };
                let mut rows = match &process_name {
                    Some(name) => stmt.query(params![name])?,
                    None => stmt.query([])?,
                };
                collect_records(&mut rows)
            })
            .await?;

        // A window reaching before the earliest representable time keeps everything.
        if let Some(cutoff) = now.checked_sub_signed(since) {
            records.retain(|record| record.created_at >= cutoff);
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    pub async fn latest_for(&self, process_name: &str) -> Result<Option<Record>, StoreError> {
        let records = self
            .list_by(Some(process_name), Duration::days(DEFAULT_WINDOW_DAYS), 1)
            .await?;
        if records.is_empty() {
            info!("No records found for process '{process_name}'");
        }
        Ok(records.into_iter().next())
    }

    pub async fn process_history(&self, process_name: &str) -> Result<Vec<Record>, StoreError> {
        self.list_by(
            Some(process_name),
            Duration::days(DEFAULT_WINDOW_DAYS),
            DEFAULT_LIMIT,
        )
        .await
    }

    /// Remove every record of `process_name`. Unknown names delete nothing.
    pub async fn delete_all_for(&self, process_name: &str) -> Result<usize, StoreError> {
        let process_name = process_name.to_string();
        self.execute(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM records WHERE process_name = ?1",
                params![process_name],
            )?;
            info!("Deleted {deleted} records for process '{process_name}'");
            Ok(deleted)
        })
        .await
    }

    pub async fn list_process_names(&self) -> Result<Vec<String>, StoreError> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT process_name FROM records ORDER BY process_name ASC",
            )?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(names)
        })
        .await
    }

    pub async fn process_catalog(&self, preferred: Option<&str>) -> Result<ProcessCatalog, StoreError> {
        let available = self.list_process_names().await?;
        Ok(ProcessCatalog::new(available, preferred))
    }

    pub async fn count_records(&self) -> Result<usize, StoreError> {
        self.execute(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
        .await
    }
}
