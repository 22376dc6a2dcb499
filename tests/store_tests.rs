use chrono::{Duration, TimeZone, Utc};
use oee_tracker_lib::{
    db::{average, Database, NewRecord, StoreError, AVERAGED_FIELDS},
    oee::{calculate_all, MeasurementInput},
};
use rusqlite::{params, Connection};
use tempfile::{tempdir, TempDir};

fn open_store() -> (TempDir, Database) {
    let dir = tempdir().unwrap();
    let db = Database::new(dir.path().join("records.sqlite3")).unwrap();
    (dir, db)
}

fn input(valid: u64) -> MeasurementInput {
    MeasurementInput {
        total_time: 480.0,
        downtime: 48.0,
        completed_simulations: 102,
        ideal_time_per_simulation: 4.0,
        total_simulations: 102,
        valid_simulations: valid,
    }
}

fn new_record(process: &str, valid: u64) -> NewRecord {
    let input = input(valid);
    NewRecord::new(process, input, calculate_all(&input))
}

#[tokio::test]
async fn test_create_store() {
    let (dir, db) = open_store();
    assert!(dir.path().join("records.sqlite3").exists());
    assert_eq!(db.count_records().await.unwrap(), 0);
}

#[tokio::test]
async fn test_append_and_lookup_by_id() {
    let (_dir, db) = open_store();
    let id = db
        .append(new_record("Model-A", 97).with_notes("first run"))
        .await
        .unwrap();

    let record = db.get_record(&id).await.unwrap().expect("record exists");
    assert_eq!(record.id, id);
    assert_eq!(record.process_name, "Model-A");
    assert_eq!(record.notes.as_deref(), Some("first run"));
    assert_eq!(record.measurement(), Some(input(97)));
    assert_eq!(record.result(), Some(calculate_all(&input(97))));

    assert!(db.get_record("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_window_includes_recent_and_excludes_expired() {
    let (_dir, db) = open_store();
    let saved_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let id = db
        .append(new_record("Model-A", 97).with_created_at(saved_at))
        .await
        .unwrap();

    let one_hour_later = saved_at + Duration::hours(1);
    let records = db
        .list_by_at(Some("Model-A"), Duration::days(1), 10, one_hour_later)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);

    let two_days_later = saved_at + Duration::days(2);
    let records = db
        .list_by_at(Some("Model-A"), Duration::days(1), 10, two_days_later)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_window_boundary_is_inclusive() {
    let (_dir, db) = open_store();
    let saved_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    db.append(new_record("Model-A", 97).with_created_at(saved_at))
        .await
        .unwrap();

    let records = db
        .list_by_at(Some("Model-A"), Duration::days(1), 10, saved_at + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_name_filter_is_exact() {
    let (_dir, db) = open_store();
    db.append(new_record("Model-A", 97)).await.unwrap();
    db.append(new_record("Model-AB", 97)).await.unwrap();
    db.append(new_record("model-a", 97)).await.unwrap();

    let records = db.list_by(Some("Model-A"), Duration::days(1), 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].process_name, "Model-A");
}

#[tokio::test]
async fn test_all_processes_newest_first_and_limited() {
    let (_dir, db) = open_store();
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    for (offset, process) in [(1, "Model-A"), (3, "Model-B"), (2, "Model-C"), (4, "Model-A")] {
        db.append(new_record(process, 97).with_created_at(base + Duration::hours(offset)))
            .await
            .unwrap();
    }

    let now = base + Duration::hours(5);
    let records = db.list_by_at(None, Duration::days(1), 3, now).await.unwrap();
    let order: Vec<(&str, i64)> = records
        .iter()
        .map(|r| (r.process_name.as_str(), (r.created_at - base).num_hours()))
        .collect();
    assert_eq!(order, vec![("Model-A", 4), ("Model-B", 3), ("Model-C", 2)]);
}

#[tokio::test]
async fn test_timestamp_ties_keep_later_save_first() {
    let (_dir, db) = open_store();
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let first = db
        .append(new_record("Model-A", 90).with_created_at(at))
        .await
        .unwrap();
    let second = db
        .append(new_record("Model-A", 91).with_created_at(at))
        .await
        .unwrap();

    let records = db
        .list_by_at(Some("Model-A"), Duration::days(1), 10, at)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, second);
    assert_eq!(records[1].id, first);
}

#[tokio::test]
async fn test_corrupt_rows_are_skipped() {
    let (dir, db) = open_store();
    let good = db.append(new_record("Model-A", 97)).await.unwrap();

    let conn = Connection::open(dir.path().join("records.sqlite3")).unwrap();
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO records (id, process_name, created_at, notes, payload) VALUES (?1, ?2, ?3, NULL, ?4)",
        params!["bad-time", "Model-A", "not a timestamp", "{}"],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO records (id, process_name, created_at, notes, payload) VALUES (?1, ?2, ?3, NULL, ?4)",
        params!["bad-payload", "Model-A", now, "{truncated"],
    )
    .unwrap();
    drop(conn);

    let records = db.list_by(Some("Model-A"), Duration::days(1), 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, good);
    assert!(db.get_record("bad-payload").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_all_for_process() {
    let (_dir, db) = open_store();
    db.append(new_record("Model-A", 97)).await.unwrap();
    db.append(new_record("Model-A", 96)).await.unwrap();
    db.append(new_record("Model-B", 95)).await.unwrap();

    assert_eq!(db.delete_all_for("Model-A").await.unwrap(), 2);
    assert_eq!(db.delete_all_for("Model-A").await.unwrap(), 0);
    assert_eq!(db.list_process_names().await.unwrap(), vec!["Model-B".to_string()]);
}

#[tokio::test]
async fn test_delete_unknown_process_is_not_an_error() {
    let (_dir, db) = open_store();
    assert_eq!(db.delete_all_for("nonexistent").await.unwrap(), 0);
}

#[tokio::test]
async fn test_blank_process_name_gets_default() {
    let (_dir, db) = open_store();
    let id = db.append(new_record("  ", 97)).await.unwrap();
    let record = db.get_record(&id).await.unwrap().unwrap();
    assert_eq!(record.process_name, "Simulation Model");
}

#[tokio::test]
async fn test_padded_process_name_matches_exactly() {
    let (_dir, db) = open_store();
    let id = db.append(new_record(" Model-A ", 97)).await.unwrap();

    let records = db.list_by(Some(" Model-A "), Duration::days(1), 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].process_name, " Model-A ");
    assert!(db.list_by(Some("Model-A"), Duration::days(1), 10).await.unwrap().is_empty());

    assert_eq!(db.delete_all_for("Model-A").await.unwrap(), 0);
    assert_eq!(db.delete_all_for(" Model-A ").await.unwrap(), 1);
    assert_eq!(db.count_records().await.unwrap(), 0);
}

#[tokio::test]
async fn test_window_past_representable_range_keeps_everything() {
    let (_dir, db) = open_store();
    let old = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
    db.append(new_record("Model-A", 97).with_created_at(old))
        .await
        .unwrap();
    db.append(new_record("Model-A", 96)).await.unwrap();

    let records = db
        .list_by_at(Some("Model-A"), Duration::days(1_000_000_000), 10, Utc::now())
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].created_at, old);
}

#[tokio::test]
async fn test_failed_append_is_a_storage_error() {
    let (dir, db) = open_store();
    db.append(new_record("Model-A", 97)).await.unwrap();

    let conn = Connection::open(dir.path().join("records.sqlite3")).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_insert BEFORE INSERT ON records
         BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
    )
    .unwrap();
    drop(conn);

    let result = db.append(new_record("Model-A", 96)).await;
    assert!(matches!(result, Err(StoreError::Storage(_))), "{result:?}");
    assert_eq!(db.count_records().await.unwrap(), 1);
}

#[tokio::test]
async fn test_failed_delete_is_a_storage_error() {
    let (dir, db) = open_store();
    db.append(new_record("Model-A", 97)).await.unwrap();

    let conn = Connection::open(dir.path().join("records.sqlite3")).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_delete BEFORE DELETE ON records
         BEGIN SELECT RAISE(ABORT, 'read-only medium'); END;",
    )
    .unwrap();
    drop(conn);

    let result = db.delete_all_for("Model-A").await;
    assert!(matches!(result, Err(StoreError::Storage(_))), "{result:?}");
    assert_eq!(db.count_records().await.unwrap(), 1);
}

#[tokio::test]
async fn test_latest_and_history() {
    let (_dir, db) = open_store();
    let now = Utc::now();
    db.append(new_record("Model-A", 90).with_created_at(now - Duration::days(40)))
        .await
        .unwrap();
    db.append(new_record("Model-A", 95).with_created_at(now - Duration::days(2)))
        .await
        .unwrap();
    let newest = db
        .append(new_record("Model-A", 97).with_created_at(now - Duration::hours(1)))
        .await
        .unwrap();

    let latest = db.latest_for("Model-A").await.unwrap().unwrap();
    assert_eq!(latest.id, newest);
    assert_eq!(db.process_history("Model-A").await.unwrap().len(), 2);
    assert!(db.latest_for("Model-Z").await.unwrap().is_none());
}

#[tokio::test]
async fn test_catalog_is_derived_from_store() {
    let (_dir, db) = open_store();
    db.append(new_record("Model-B", 97)).await.unwrap();
    db.append(new_record("Model-A", 97)).await.unwrap();

    let catalog = db.process_catalog(Some("Model-B")).await.unwrap();
    assert_eq!(catalog.available, vec!["Model-A".to_string(), "Model-B".to_string()]);
    assert!(catalog.is_current("Model-B"));

    db.delete_all_for("Model-B").await.unwrap();
    let catalog = db.process_catalog(Some("Model-B")).await.unwrap();
    assert_eq!(catalog.current.as_deref(), Some("Model-A"));
}

#[tokio::test]
async fn test_average_of_single_record_is_its_values() {
    let (_dir, db) = open_store();
    db.append(new_record("Model-A", 97)).await.unwrap();
    let records = db.list_by(Some("Model-A"), Duration::days(1), 10).await.unwrap();

    let averages = average(&records);
    assert_eq!(averages.len(), AVERAGED_FIELDS.len());
    for field in AVERAGED_FIELDS {
        assert_eq!(averages[field], records[0].value(field).unwrap());
    }
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.sqlite3");
    let id = {
        let db = Database::new(path.clone()).unwrap();
        db.append(new_record("Model-A", 97)).await.unwrap()
    };

    let db = Database::new(path).unwrap();
    assert!(db.get_record(&id).await.unwrap().is_some());
}
