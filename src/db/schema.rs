use rusqlite::Connection;

/// Creates the records table and its indexes when they are missing.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(include_str!("schema.sql"))
}
