use super::*;

/// Opens the token store named by `dsn` and verifies it answers.
pub(super) fn open_store(dsn: &str) -> ImportResult<Connection> {
    let connection = Connection::open_with_flags(
        dsn,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(ImportError::Open)?;

    configure_connection(&connection).map_err(ImportError::Open)?;
    ping(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> rusqlite::Result<()> {
    connection.pragma_update(None, "journal_mode", "WAL")?;
    connection.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

pub(super) fn ping(connection: &Connection) -> ImportResult<()> {
    connection
        .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map_err(ImportError::Ping)?;
    Ok(())
}

pub(super) fn ensure_token_table(tx: &Transaction<'_>) -> ImportResult<()> {
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS tokens (token CHAR({TOKEN_LEN}) PRIMARY KEY)"
    ))
    .map_err(ImportError::Schema)
}
