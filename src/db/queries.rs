use rusqlite::{params, Connection, OptionalExtension};

// ── Preferences ──

pub fn get_preference(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM preferences WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_preference(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_preference(conn: &Connection, key: &str) -> rusqlite::Result<bool> {
    let deleted = conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_preference_upsert() {
        let conn = db::init_db(":memory:").unwrap();
        assert_eq!(get_preference(&conn, "cookieConsent").unwrap(), None);

        set_preference(&conn, "cookieConsent", "accepted").unwrap();
        set_preference(&conn, "cookieConsent", "declined").unwrap();
        assert_eq!(
            get_preference(&conn, "cookieConsent").unwrap().as_deref(),
            Some("declined")
        );

        assert!(delete_preference(&conn, "cookieConsent").unwrap());
        assert!(!delete_preference(&conn, "cookieConsent").unwrap());
    }
}
