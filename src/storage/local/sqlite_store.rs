use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OpenFlags};

use crate::errors::StorageError;
use crate::storage::area::StorageArea;

/// SQLite-backed synchronous storage area.
///
/// One file can hold the areas of several origins; each area only sees the rows of
/// its own origin.
pub struct SqliteArea {
    pool: Pool<SqliteConnectionManager>,
    origin: String,
}

impl SqliteArea {
    /// Opens (or creates) the database at `path` and returns the area for `origin`.
    pub fn open<P: AsRef<Path>>(path: P, origin: &str) -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE |
                    OpenFlags::SQLITE_OPEN_CREATE |
                    OpenFlags::SQLITE_OPEN_URI
            )
            .with_init(|c| {
                c.busy_timeout(Duration::from_millis(500))?;
                c.pragma_update(None, "journal_mode", "WAL")?;
                c.execute_batch(
                    "CREATE TABLE IF NOT EXISTS local_storage (
                        origin TEXT NOT NULL,
                        key TEXT NOT NULL,
                        value TEXT NOT NULL,
                        updated_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
                        PRIMARY KEY(origin, key)
                    );"
                )?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(4)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        Ok(Self { pool, origin: origin.to_string() })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        Ok(self.pool.get()?)
    }
}

impl StorageArea for SqliteArea {
    fn get_item(&self, key: &str) -> Option<String> {
        let conn = self.conn().ok()?;
        conn.query_row(
            "SELECT value FROM local_storage WHERE origin=?1 AND key=?2",
            params![self.origin, key],
            |row| row.get::<_, String>(0),
        ).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO local_storage(origin,key,value) VALUES (?1,?2,?3)
             ON CONFLICT(origin,key) DO UPDATE
             SET value=excluded.value, updated_at=strftime('%s','now')",
            params![self.origin, key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM local_storage WHERE origin=?1 AND key=?2",
            params![self.origin, key],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM local_storage WHERE origin=?1",
            params![self.origin],
        )?;
        Ok(())
    }

    fn len(&self) -> usize {
        let conn = match self.conn() { Ok(c) => c, Err(_) => return 0 };
        conn.query_row::<u32, _, _>(
            "SELECT COUNT(*) FROM local_storage WHERE origin=?1",
            params![self.origin],
            |row| row.get(0),
        ).unwrap_or(0) as usize
    }

    fn keys(&self) -> Vec<String> {
        let conn = match self.conn() { Ok(c) => c, Err(_) => return vec![] };
        let mut stmt = match conn.prepare(
            "SELECT key FROM local_storage WHERE origin=?1 ORDER BY key",
        ) { Ok(s) => s, Err(_) => return vec![] };

        let rows = match stmt.query_map(params![self.origin], |row| row.get::<_, String>(0)) {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        rows.filter_map(Result::ok).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.db");

        {
            let area = SqliteArea::open(&path, "file:///index.html").unwrap();
            area.set_item("photo:hero", "data:image/png;base64,AAA").unwrap();
            area.set_item("editable-greeting", "Hello").unwrap();
            area.set_item("editable-greeting", "Hello again").unwrap();
        }

        let area = SqliteArea::open(&path, "file:///index.html").unwrap();
        assert_eq!(area.len(), 2);
        assert_eq!(area.get_item("editable-greeting").as_deref(), Some("Hello again"));
        assert_eq!(
            area.keys(),
            vec!["editable-greeting".to_string(), "photo:hero".to_string()]
        );
    }

    #[test]
    fn origins_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.db");

        let a = SqliteArea::open(&path, "https://a.test").unwrap();
        let b = SqliteArea::open(&path, "https://b.test").unwrap();
        a.set_item("k", "v").unwrap();

        assert!(b.get_item("k").is_none());
        b.clear().unwrap();
        assert_eq!(a.get_item("k").as_deref(), Some("v"));

        a.remove_item("k").unwrap();
        assert_eq!(a.len(), 0);
    }
}
