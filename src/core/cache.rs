use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;

const SCHEMA_VERSION: &str = "1";

const CREATE_TABLES_SQL: &str = "
CREATE TABLE IF NOT EXISTS metadata (
  key TEXT PRIMARY KEY,
  value TEXT
);

CREATE TABLE IF NOT EXISTS checksums (
  path TEXT PRIMARY KEY,
  size INTEGER NOT NULL,
  mtime INTEGER NOT NULL,
  checksum TEXT NOT NULL
);
";

#[derive(Debug, Clone)]
pub struct CachedChecksum {
    pub path: String,
    pub size: u64,
    pub mtime: i64,
    pub checksum: String,
}

// Keyed by absolute path; an entry is only served while size and mtime match.
pub struct ChecksumCache {
    conn: Mutex<Connection>,
}

impl ChecksumCache {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLES_SQL)?;
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(ChecksumCache {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, path: &str, size: u64, mtime: i64) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare_cached(
            "SELECT checksum FROM checksums WHERE path = ?1 AND size = ?2 AND mtime = ?3",
        )?;
        let checksum = stmt
            .query_row(params![path, size as i64, mtime], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(checksum)
    }

    pub fn put_all(&self, entries: &[CachedChecksum]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO checksums (path, size, mtime, checksum)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(path) DO UPDATE SET
                   size = excluded.size,
                   mtime = excluded.mtime,
                   checksum = excluded.checksum",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.path,
                    entry.size as i64,
                    entry.mtime,
                    entry.checksum
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM checksums", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, size: u64, mtime: i64, checksum: &str) -> CachedChecksum {
        CachedChecksum {
            path: path.to_string(),
            size,
            mtime,
            checksum: checksum.to_string(),
        }
    }

    #[test]
    fn test_hit_requires_same_size_and_mtime() {
        let cache = ChecksumCache::in_memory().unwrap();
        cache.put_all(&[entry("/p/a", 10, 100, "aaa")]).unwrap();

        assert_eq!(cache.get("/p/a", 10, 100).unwrap().as_deref(), Some("aaa"));
        assert_eq!(cache.get("/p/a", 11, 100).unwrap(), None);
        assert_eq!(cache.get("/p/a", 10, 101).unwrap(), None);
        assert_eq!(cache.get("/p/b", 10, 100).unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let cache = ChecksumCache::in_memory().unwrap();
        cache.put_all(&[entry("/p/a", 1, 1, "old")]).unwrap();
        cache.put_all(&[entry("/p/a", 2, 2, "new")]).unwrap();

        assert_eq!(cache.len().unwrap(), 1);
        assert_eq!(cache.get("/p/a", 2, 2).unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("cache.db");
        {
            let cache = ChecksumCache::open(&db).unwrap();
            cache.put_all(&[entry("/p/a", 1, 1, "sum")]).unwrap();
        }
        let cache = ChecksumCache::open(&db).unwrap();
        assert_eq!(cache.get("/p/a", 1, 1).unwrap().as_deref(), Some("sum"));
    }
}
