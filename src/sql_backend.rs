//! SQL-backed alternative storage for element type `f64`.
//!
//! A minority of embedders prefer an on-disk SQL engine over the raw
//! DataFile/IndexFile pair — e.g. when the process already links SQLite for
//! other state and wants one less storage mechanism to operate. This module
//! is a narrower sibling of [`crate::container::Container`]: single element
//! type (`f64`), append-only (`push_back`/`at` only, no `insert`/`remove_at`),
//! one table, one column, gated behind the `sql-backend` feature so the
//! default build never links `rusqlite`.

use crate::error::Result;
use rusqlite::Connection;
use tempfile::{Builder, TempPath};

/// An append-only, disk-backed sequence of `f64` stored as rows in a
/// dedicated SQLite table. Each instance owns a private database file with a
/// randomly suffixed name, removed when the instance is dropped.
pub struct SqlSequence {
    conn: Connection,
    db_path: TempPath,
}

impl SqlSequence {
    /// Open a fresh, private SQLite database under `dir` and create its
    /// single-column `Vector` table.
    pub fn new(dir: &std::path::Path) -> Result<Self> {
        // `tempfile` both picks a collision-free name and pre-creates the
        // file; SQLite is happy to open an existing empty file as a new db.
        let named = Builder::new()
            .prefix("HugeContainerData")
            .suffix(".db")
            .tempfile_in(dir)?;
        let db_path = named.into_temp_path();
        let conn = Connection::open(&db_path)?;
        conn.execute("CREATE TABLE Vector (value DOUBLE)", [])?;
        log::debug!(target: "huge-container", "SqlSequence::new db={:?}", db_path);
        Ok(Self { conn, db_path })
    }

    /// Append `value` as a new row; SQLite assigns it the next ROWID.
    pub fn push_back(&self, value: f64) -> Result<()> {
        self.conn
            .execute("INSERT INTO Vector (value) VALUES (?1)", [value])?;
        Ok(())
    }

    /// Fetch the element at zero-based `index`, mapped to SQLite's
    /// one-based ROWID (`ROWID = index + 1`).
    pub fn at(&self, index: u64) -> Result<f64> {
        let rowid = index as i64 + 1;
        let value = self.conn.query_row(
            "SELECT value FROM Vector WHERE ROWID = ?1",
            [rowid],
            |row| row.get(0),
        )?;
        Ok(value)
    }

    /// Number of rows currently in the table.
    pub fn size(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Vector", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl Drop for SqlSequence {
    fn drop(&mut self) {
        // The table drop is best-effort bookkeeping inside a db file that
        // `self.db_path`'s own Drop impl is about to unlink regardless.
        if let Err(e) = self.conn.execute("DROP TABLE Vector", []) {
            log::warn!(target: "huge-container", "SqlSequence: drop table failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_back_and_at_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let seq = SqlSequence::new(dir.path()).unwrap();
        seq.push_back(1.0).unwrap();
        seq.push_back(2.5).unwrap();
        seq.push_back(3.0).unwrap();

        assert_eq!(seq.size().unwrap(), 3);
        assert_eq!(seq.at(0).unwrap(), 1.0);
        assert_eq!(seq.at(1).unwrap(), 2.5);
        assert_eq!(seq.at(2).unwrap(), 3.0);
    }

    #[test]
    fn drop_removes_the_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path;
        {
            let seq = SqlSequence::new(dir.path()).unwrap();
            db_path = seq.db_path.to_path_buf();
            assert!(db_path.exists());
        }
        assert!(!db_path.exists());
    }
}
