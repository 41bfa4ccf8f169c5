// 🗄️ Taxonomy Storage - SQLite-backed category table
// Flat records (id, parent_id, name, triggers) ordered by position.

use crate::taxonomy::TaxonomyRecord;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

/// Open (or create) a taxonomy database and make sure the schema exists.
pub fn open_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open taxonomy database: {}", db_path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            parent_id TEXT,
            name TEXT NOT NULL,
            triggers TEXT NOT NULL DEFAULT '',
            position INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_categories_position ON categories(position)",
        [],
    )?;

    Ok(())
}

/// Replace the stored taxonomy with `records`, in one transaction.
///
/// Record order becomes the stored `position`.
pub fn insert_records(conn: &mut Connection, records: &[TaxonomyRecord]) -> Result<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM categories", [])?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO categories (id, parent_id, name, triggers, position)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for (position, record) in records.iter().enumerate() {
            stmt.execute(params![
                record.id,
                record.parent_id,
                record.name,
                record.triggers,
                position as i64,
            ])
            .with_context(|| format!("Failed to insert category {:?}", record.id))?;
        }
    }

    tx.commit()?;
    Ok(records.len())
}

pub fn load_records(conn: &Connection) -> Result<Vec<TaxonomyRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, parent_id, name, triggers
             FROM categories
             ORDER BY position ASC",
        )
        .context("Failed to query categories table")?;

    let records = stmt
        .query_map([], |row| {
            Ok(TaxonomyRecord {
                id: row.get(0)?,
                parent_id: row.get(1)?,
                name: row.get(2)?,
                triggers: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read categories table")?;

    Ok(records)
}

pub fn count_records(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    Ok(count)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TaxonomyRecord> {
        vec![
            TaxonomyRecord {
                id: "root".into(),
                parent_id: None,
                name: "Root".into(),
                triggers: String::new(),
            },
            TaxonomyRecord {
                id: "idx".into(),
                parent_id: Some("root".into()),
                name: "Index Funds".into(),
                triggers: "vfinx|veurx".into(),
            },
        ]
    }

    #[test]
    fn test_insert_and_load_records() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        assert_eq!(insert_records(&mut conn, &records()).unwrap(), 2);
        assert_eq!(count_records(&conn).unwrap(), 2);

        let loaded = load_records(&conn).unwrap();
        assert_eq!(loaded, records());
    }

    #[test]
    fn test_insert_replaces_previous_taxonomy() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        insert_records(&mut conn, &records()).unwrap();
        insert_records(&mut conn, &records()[..1]).unwrap();

        assert_eq!(count_records(&conn).unwrap(), 1);
    }

    #[test]
    fn test_open_database_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.db");

        {
            let mut conn = open_database(&path).unwrap();
            insert_records(&mut conn, &records()).unwrap();
        }

        let conn = open_database(&path).unwrap();
        assert_eq!(load_records(&conn).unwrap().len(), 2);
    }
}
