// 📥 Taxonomy Loader - Read a taxonomy from wherever it lives
//
// Sources:
// - Builtin  → the Vanguard model compiled into the binary
// - Json     → nested TaxonomyDefinition document
// - Csv      → flat records with header id,parent_id,name,triggers
// - Sqlite   → flat records from the `categories` table

use crate::db;
use crate::taxonomy::builtin;
use crate::taxonomy::definition::{build_tree, TaxonomyDefinition, TaxonomyRecord};
use crate::taxonomy::node::CategoryNode;
use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum TaxonomySource {
    #[default]
    Builtin,
    Json(PathBuf),
    Csv(PathBuf),
    Sqlite(PathBuf),
}

impl TaxonomySource {
    /// Pick a source by file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(TaxonomySource::Json(path.to_path_buf())),
            "csv" => Ok(TaxonomySource::Csv(path.to_path_buf())),
            "db" | "sqlite" | "sqlite3" => Ok(TaxonomySource::Sqlite(path.to_path_buf())),
            _ => bail!(
                "Unsupported taxonomy file {:?} (expected .json, .csv, .db, .sqlite or .sqlite3)",
                path
            ),
        }
    }

    /// Read and validate the taxonomy this source points at.
    pub fn load(&self) -> Result<CategoryNode> {
        let root = match self {
            TaxonomySource::Builtin => builtin::vanguard(),
            TaxonomySource::Json(path) => load_json(path)?,
            TaxonomySource::Csv(path) => load_csv(path)?,
            TaxonomySource::Sqlite(path) => {
                let conn = open_read_only(path)?;
                load_sqlite(&conn)
                    .with_context(|| format!("Failed to load taxonomy database: {}", path.display()))?
            }
        };

        info!(
            source = %self,
            categories = root.node_count() - 1,
            triggers = root.trigger_count(),
            depth = root.depth(),
            "taxonomy loaded"
        );

        Ok(root)
    }
}

impl fmt::Display for TaxonomySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxonomySource::Builtin => write!(f, "builtin"),
            TaxonomySource::Json(path) | TaxonomySource::Csv(path) | TaxonomySource::Sqlite(path) => {
                write!(f, "{}", path.display())
            }
        }
    }
}

pub fn load_json<P: AsRef<Path>>(path: P) -> Result<CategoryNode> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read taxonomy file: {:?}", path.as_ref()))?;

    parse_json(&content)
}

pub fn parse_json(content: &str) -> Result<CategoryNode> {
    let definition: TaxonomyDefinition =
        serde_json::from_str(content).context("Failed to parse taxonomy JSON")?;

    Ok(definition.into_node()?)
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<CategoryNode> {
    let mut rdr = csv::Reader::from_path(path.as_ref())
        .with_context(|| format!("Failed to open taxonomy CSV: {:?}", path.as_ref()))?;

    let mut records = Vec::new();
    for (line_num, result) in rdr.deserialize().enumerate() {
        let record: TaxonomyRecord =
            result.with_context(|| format!("Failed to parse taxonomy CSV line {}", line_num + 2))?;
        records.push(record);
    }

    Ok(build_tree(&records)?)
}

/// Open an existing taxonomy database without ever creating one.
fn open_read_only(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        bail!("Taxonomy database not found: {}", path.display());
    }

    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open taxonomy database: {}", path.display()))
}

pub fn load_sqlite(conn: &Connection) -> Result<CategoryNode> {
    let records = db::load_records(conn)?;
    Ok(build_tree(&records)?)
}

// ============================================================================
// TESTS
// ============================================================================
