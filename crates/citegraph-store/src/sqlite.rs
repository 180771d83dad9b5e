//! Embedded SQLite implementation of the graph store contract.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::types::{GraphStats, LinkedResource, ResourceStatus};
use crate::GraphStore;
use citegraph_core::{Error, Result};

/// SQLite-backed citation graph.
pub struct SqliteGraphStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteGraphStore {
    /// Open or create the graph database at the given path.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::StoreUnavailable(format!("schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let stats = store.stats()?;
        info!(
            "Graph store opened: {} documents, {} resources, {} citations, path={}",
            stats.source_documents,
            stats.linked_resources,
            stats.citations,
            store.db_path.display()
        );
        Ok(store)
    }

    fn now_millis() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    fn row_to_resource(row: &rusqlite::Row<'_>) -> rusqlite::Result<LinkedResource> {
        let status_text: String = row.get("status")?;
        let local_path: Option<String> = row.get("local_path")?;
        Ok(LinkedResource {
            url: row.get("url")?,
            domain: row.get("domain")?,
            // Only pipeline-written values reach this column.
            status: status_text.parse().unwrap_or(ResourceStatus::Unknown),
            local_path: local_path.map(PathBuf::from),
            error_message: row.get("error_message")?,
        })
    }
}

impl GraphStore for SqliteGraphStore {
    fn ensure_source_document(&self, name: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT OR IGNORE INTO source_documents (name, created_at) VALUES (?1, ?2)",
        )
        .and_then(|mut stmt| stmt.execute(params![name, Self::now_millis()]))
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    fn ensure_linked_resource_and_citation(
        &self,
        url: &str,
        domain: &str,
        source_name: &str,
        page: u32,
    ) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        // Resource creation happens-before edge creation, inside one
        // transaction per upsert.
        tx.execute(
            "INSERT OR IGNORE INTO linked_resources (url, domain, status, created_at)
             VALUES (?1, ?2, 'unknown', ?3)",
            params![url, domain, Self::now_millis()],
        )
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        let source_id: Option<i64> = tx
            .query_row(
                "SELECT id FROM source_documents WHERE name = ?1",
                params![source_name],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        let source_id =
            source_id.ok_or_else(|| Error::NotFound(format!("source document {}", source_name)))?;

        tx.execute(
            "INSERT OR IGNORE INTO citations (source_id, resource_id, page)
             SELECT ?1, id, ?2 FROM linked_resources WHERE url = ?3",
            params![source_id, page, url],
        )
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        tx.commit()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))
    }

    fn list_resources_by_status(&self, status: ResourceStatus) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT url FROM linked_resources WHERE status = ?1 ORDER BY id",
            )
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        let urls = stmt
            .query_map(params![status.to_string()], |row| row.get(0))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<String>>>())
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Ok(urls)
    }

    fn set_resource_status(
        &self,
        url: &str,
        status: ResourceStatus,
        error_message: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn.lock();
        let updated = match error_message {
            Some(message) => conn
                .prepare_cached(
                    "UPDATE linked_resources SET status = ?1, error_message = ?2 WHERE url = ?3",
                )
                .and_then(|mut stmt| stmt.execute(params![status.to_string(), message, url])),
            None => conn
                .prepare_cached("UPDATE linked_resources SET status = ?1 WHERE url = ?2")
                .and_then(|mut stmt| stmt.execute(params![status.to_string(), url])),
        }
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        if updated == 0 {
            return Err(Error::NotFound(format!("linked resource {}", url)));
        }
        Ok(())
    }

    fn set_resource_local_path(&self, url: &str, path: &Path) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn
            .prepare_cached("UPDATE linked_resources SET local_path = ?1 WHERE url = ?2")
            .and_then(|mut stmt| {
                stmt.execute(params![path.display().to_string(), url])
            })
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        if updated == 0 {
            return Err(Error::NotFound(format!("linked resource {}", url)));
        }
        Ok(())
    }

    fn get_resource(&self, url: &str) -> Result<Option<LinkedResource>> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "SELECT url, domain, status, local_path, error_message
             FROM linked_resources WHERE url = ?1",
        )
        .and_then(|mut stmt| {
            stmt.query_row(params![url], Self::row_to_resource).optional()
        })
        .map_err(|e| Error::StoreUnavailable(e.to_string()))
    }

    fn stats(&self) -> Result<GraphStats> {
        let conn = self.conn.lock();
        let count = |sql: &str| -> Result<i64> {
            conn.query_row(sql, [], |row| row.get(0))
                .map_err(|e| Error::StoreUnavailable(e.to_string()))
        };
        Ok(GraphStats {
            source_documents: count("SELECT COUNT(*) FROM source_documents")?,
            linked_resources: count("SELECT COUNT(*) FROM linked_resources")?,
            citations: count("SELECT COUNT(*) FROM citations")?,
        })
    }
}
