//! SQLite storage implementation

use super::class_map::ClassMap;
use super::schema;
use crate::directory::{ModelRepository, ObjectInfo, TypeDirectory};
use crate::model::CimModel;
use crate::object::CimObject;
use crate::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// SQLite-backed storage for CIM models
pub struct SqliteStore {
    conn: Connection,
    classes: ClassMap,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_classes(path, ClassMap::with_cim_classes())
    }

    /// Open a database file with a custom set of classes
    pub fn open_with_classes(path: &Path, classes: ClassMap) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn, classes };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn,
            classes: ClassMap::with_cim_classes(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for pragma in schema::PRAGMAS {
            self.conn.execute_batch(pragma)?;
        }
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        for table in self.classes.tables() {
            for stmt in table.schema_statements() {
                self.conn.execute(&stmt, [])?;
            }
        }
        Ok(())
    }

    /// Registered classes
    pub fn classes(&self) -> &ClassMap {
        &self.classes
    }

    // ========== Model Operations ==========

    /// All stored models with their object counts
    pub fn list_models(&self) -> Result<Vec<ModelSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT m.id, m.name, COUNT(b.id)
            FROM cim_model m LEFT JOIN base_class b ON b.cim_model_id = m.id
            GROUP BY m.id ORDER BY m.id
            "#,
        )?;

        let models = stmt
            .query_map([], |row| {
                Ok(ModelSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    objects: row.get::<_, i64>(2)? as usize,
                })
            })?
            .collect::<rusqlite::Result<_>>()?;

        Ok(models)
    }

    /// Name of a stored model; `None` if the model does not exist
    pub fn model_name(&self, cim_model_id: i64) -> Result<Option<Option<String>>> {
        self.conn
            .query_row(
                "SELECT name FROM cim_model WHERE id = ?1",
                [cim_model_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all models
    pub fn count_models(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM cim_model", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count all objects across models
    pub fn count_objects(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM base_class", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Bulk Operations ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let mut stmt = self
            .conn
            .prepare("SELECT cim_type, COUNT(*) FROM base_class GROUP BY cim_type")?;
        let by_type = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
            })?
            .collect::<rusqlite::Result<_>>()?;

        Ok(DbStats {
            models: self.count_models()?,
            objects: self.count_objects()?,
            classes: self.classes.len(),
            by_type,
        })
    }
}

impl TypeDirectory for SqliteStore {
    fn save_batch(&mut self, cim_type: &str, objects: &mut [Box<dyn CimObject>]) -> Result<()> {
        self.classes.get(cim_type)?.save(&self.conn, objects)
    }

    fn load_batch(&self, cim_type: &str, ids: &[i64]) -> Result<Vec<Box<dyn CimObject>>> {
        self.classes.get(cim_type)?.load(&self.conn, ids)
    }

    fn delete_batch(&mut self, cim_type: &str, ids: &[i64]) -> Result<()> {
        let removed = self.classes.get(cim_type)?.delete(&self.conn, ids)?;
        tracing::debug!("Deleted {} of {} {} objects", removed, ids.len(), cim_type);
        Ok(())
    }
}

impl ModelRepository for SqliteStore {
    fn save_model(&mut self, model: &CimModel) -> Result<i64> {
        match model.cim_model_id {
            Some(id) => {
                self.conn.execute(
                    r#"
                    INSERT INTO cim_model (id, name) VALUES (?1, ?2)
                    ON CONFLICT(id) DO UPDATE SET name = excluded.name
                    "#,
                    params![id, model.name],
                )?;
                Ok(id)
            }
            None => {
                self.conn
                    .execute("INSERT INTO cim_model (name) VALUES (?1)", [&model.name])?;
                Ok(self.conn.last_insert_rowid())
            }
        }
    }

    fn model_exists(&self, cim_model_id: i64) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cim_model WHERE id = ?1)",
            [cim_model_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn delete_model(&mut self, cim_model_id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM cim_model WHERE id = ?1", [cim_model_id])?;
        Ok(removed > 0)
    }

    fn find_objects(&self, cim_model_id: i64) -> Result<Vec<ObjectInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, cim_type FROM base_class WHERE cim_model_id = ?1 ORDER BY id",
        )?;

        let infos = stmt
            .query_map([cim_model_id], |row| {
                Ok(ObjectInfo {
                    id: row.get(0)?,
                    cim_type: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<_>>()?;

        Ok(infos)
    }
}

/// A stored model as listed by [`SqliteStore::list_models`]
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub id: i64,
    pub name: Option<String>,
    pub objects: usize,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub models: usize,
    pub objects: usize,
    /// Registered classes
    pub classes: usize,
    pub by_type: BTreeMap<String, usize>,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Models: {}", self.models)?;
        writeln!(f, "  Objects: {}", self.objects)?;
        writeln!(f, "  Classes: {}", self.classes)?;
        for (cim_type, count) in &self.by_type {
            writeln!(f, "    {}: {}", cim_type, count)?;
        }
        Ok(())
    }
}
