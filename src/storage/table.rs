//! Per-class tables
//!
//! Every registered class gets one table keyed by the `base_class` id, with
//! a column per used single-valued attribute, and one join table per used
//! reference-set attribute. Columns are derived from the class's attribute
//! table, so adding a class never means writing SQL by hand.

use super::schema::{self, placeholders, quote};
use crate::attribute::{AttributeDescriptor, AttributeKind, AttributeValue, ValueType};
use crate::convert;
use crate::object::{CimClass, CimObject};
use crate::{Error, Result};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection};
use serde::Serialize;
use std::marker::PhantomData;

/// Largest id list bound into one statement
const MAX_BATCH: usize = 500;

const UPSERT_BASE_CLASS: &str = r#"
INSERT INTO base_class (id, rdfid, cim_type, cim_model_id)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(id) DO UPDATE SET rdfid = excluded.rdfid, cim_model_id = excluded.cim_model_id
"#;

/// How one attribute is stored, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeInfo {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub value_type: ValueType,
    pub is_used: bool,
    pub namespace_url: &'static str,
    /// Column or join table; `None` for inert attributes
    pub storage: Option<String>,
}

/// Storage adapter for one concrete class.
pub trait ClassTable: Send + Sync {
    fn cim_type(&self) -> &'static str;

    fn new_object(&self) -> Box<dyn CimObject>;

    fn attributes(&self) -> Vec<AttributeInfo>;

    /// CREATE statements for the class table and its join tables
    fn schema_statements(&self) -> Vec<String>;

    fn save(&self, conn: &Connection, objects: &mut [Box<dyn CimObject>]) -> Result<()>;

    fn load(&self, conn: &Connection, ids: &[i64]) -> Result<Vec<Box<dyn CimObject>>>;

    /// Delete by id; returns the number of objects removed
    fn delete(&self, conn: &Connection, ids: &[i64]) -> Result<usize>;
}

/// [`ClassTable`] for a class known at compile time.
pub struct TableStore<T> {
    _class: PhantomData<fn() -> T>,
}

impl<T: CimClass> Default for TableStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CimClass> TableStore<T> {
    pub fn new() -> Self {
        Self {
            _class: PhantomData,
        }
    }

    fn table() -> String {
        quote(&schema::table_name(T::CLASS_NAME))
    }

    fn join_table(descriptor: &AttributeDescriptor<T>) -> String {
        quote(&schema::join_table_name(T::CLASS_NAME, descriptor.label()))
    }

    /// Used attributes stored in the class table, in declaration order
    fn columns() -> Vec<&'static AttributeDescriptor<T>> {
        T::attribute_table()
            .iter()
            .filter(|d| d.is_used && d.kind != AttributeKind::ReferenceSet)
            .collect()
    }

    /// Used attributes stored in join tables
    fn reference_sets() -> Vec<&'static AttributeDescriptor<T>> {
        T::attribute_table()
            .iter()
            .filter(|d| d.is_used && d.kind == AttributeKind::ReferenceSet)
            .collect()
    }

    fn sql_type(descriptor: &AttributeDescriptor<T>) -> &'static str {
        match descriptor.kind {
            AttributeKind::Primitive => descriptor.value_type.sql_type(),
            _ => "TEXT",
        }
    }

    fn to_sql(descriptor: &AttributeDescriptor<T>, text: Option<&str>) -> Result<Value> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };
        let malformed = || Error::MalformedValue {
            attribute: descriptor.full_name,
            value: text.to_string(),
        };
        let value = match (descriptor.kind, descriptor.value_type) {
            (AttributeKind::Primitive, ValueType::Float) => {
                Value::Real(convert::parse_double(text).ok_or_else(malformed)?)
            }
            (AttributeKind::Primitive, ValueType::Integer) => {
                Value::Integer(convert::parse_integer(text).ok_or_else(malformed)?)
            }
            (AttributeKind::Primitive, ValueType::Boolean) => {
                Value::Integer(i64::from(convert::parse_boolean(text)))
            }
            _ => Value::Text(text.to_string()),
        };
        Ok(value)
    }

    fn from_sql(descriptor: &AttributeDescriptor<T>, value: ValueRef<'_>) -> Option<String> {
        match value {
            ValueRef::Null | ValueRef::Blob(_) => None,
            ValueRef::Integer(i) if descriptor.value_type == ValueType::Boolean => {
                Some(convert::format_boolean(i != 0))
            }
            ValueRef::Integer(i) => Some(i.to_string()),
            ValueRef::Real(f) => Some(convert::format_double(f)),
            ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    fn save_one(
        &self,
        conn: &Connection,
        columns: &[&'static AttributeDescriptor<T>],
        sets: &[&'static AttributeDescriptor<T>],
        insert_sql: &str,
        object: &dyn CimObject,
    ) -> Result<i64> {
        let cim_model_id = object
            .cim_model_id()
            .ok_or_else(|| Error::MissingModel(object.rdfid().to_string()))?;
        let typed = object
            .downcast_ref::<T>()
            .ok_or_else(|| Error::WrongClass {
                expected: T::CLASS_NAME,
                found: object.cim_type(),
            })?;

        conn.prepare_cached(UPSERT_BASE_CLASS)?.execute(params![
            object.id(),
            object.rdfid(),
            T::CLASS_NAME,
            cim_model_id
        ])?;
        let id = match object.id() {
            Some(id) => id,
            None => conn.last_insert_rowid(),
        };

        let mut values = Vec::with_capacity(columns.len() + 1);
        values.push(Value::Integer(id));
        for descriptor in columns {
            let value = descriptor.read(typed);
            values.push(Self::to_sql(descriptor, value.as_ref().and_then(|v| v.as_text()))?);
        }
        conn.prepare_cached(insert_sql)?
            .execute(params_from_iter(values))?;

        for descriptor in sets {
            let join = Self::join_table(descriptor);
            conn.prepare_cached(&format!("DELETE FROM {} WHERE owner_id = ?1", join))?
                .execute([id])?;
            if let Some(AttributeValue::TextSet(members)) = descriptor.read(typed) {
                let mut insert = conn.prepare_cached(&format!(
                    "INSERT OR IGNORE INTO {} (owner_id, target_rdfid) VALUES (?1, ?2)",
                    join
                ))?;
                for member in &members {
                    insert.execute(params![id, member])?;
                }
            }
        }

        tracing::debug!("Saved {} {} as id {}", T::CLASS_NAME, object.rdfid(), id);
        Ok(id)
    }
}

impl<T: CimClass> ClassTable for TableStore<T> {
    fn cim_type(&self) -> &'static str {
        T::CLASS_NAME
    }

    fn new_object(&self) -> Box<dyn CimObject> {
        Box::new(T::default())
    }

    fn attributes(&self) -> Vec<AttributeInfo> {
        T::attribute_table()
            .iter()
            .map(|d| AttributeInfo {
                name: d.full_name,
                kind: d.kind,
                value_type: d.value_type,
                is_used: d.is_used,
                namespace_url: d.namespace_url,
                storage: match (d.is_used, d.kind) {
                    (false, _) => None,
                    (true, AttributeKind::ReferenceSet) => {
                        Some(schema::join_table_name(T::CLASS_NAME, d.label()))
                    }
                    (true, _) => Some(schema::column_name(d.label())),
                },
            })
            .collect()
    }

    fn schema_statements(&self) -> Vec<String> {
        let mut definitions =
            vec!["id INTEGER PRIMARY KEY REFERENCES base_class(id) ON DELETE CASCADE".to_string()];
        for descriptor in Self::columns() {
            definitions.push(format!(
                "{} {}",
                quote(&schema::column_name(descriptor.label())),
                Self::sql_type(descriptor)
            ));
        }

        let mut stmts = vec![format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            Self::table(),
            definitions.join(",\n    ")
        )];
        for descriptor in Self::reference_sets() {
            stmts.push(format!(
                r#"CREATE TABLE IF NOT EXISTS {} (
    owner_id INTEGER NOT NULL REFERENCES base_class(id) ON DELETE CASCADE,
    target_rdfid TEXT NOT NULL,
    PRIMARY KEY (owner_id, target_rdfid)
)"#,
                Self::join_table(descriptor)
            ));
        }
        stmts
    }

    fn save(&self, conn: &Connection, objects: &mut [Box<dyn CimObject>]) -> Result<()> {
        let columns = Self::columns();
        let sets = Self::reference_sets();
        let column_list: String = columns
            .iter()
            .map(|d| format!(", {}", quote(&schema::column_name(d.label()))))
            .collect();
        let insert_sql = format!(
            "INSERT OR REPLACE INTO {} (id{}) VALUES ({})",
            Self::table(),
            column_list,
            placeholders(columns.len() + 1)
        );

        for object in objects.iter_mut() {
            let id = self.save_one(conn, &columns, &sets, &insert_sql, object.as_ref())?;
            object.base_mut().id = Some(id);
        }
        Ok(())
    }

    fn load(&self, conn: &Connection, ids: &[i64]) -> Result<Vec<Box<dyn CimObject>>> {
        let columns = Self::columns();
        let sets = Self::reference_sets();
        let select_list: String = columns
            .iter()
            .map(|d| format!(", t.{}", quote(&schema::column_name(d.label()))))
            .collect();

        let mut loaded: Vec<T> = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_BATCH) {
            let sql = format!(
                "SELECT b.id, b.rdfid, b.cim_model_id{} FROM base_class b JOIN {} t ON t.id = b.id WHERE b.id IN ({}) ORDER BY b.id",
                select_list,
                Self::table(),
                placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
            while let Some(row) = rows.next()? {
                let mut object = T::default();
                let base = CimClass::base_mut(&mut object);
                base.id = Some(row.get(0)?);
                base.rdfid = row.get(1)?;
                base.cim_model_id = Some(row.get(2)?);

                for (i, descriptor) in columns.iter().enumerate() {
                    if let Some(text) = Self::from_sql(descriptor, row.get_ref(i + 3)?) {
                        descriptor.write_text(&mut object, &text)?;
                    }
                }
                loaded.push(object);
            }
        }

        for descriptor in &sets {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT target_rdfid FROM {} WHERE owner_id = ?1 ORDER BY target_rdfid",
                Self::join_table(descriptor)
            ))?;
            for object in &mut loaded {
                let Some(id) = CimClass::base(object).id else {
                    continue;
                };
                let members: Vec<String> = stmt
                    .query_map([id], |row| row.get(0))?
                    .collect::<rusqlite::Result<_>>()?;
                for member in &members {
                    descriptor.write_text(object, member)?;
                }
            }
        }

        if loaded.len() < ids.len() {
            tracing::warn!(
                "Loaded {} of {} requested {} objects",
                loaded.len(),
                ids.len(),
                T::CLASS_NAME
            );
        }

        Ok(loaded
            .into_iter()
            .map(|o| Box::new(o) as Box<dyn CimObject>)
            .collect())
    }

    fn delete(&self, conn: &Connection, ids: &[i64]) -> Result<usize> {
        let sets = Self::reference_sets();
        let mut removed = 0;
        for chunk in ids.chunks(MAX_BATCH) {
            let in_list = placeholders(chunk.len());
            for descriptor in &sets {
                conn.execute(
                    &format!(
                        "DELETE FROM {} WHERE owner_id IN ({})",
                        Self::join_table(descriptor),
                        in_list
                    ),
                    params_from_iter(chunk.iter()),
                )?;
            }
            conn.execute(
                &format!("DELETE FROM {} WHERE id IN ({})", Self::table(), in_list),
                params_from_iter(chunk.iter()),
            )?;

            let mut values: Vec<Value> = chunk.iter().map(|id| Value::Integer(*id)).collect();
            values.push(Value::Text(T::CLASS_NAME.to_string()));
            removed += conn.execute(
                &format!(
                    "DELETE FROM base_class WHERE id IN ({}) AND cim_type = ?{}",
                    in_list,
                    chunk.len() + 1
                ),
                params_from_iter(values),
            )?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::{CurrentLimit, TopologicalIsland, TopologicalNode};

    #[test]
    fn test_schema_uses_reserved_column_names() {
        let stmts = TableStore::<CurrentLimit>::new().schema_statements();
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].contains("\"_value\" REAL"));
        assert!(stmts[0].contains("\"OperationalLimitSet\" TEXT"));
    }

    #[test]
    fn test_inert_sets_get_no_join_table() {
        let node = TableStore::<TopologicalNode>::new();
        assert_eq!(node.schema_statements().len(), 1);
        let terminal = node
            .attributes()
            .into_iter()
            .find(|a| a.name == "TopologicalNode.Terminal")
            .unwrap();
        assert!(!terminal.is_used);
        assert!(terminal.storage.is_none());

        let island = TableStore::<TopologicalIsland>::new().schema_statements();
        assert_eq!(island.len(), 2);
        assert!(island[1].contains("\"TopologicalIsland_TopologicalNodes\""));
    }
}
