//! Database schema definitions
//!
//! Fixed tables hold models and the identity of every object. Each
//! registered class adds its own table (see `storage::table`).

/// SQL to create the models table
pub const CREATE_CIM_MODEL_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cim_model (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT
)
"#;

/// SQL to create the identity table shared by all classes
pub const CREATE_BASE_CLASS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS base_class (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rdfid TEXT NOT NULL,
    cim_type TEXT NOT NULL,
    cim_model_id INTEGER NOT NULL REFERENCES cim_model(id) ON DELETE CASCADE,
    UNIQUE(cim_model_id, rdfid)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_base_class_model ON base_class(cim_model_id)",
    "CREATE INDEX IF NOT EXISTS idx_base_class_type ON base_class(cim_type)",
];

/// Connection settings applied before the schema
pub const PRAGMAS: &[&str] = &["PRAGMA foreign_keys = ON"];

/// All fixed schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_CIM_MODEL_TABLE, CREATE_BASE_CLASS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Table name for a class; `Limit` is a reserved word in SQL
pub fn table_name(cim_type: &str) -> String {
    match cim_type {
        "Limit" => "_Limit".to_string(),
        other => other.to_string(),
    }
}

/// Column name for an attribute label; `value` clashes with SQL keywords
pub fn column_name(label: &str) -> String {
    match label {
        "value" => "_value".to_string(),
        other => other.to_string(),
    }
}

/// Join table holding the members of a reference-set attribute
pub fn join_table_name(cim_type: &str, label: &str) -> String {
    format!("{}_{}", table_name(cim_type), label)
}

/// Quote an identifier for use in SQL
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// `?1, ?2, ...` for `count` parameters
pub fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        assert_eq!(table_name("Limit"), "_Limit");
        assert_eq!(table_name("Terminal"), "Terminal");
        assert_eq!(column_name("value"), "_value");
        assert_eq!(column_name("name"), "name");
        assert_eq!(join_table_name("Limit", "Members"), "_Limit_Members");
    }

    #[test]
    fn test_quote_and_placeholders() {
        assert_eq!(quote("Terminal"), "\"Terminal\"");
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
        assert_eq!(placeholders(3), "?1, ?2, ?3");
        assert_eq!(placeholders(0), "");
    }
}
