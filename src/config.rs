use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CimdbConfig {
    pub database: Option<String>,
    /// Link references when reading models (default: true)
    pub link_objects: Option<bool>,
    /// `tracing` filter directive, e.g. `cimdb=debug`
    pub log_filter: Option<String>,
}

impl CimdbConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }

    pub fn link_objects(&self) -> bool {
        self.link_objects.unwrap_or(true)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("cimdb.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("cimdb.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<CimdbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CimdbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &CimdbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("cimdb.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cimdb.toml");
        let config = CimdbConfig {
            database: Some("data/grid.db".into()),
            link_objects: Some(false),
            log_filter: None,
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.database_path(), PathBuf::from("data/grid.db"));
        assert!(!loaded.link_objects());
    }

    #[test]
    fn test_defaults() {
        let config = CimdbConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("cimdb.db"));
        assert!(config.link_objects());
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("cimdb.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
