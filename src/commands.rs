use crate::Format;
use anyhow::Context;
use cimdb::config::{self, CimdbConfig};
use cimdb::interchange::JsonInterchange;
use cimdb::storage::{ClassMap, SqliteStore};
use cimdb::ui::table::{id_ranges, rounded};
use cimdb::ui::{self, ClassRow, Icons, InventoryRow, ModelRow, TableBuilder};
use cimdb::{CimModel, CimModelService, CimObject, LinkMode, ModelGraph, ModelRepository};
use std::path::Path;
use std::time::Instant;

pub fn run_init(config_path: &Path, database: &Path, force: bool) -> anyhow::Result<()> {
    let cfg = CimdbConfig {
        database: Some(database.to_string_lossy().to_string()),
        link_objects: Some(true),
        log_filter: None,
    };
    config::write_config(config_path, &cfg, force)?;
    config::ensure_db_dir(database)?;
    SqliteStore::open(database)?;

    ui::success("Initialized cimdb");
    ui::info("Config", &config_path.display().to_string());
    ui::status(Icons::DATABASE, "Database", &database.display().to_string());
    Ok(())
}

pub fn run_import(database: &Path, file: &Path, name: Option<String>) -> anyhow::Result<()> {
    let payload = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let name = name.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed".to_string())
    });

    config::ensure_db_dir(database)?;
    let mut store = SqliteStore::open(database)?;
    store.begin_transaction()?;
    let mut service = CimModelService::new(store);

    ui::header(&format!("Importing {}", file.display()));
    let start = Instant::now();
    let mut model = CimModel::new(name);
    let reader = JsonInterchange::new();
    let saved = match service.save_cim_model_from_payload(&mut model, &payload, &reader) {
        Ok(saved) => saved,
        Err(e) => {
            service.store_mut().rollback()?;
            return Err(e.into());
        }
    };
    service.store_mut().commit()?;

    let cim_model_id = model
        .cim_model_id
        .context("model has no id after saving")?;
    ui::success(&format!("Saved {} objects as model {}", saved.len(), cim_model_id));
    ui::status(Icons::DATABASE, "Database", &database.display().to_string());
    ui::timing(&format!("{:.2?}", start.elapsed()));
    Ok(())
}

pub fn run_read(
    database: &Path,
    cim_model_id: i64,
    link: bool,
    format: Format,
    list_objects: bool,
) -> anyhow::Result<()> {
    let service = CimModelService::new(SqliteStore::open(database)?);
    let graph = service.read_cim_objects(cim_model_id, LinkMode::from(link))?;

    if format == Format::Json {
        println!("{}", JsonInterchange::new().write_graph(&graph)?);
        return Ok(());
    }

    let name = service.store().model_name(cim_model_id)?.flatten();
    ui::header(&format!(
        "Model {} {}",
        cim_model_id,
        ui::dim(name.as_deref().unwrap_or(""))
    ));

    let mut table = TableBuilder::new();
    for (cim_type, count) in graph.count_by_type() {
        table.add_row(cim_type, &count.to_string());
    }
    println!("{}", table.build());

    if link {
        let report = graph.link_report();
        ui::section("Links");
        ui::summary_row("Resolved", &report.resolved.to_string());
        ui::summary_row("Dangling", &report.dangling.len().to_string());
        ui::summary_row("Failed", &report.failures.len().to_string());
        for dangling in &report.dangling {
            ui::dangling(dangling);
        }
        for failure in &report.failures {
            ui::failure(failure);
        }
    }

    if list_objects {
        ui::section("Objects");
        for object in graph.iter() {
            print_object(&graph, object)?;
        }
    }
    Ok(())
}

fn print_object(graph: &ModelGraph, object: &dyn CimObject) -> anyhow::Result<()> {
    println!("{} {}", ui::cim_type(object.cim_type()), object.rdfid());
    for name in object.attribute_names() {
        let Some(value) = object.get_attribute(name)? else {
            continue;
        };
        let links = object.linked_objects(name)?;
        if links.is_empty() {
            ui::summary_row(name, &value.to_string());
        } else {
            for link in links {
                let target = graph
                    .resolve(link)
                    .map(|o| o.describe())
                    .unwrap_or_else(|| link.rdfid.clone());
                ui::summary_row(name, &format!("{} {}", Icons::LINK, target));
            }
        }
    }
    Ok(())
}

pub fn run_delete(database: &Path, cim_model_id: i64) -> anyhow::Result<()> {
    let mut store = SqliteStore::open(database)?;
    store.begin_transaction()?;
    let mut service = CimModelService::new(store);

    let deleted = match service.delete_cim_model(cim_model_id) {
        Ok(deleted) => deleted,
        Err(e) => {
            service.store_mut().rollback()?;
            return Err(e.into());
        }
    };
    service.store_mut().commit()?;

    if deleted {
        ui::status(Icons::DEL, "Deleted model", &cim_model_id.to_string());
    } else {
        ui::warn(&format!("Model {} not found", cim_model_id));
    }
    Ok(())
}

pub fn run_inventory(database: &Path, cim_model_id: i64, format: Format) -> anyhow::Result<()> {
    let service = CimModelService::new(SqliteStore::open(database)?);
    if !service.store().model_exists(cim_model_id)? {
        anyhow::bail!("model {} not found", cim_model_id);
    }
    let inventory = service.get_object_inventory(cim_model_id)?;

    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&inventory)?);
        return Ok(());
    }

    let rows: Vec<InventoryRow> = inventory
        .iter()
        .map(|(cim_type, ids)| InventoryRow {
            cim_type: cim_type.clone(),
            count: ids.len(),
            ids: id_ranges(ids),
        })
        .collect();
    ui::header(&format!("Inventory of model {}", cim_model_id));
    println!("{}", rounded(&rows));
    Ok(())
}

pub fn run_classes(class: Option<&str>) -> anyhow::Result<()> {
    let classes = ClassMap::with_cim_classes();

    let Some(class) = class else {
        let mut table = TableBuilder::new();
        for table_store in classes.tables() {
            table.add_row(
                table_store.cim_type(),
                &format!("{} attributes", table_store.attributes().len()),
            );
        }
        ui::header(&format!("{} registered classes", classes.len()));
        println!("{}", table.build());
        return Ok(());
    };

    let rows: Vec<ClassRow> = classes
        .get(class)?
        .attributes()
        .into_iter()
        .map(|a| ClassRow {
            name: a.name.to_string(),
            kind: a.kind.to_string(),
            value_type: format!("{:?}", a.value_type),
            storage: a.storage.unwrap_or_else(|| ui::muted("(inert)")),
        })
        .collect();
    ui::header(class);
    println!("{}", rounded(&rows));
    Ok(())
}

pub fn run_stats(database: &Path) -> anyhow::Result<()> {
    let store = SqliteStore::open(database)?;
    let stats = store.stats()?;

    ui::status(Icons::STATS, "cimdb statistics", &database.display().to_string());
    let mut table = TableBuilder::new();
    table.add_row("Models", &stats.models.to_string());
    table.add_row("Objects", &stats.objects.to_string());
    table.add_row("Classes", &stats.classes.to_string());
    for (cim_type, count) in &stats.by_type {
        table.add_row(&format!("  {}", cim_type), &count.to_string());
    }
    println!("{}", table.build());

    let models: Vec<ModelRow> = store
        .list_models()?
        .into_iter()
        .map(|m| ModelRow {
            id: m.id,
            name: m.name.unwrap_or_default(),
            objects: m.objects,
        })
        .collect();
    if !models.is_empty() {
        ui::section("Models");
        println!("{}", rounded(&models));
    }
    Ok(())
}
