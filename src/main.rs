//! cimdb CLI - store, read and relink CIM network models

mod commands;

use cimdb::config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cimdb")]
#[command(version)]
#[command(about = "CIM network model persistence - store, reload and relink power-system object graphs")]
#[command(long_about = r#"
cimdb keeps IEC CIM network models in SQLite:
  • One table per CIM class, objects grouped by model
  • References stored as rdf:IDs and relinked on read
  • Dangling references reported, never fatal

Example usage:
  cimdb init --database grid.db
  cimdb import --file model.json --name "Grid 2024"
  cimdb read 1 --format json
  cimdb inventory 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, default_value = "cimdb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Import a model from a JSON object list
    Import {
        /// Interchange file
        #[arg(short, long)]
        file: PathBuf,

        /// Model name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Read a model back, linking references
    Read {
        /// Model id
        model: i64,

        /// Keep references as raw rdf:IDs
        #[arg(long)]
        no_link: bool,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// List every object with its links
        #[arg(long)]
        objects: bool,
    },

    /// Delete a model and all its objects
    Delete {
        /// Model id
        model: i64,
    },

    /// Show object ids per type for a model
    Inventory {
        /// Model id
        model: i64,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List registered CIM classes, or the attributes of one class
    Classes {
        /// Class name
        class: Option<String>,
    },

    /// Show database statistics
    Stats,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        cimdb::ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_config(Some(&cli.config))?.unwrap_or_default();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(cfg.log_filter.as_deref().unwrap_or("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let database = cli.database.clone().unwrap_or_else(|| cfg.database_path());

    match cli.command {
        Commands::Init { force } => commands::run_init(&cli.config, &database, force),
        Commands::Import { file, name } => commands::run_import(&database, &file, name),
        Commands::Read {
            model,
            no_link,
            format,
            objects,
        } => {
            let link = !no_link && cfg.link_objects();
            commands::run_read(&database, model, link, format, objects)
        }
        Commands::Delete { model } => commands::run_delete(&database, model),
        Commands::Inventory { model, format } => commands::run_inventory(&database, model, format),
        Commands::Classes { class } => commands::run_classes(class.as_deref()),
        Commands::Stats => commands::run_stats(&database),
    }
}
