//! pagekit command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from file, environment and flags.
//! - Serve one page as HTML on stdout, and expose store smoke commands.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use pagekit_core::config::{ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_TEMPLATE_PATH};
use pagekit_core::{
    init_logging_from, init_page_table, AppConfig, PageService, PageTemplate, Record, RecordId,
    RecordStore, DEFAULT_PAGE_ID, PAGE_TABLE,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pagekit")]
#[command(about = "Render pages stored in a SQLite database", version)]
struct Cli {
    /// JSON config file
    #[arg(long, env = "PAGEKIT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the config file
    #[arg(long, env = ENV_DB_PATH, global = true)]
    db: Option<PathBuf>,

    /// Log level, used when a log directory is configured
    #[arg(long, env = ENV_LOG_LEVEL, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, env = ENV_LOG_DIR, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print page `id` rendered as HTML
    Render {
        #[arg(long, default_value_t = DEFAULT_PAGE_ID)]
        page: RecordId,

        /// Template file, overrides the config file
        #[arg(long, env = ENV_TEMPLATE_PATH)]
        template: Option<PathBuf>,
    },
    /// Create the page table and seed it when empty
    Init,
    /// Print the number of pages
    Count,
    /// Print one page as JSON
    Get { id: RecordId },
    /// Insert a page and print its id
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Delete a page by id
    Delete { id: RecordId },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging_from(&config.log)
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let store = RecordStore::from_config(&config.store_config())
        .with_context(|| format!("failed to open `{}`", config.db.path.display()))?;

    match cli.command {
        Command::Render { page, template } => {
            let template = match template.or_else(|| config.template.path.clone()) {
                Some(path) => PageTemplate::load(path)?,
                None => PageTemplate::default(),
            };
            let service = PageService::new(store, template);
            let html = service
                .render_page(page)
                .with_context(|| format!("failed to render page {page}"))?;
            print!("{html}");
        }
        Command::Init => {
            let seeded = init_page_table(&store).context("failed to initialize page table")?;
            println!("seeded {seeded} page(s)");
        }
        Command::Count => {
            println!("{}", store.count(PAGE_TABLE)?);
        }
        Command::Get { id } => match store.read(PAGE_TABLE, id)? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => bail!("page {id} not found"),
        },
        Command::Create { title, content } => {
            let page = Record::new().with("title", title).with("content", content);
            let id = store.create(PAGE_TABLE, &page)?;
            info!("event=page_create module=cli status=ok page_id={id}");
            println!("{id}");
        }
        Command::Delete { id } => {
            store.delete(PAGE_TABLE, id)?;
            info!("event=page_delete module=cli status=ok page_id={id}");
            println!("deleted {id}");
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let lookup = |key: &str| match (key, &cli.db) {
        (ENV_DB_PATH, Some(path)) => Some(path.display().to_string()),
        _ => std::env::var(key).ok(),
    };
    let mut config = AppConfig::resolve(cli.config.as_deref(), lookup)
        .context("failed to resolve configuration")?;

    if let Some(path) = &cli.db {
        config.db.path = path.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log.level = Some(level.clone());
    }
    if let Some(dir) = &cli.log_dir {
        config.log.dir = Some(dir.clone());
    }
    Ok(config)
}
