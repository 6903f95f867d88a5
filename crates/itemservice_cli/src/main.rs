//! CLI entry point and composition root.
//!
//! # Responsibility
//! - Resolve configuration from file and flags.
//! - Wire the selected repository backend into `ItemService`.
//! - Expose save/update/find-by-id/find-all as subcommands.

use clap::{Parser, Subcommand};
use itemservice_core::db::{open_db, open_db_in_memory};
use itemservice_core::{
    init_logging, AppConfig, Item, ItemId, ItemRepository, ItemSearchCond, ItemService,
    ItemUpdateDto, MemoryItemRepository, RepoResult, SqliteItemRepository,
    SqliteSessionItemRepository, StorageBackend,
};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "itemservice", version, about = "Item catalogue over swappable storage")]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured backend (memory, sqlite, sqlite-session).
    #[arg(long)]
    backend: Option<StorageBackend>,

    /// Overrides the configured SQLite database file.
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Saves a new item and prints it with its generated id.
    Add {
        name: String,
        price: i32,
        quantity: i32,
    },
    /// Overwrites name, price and quantity of an existing item.
    Update {
        id: ItemId,
        name: String,
        price: i32,
        quantity: i32,
    },
    /// Prints one item by id.
    Get { id: ItemId },
    /// Prints items matching the optional filters.
    List {
        /// Substring the item name must contain.
        #[arg(long)]
        name: Option<String>,
        /// Inclusive upper bound on price.
        #[arg(long)]
        max_price: Option<i32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }

    if let Some(log_dir) = config.log_dir.as_deref() {
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", log_dir.display()))?;
        init_logging(config.effective_log_level(), log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok backend={}",
        config.backend
    );

    let conn = match config.backend {
        StorageBackend::Memory => None,
        StorageBackend::Sqlite | StorageBackend::SqliteSession => Some(match &config.db_path {
            Some(path) => open_db(path)?,
            None => open_db_in_memory()?,
        }),
    };

    if let Some(hint) = memory_read_hint(config.backend, &cli.command) {
        eprintln!("hint: {hint}");
    }

    let repo = build_repository(config.backend, conn.as_ref())?;
    let service = ItemService::new(repo);
    Ok(execute(&service, cli.command)?)
}

fn build_repository<'conn>(
    backend: StorageBackend,
    conn: Option<&'conn Connection>,
) -> Result<Box<dyn ItemRepository + 'conn>, Box<dyn Error>> {
    let repo: Box<dyn ItemRepository + 'conn> = match (backend, conn) {
        (StorageBackend::Memory, _) => Box::new(MemoryItemRepository::new()),
        (StorageBackend::Sqlite, Some(conn)) => Box::new(SqliteItemRepository::try_new(conn)?),
        (StorageBackend::SqliteSession, Some(conn)) => {
            Box::new(SqliteSessionItemRepository::try_new(conn)?)
        }
        (backend, None) => return Err(format!("backend `{backend}` requires a connection").into()),
    };
    Ok(repo)
}

/// Read commands on the memory backend always see an empty store.
fn memory_read_hint(backend: StorageBackend, command: &Command) -> Option<&'static str> {
    match (backend, command) {
        (StorageBackend::Memory, Command::Get { .. } | Command::List { .. }) => Some(
            "the memory backend starts empty on every run; use --backend sqlite --db <file> to read saved items",
        ),
        _ => None,
    }
}

fn execute<R: ItemRepository>(service: &ItemService<R>, command: Command) -> RepoResult<ExitCode> {
    match command {
        Command::Add {
            name,
            price,
            quantity,
        } => {
            let saved = service.save(Item::new(name, price, quantity))?;
            println!("{}", format_item(&saved));
        }
        Command::Update {
            id,
            name,
            price,
            quantity,
        } => {
            service.update(id, &ItemUpdateDto::new(name, price, quantity))?;
            println!("updated id={id}");
        }
        Command::Get { id } => match service.find_by_id(id)? {
            Some(item) => println!("{}", format_item(&item)),
            None => {
                println!("not found");
                return Ok(ExitCode::from(1));
            }
        },
        Command::List { name, max_price } => {
            for item in service.find_items(&ItemSearchCond::new(name, max_price))? {
                println!("{}", format_item(&item));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn format_item(item: &Item) -> String {
    let id = item
        .id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "id={} name={} price={} quantity={}",
        id, item.item_name, item.price, item.quantity
    )
}
