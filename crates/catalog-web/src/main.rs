//! Catalog admin server - REST API and HTML pages for categories, types and
//! sections.

use anyhow::Result;
use catalog_core::config::{CacheConfig, PathsConfig, ServerConfig};
use catalog_core::{CatalogApi, CatalogApiBuilder};
use catalog_web::logging::init_logger;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "catalog-web")]
#[command(about = "Admin server for the catalog of categories, types and sections")]
struct Args {
    /// Host to bind to
    #[arg(long, env = "CATALOG_HOST", default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, env = "CATALOG_PORT", default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Data directory holding the database
    #[arg(long, env = "CATALOG_DATA_DIR", default_value = PathsConfig::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Database file (defaults to <data-dir>/catalog.sqlite)
    #[arg(long, env = "CATALOG_DATABASE")]
    database: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long)]
    in_memory: bool,

    /// Seconds a cached list stays fresh
    #[arg(long, env = "CATALOG_LIST_TTL_SECS", default_value_t = CacheConfig::LIST_TTL.as_secs())]
    list_ttl_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log as JSON lines
    #[arg(long, env = "CATALOG_LOG_JSON")]
    log_json: bool,
}

fn build_api(args: &Args) -> Result<CatalogApi> {
    let builder = if args.in_memory {
        CatalogApiBuilder::in_memory()
    } else {
        let mut builder = CatalogApi::builder(&args.data_dir).auto_create_dirs(true);
        if let Some(database) = &args.database {
            builder = builder.database_path(database);
        }
        builder
    };

    let api = builder
        .list_ttl(Duration::from_secs(args.list_ttl_secs))
        .build()?;
    Ok(api)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.debug, args.log_json);

    info!("Starting catalog server");

    let api = build_api(&args)?;
    match api.data_dir() {
        Some(dir) => info!("Data directory: {}", dir.display()),
        None => info!("Using in-memory database"),
    }

    catalog_web::serve(api, &args.host, args.port).await
}
