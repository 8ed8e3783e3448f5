mod dump;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catdump")]
#[command(about = "Dump a paginated catalog API to one JSON file per record")]
struct Cli {
    /// Directory the JSON files are written to (created if missing)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Paginated product feed URL
    #[arg(long, global = true)]
    products_url: Option<String>,

    /// Category list URL
    #[arg(long, global = true)]
    categories_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Write every product of the feed to `<id>.json`
    Products,
    /// Write one `category_<code>.json` per category with its products inline
    Categories {
        /// Number of categories fetched at the same time
        #[arg(long)]
        max_concurrent: Option<usize>,
    },
}

/// What a run dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DumpMode {
    Products,
    Categories,
}

impl Cli {
    /// Category mode unless `products` was asked for.
    fn mode(&self) -> DumpMode {
        match self.command {
            Some(Commands::Products) => DumpMode::Products,
            Some(Commands::Categories { .. }) | None => DumpMode::Categories,
        }
    }

    /// Command-line flags take precedence over environment configuration.
    fn apply_overrides(&self, config: &mut catdump_core::AppConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(url) = &self.products_url {
            config.products_url.clone_from(url);
        }
        if let Some(url) = &self.categories_url {
            config.categories_url.clone_from(url);
        }
        if let Some(Commands::Categories {
            max_concurrent: Some(n),
        }) = &self.command
        {
            config.max_concurrent_categories = (*n).max(1);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = catdump_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    cli.apply_overrides(&mut config);
    tracing::info!(
        output_dir = %config.output_dir.display(),
        max_attempts = ?config.retry_max_attempts,
        backoff = %config.retry_backoff,
        "starting catalog dump"
    );
    tracing::debug!(?config, "configuration loaded");

    match cli.mode() {
        DumpMode::Products => dump::run_products(&config).await?,
        DumpMode::Categories => dump::run_categories(&config).await?,
    }

    Ok(())
}
