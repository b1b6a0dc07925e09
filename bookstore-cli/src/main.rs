use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bookstore_application::Bookstore;
use bookstore_application::context::AppContext;
use bookstore_domain::settings::{CatalogueSettings, StockPolicy};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

mod menu;

use menu::Menu;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "bookstore",
    about = "In-memory catalogue management for a small bookstore",
    version
)]
struct Cli {
    /// CSV (or .json) file with books to import before the menu starts
    #[clap(long, env = "BOOKSTORE_IMPORT")]
    import: Option<PathBuf>,

    /// CSV (or .json) file used by the menu's "Add books from a data file" option
    #[clap(long, env = "BOOKSTORE_DATA_FILE", default_value = "books_data.csv")]
    data_file: PathBuf,

    /// Allow stock adjustments that take a book below zero
    #[clap(long, env = "BOOKSTORE_ALLOW_NEGATIVE_STOCK")]
    allow_negative_stock: bool,

    /// Set log level
    #[clap(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

impl Cli {
    fn settings(&self) -> CatalogueSettings {
        let policy = if self.allow_negative_stock {
            StockPolicy::AllowNegative
        } else {
            StockPolicy::RejectBelowZero
        };
        CatalogueSettings::builder().stock_policy(policy).build()
    }
}

fn initialize_tracing(log_level: &LogLevel) {
    // 日志写 stderr，stdout 留给菜单
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_filter_directive()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let store = Bookstore::new(cli.settings()).context("failed to set up the bookstore")?;

    if let Some(path) = &cli.import {
        let ctx = AppContext::for_actor("startup");
        let report = store
            .import_file(&ctx, path)
            .with_context(|| format!("failed to import {}", path.display()))?;
        println!("{report}\n");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(&store, cli.data_file, stdin.lock(), stdout.lock());
    menu.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["bookstore"]).unwrap();
        assert_eq!(cli.data_file, PathBuf::from("books_data.csv"));
        assert!(cli.import.is_none());
        assert_eq!(cli.settings().stock_policy(), StockPolicy::RejectBelowZero);
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "bookstore",
            "--import",
            "seed.csv",
            "--allow-negative-stock",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.import, Some(PathBuf::from("seed.csv")));
        assert_eq!(cli.settings().stock_policy(), StockPolicy::AllowNegative);
        assert_eq!(cli.log_level.to_filter_directive(), "debug");
    }
}
