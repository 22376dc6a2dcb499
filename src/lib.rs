pub mod cli;
pub mod db;
pub mod oee;
pub mod settings;
pub mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use cli::Cli;
use db::Database;
use settings::SettingsStore;
use utils::logging::init_logging;

const APP_NAME: &str = "oee-tracker";

/// What every command needs: the record store and persisted settings.
pub struct App {
    pub db: Database,
    pub settings: SettingsStore,
}

impl App {
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
        let db = Database::new(data_dir.join("records.sqlite3"))?;
        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        Ok(Self { db, settings })
    }
}

/// Platform data directory, or `./data` when none can be determined.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    info!("OEE tracker using data directory {}", data_dir.display());

    let app = App::open(&data_dir)?;
    let output = cli::execute(&app, cli.command).await?;
    print!("{output}");
    Ok(())
}
