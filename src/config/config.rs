//!
//! Documentation of the config module.
//! Sets up the 'config' and 'logger'.
//!



extern crate confy;

use serde::{Serialize, Deserialize};
use std::default::Default;
use std::str::FromStr;

use super::manifest::deriver::DerivationRules;

/// The name of the config file, created with defaults when missing
pub const CONFIG_FILE: &str = "manifest-sheet.toml";

/// Where manifests are kept
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongodb,
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConfyConfig {
    pub print_log: bool,
    pub log_file: String,
    pub log_level: String,
    pub storage: StorageBackend,
    pub database: String,
    pub database_ip: String,
    pub timeout: u64,
    pub manifest_collection: String,
    /// How many manifests the "latest" listing returns
    pub latest_limit: i64,
    pub rules: DerivationRules,
}

///Config check
impl Default for ConfyConfig {
    fn default() -> Self {
        ConfyConfig {
            print_log: false,
            log_file: "output.log".to_string(),
            log_level: "debug".to_string(),
            storage: StorageBackend::Mongodb,
            database: "manifest_sheet".to_string(),
            database_ip: "mongodb://localhost:27017/".to_string(),
            timeout: 2,
            manifest_collection: "manifests".to_string(),
            latest_limit: 7,
            rules: DerivationRules::default(),
        }
    }
}

/// Initialize config and load
pub async fn init() -> Result<ConfyConfig, confy::ConfyError> {
    confy::load_path(CONFIG_FILE)
}

/// Sets up logger
pub async fn setup_logger(file: &ConfyConfig) -> Result<(), fern::InitError> {
    let level = log::LevelFilter::from_str(&file.log_level).unwrap_or(log::LevelFilter::Debug);

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        // rocket and the driver are chatty below warn
        .level_for("rocket", log::LevelFilter::Warn)
        .level_for("mongodb", log::LevelFilter::Warn);

    if file.print_log {
        dispatch = dispatch.chain(std::io::stdout());
    }

    dispatch
        .chain(fern::log_file(&file.log_file)?)
        .apply()?;

    Ok(())
}
