//!
//! #  Manifest Sheet - delivery shift logging
//!
//! Drivers upload a manifest per shift: route, station, plate, the times of
//! the day and the odometer and package counts. The server derives the
//! worked hours, the break the driver is owed, the expense eligibility and
//! the package and distance totals, stores the manifest and reports the
//! month's totals per driver.
//!
//! * `manifest` - derivation, monthly aggregation and the application operations
//! * `ODM` - the manifest stores (MongoDB, in-memory)
//! * `routes` - the JSON API
//! * `config` - the config file and the logger
//!

#![allow(non_snake_case)]
#[macro_use] extern crate rocket;

mod routes;
mod manifest;
mod ODM;
mod config;

use anyhow::Context;
use config::config::ConfyConfig;
use routes::{StoreState, Config};
use ODM::store::ManifestStore;
use rocket::{Rocket, Build};
use log::{error, warn};

#[cfg(test)] mod tests;

/// Mounts the API over an already opened store
pub fn rocket(config: ConfyConfig, store: Box<dyn ManifestStore>) -> Rocket<Build> {
    rocket::build()
    .mount("/", routes::routes())
    .register("/", routes::catchers())
    .manage(StoreState { store })
    .manage(Config { config })
}

/// The main functions, runs w/ cargo run
#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = config::config::init().await
        .context(format!("CONFIG failed to load {}", config::config::CONFIG_FILE))?;
    config::config::setup_logger(&config).await
        .context("LOGGER failed to start")?;
    let store = ODM::odm::init(&config).await
        .context("STORE failed to open")?;
    warn!("MANIFEST SHEET IS LAUNCHING");

    let lift = rocket(config, store)
    .launch()
    .await;

    warn!("MANIFEST SHEET OVER");
    if let Err(value) = lift {
        error!("Rocket could not run, error {}", value);
    }
    Ok(())
}
