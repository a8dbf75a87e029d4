//! Binary entry point: read the config, start file logging, connect to the
//! customers database, and drive the Ratatui event loop until the user exits.
use customer_manager::{logging, run_app, App, Config, CustomerStore, SqliteStore};

/// A database that cannot be reached is not fatal: the UI starts on sample
/// data instead. Only config, logging and terminal failures end the process.
fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init_tracing(&config)?;

    let store = SqliteStore::connected(config.database_path()?, config.database.clone());
    if !store.is_connected() {
        tracing::warn!(
            target: "system",
            reason = store.connect_error().unwrap_or("unknown"),
            "starting with sample data"
        );
    }

    let mut app = App::new(Box::new(store));
    run_app(&mut app)
}
