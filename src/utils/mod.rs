use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Once,
};

use crate::errors::TallyError;

const DEFAULT_DIR_NAME: &str = ".tally_core";
const CONFIG_FILE: &str = "config.json";
const STORE_FILE: &str = "store.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("tally_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Returns the application data directory, defaulting to `~/.tally_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("TALLY_CORE_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Canonical path of the persisted engine configuration.
pub fn config_file() -> PathBuf {
    app_data_dir().join(CONFIG_FILE)
}

/// Canonical path of the local store snapshot.
pub fn store_file() -> PathBuf {
    app_data_dir().join(STORE_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<(), TallyError> {
    fs::create_dir_all(path)?;
    Ok(())
}
