use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    domain::common::MonthKey,
    errors::TallyError,
    utils::{self, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";

/// Month bucket for entries whose timestamp never materialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum MonthFallback {
    /// Bucket into the wall-clock month at recompute time. Matches the
    /// historical dashboard behavior.
    #[default]
    CurrentMonth,
    /// Bucket into a fixed month.
    Fixed(MonthKey),
    /// Leave the entry out of the monthly series; overall totals still
    /// include it.
    Skip,
}

/// Tunable aggregation behavior. The historical dashboard variants diverged
/// on exactly these points; they are configuration here, not separate code
/// paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Category that blank expense categories bucket under.
    pub default_category: String,
    #[serde(default)]
    pub month_fallback: MonthFallback,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_category: "Other".into(),
            month_fallback: MonthFallback::default(),
        }
    }
}

/// Loads and persists the engine configuration as JSON.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, TallyError> {
        let path = utils::config_file();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<EngineConfig, TallyError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(EngineConfig::default())
        }
    }

    pub fn save(&self, config: &EngineConfig) -> Result<(), TallyError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), TallyError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
