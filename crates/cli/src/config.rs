use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/moim.toml";

/// Trip-level configuration: the roster and budget live here, not in the
/// ledger file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub trip: String,
    pub budget: i64,
    pub members: Vec<String>,
    pub ledger: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            trip: "Trip".to_string(),
            budget: 0,
            members: vec![
                "ME".to_string(),
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
            ],
            ledger: "moim_ledger.json".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Loads configuration: TOML file (optional), then `MOIM_*` environment
/// variables. Flag overrides are applied by the caller.
pub fn load(path: Option<&str>) -> Result<AppConfig> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("MOIM"));
    Ok(builder.build()?.try_deserialize()?)
}
