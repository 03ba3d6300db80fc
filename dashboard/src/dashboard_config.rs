use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::Theme;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Currency symbol used when the API's `/config` endpoint is unreachable.
    pub currency: String,
    pub request_timeout_secs: u64,
    pub default_theme: Theme,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            currency: "₹".to_owned(),
            request_timeout_secs: 10,
            default_theme: Theme::Dark,
        }
    }
}

impl DashboardConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn parse(content: &str) -> io::Result<DashboardConfig> {
    toml::from_str(content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Loads the dashboard config. Returns `DashboardConfig::default()` if the
/// file doesn't exist; propagates other I/O and parse errors.
pub fn load(path: &Path) -> io::Result<DashboardConfig> {
    match fs::read_to_string(path) {
        Ok(content) => parse(&content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DashboardConfig::default()),
        Err(e) => Err(e),
    }
}
