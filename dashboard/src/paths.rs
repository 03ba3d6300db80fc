//! Data directory paths for local configuration.

pub const DASHBOARD_CONFIG_PATH: &str = "data/dashboard.toml";
