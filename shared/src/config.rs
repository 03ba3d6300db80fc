use std::{env, path::Path};

use anyhow::{Context, Result};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

pub struct ClientConfig {
    /// Root URL of the garage REST API, without the `/api/v1` suffix
    pub api_url: String,
    /// Address the dashboard binds to
    pub listen_addr: String,
}

impl ClientConfig {
    pub fn load(manifest_dir: &Path) -> Result<Self> {
        #[cfg(debug_assertions)]
        if let Err(e) = dotenvy::from_path(manifest_dir.join(".env")) {
            tracing::debug!("No .env file loaded: {e}");
        }
        #[cfg(not(debug_assertions))]
        let _ = manifest_dir;

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("GARAGE_API_URL")
            .filter(|url| !url.trim().is_empty())
            .context("Expected GARAGE_API_URL in environment")?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            listen_addr: lookup("GARAGE_LISTEN_ADDR")
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned()),
        })
    }
}

/// Load client config using the calling crate's manifest directory.
#[macro_export]
macro_rules! load_client_config {
    () => {
        $crate::config::ClientConfig::load(std::path::Path::new(env!("CARGO_MANIFEST_DIR")))
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn requires_api_url() {
        assert!(ClientConfig::from_lookup(lookup(&[])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("GARAGE_API_URL", "  ")])).is_err());
    }

    #[test]
    fn trims_trailing_slash_and_defaults_listen_addr() {
        let config =
            ClientConfig::from_lookup(lookup(&[("GARAGE_API_URL", "http://api:8080/")])).unwrap();
        assert_eq!(config.api_url, "http://api:8080");
        assert_eq!(config.listen_addr, "0.0.0.0:8000");
    }

    #[test]
    fn honours_listen_addr_override() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("GARAGE_API_URL", "http://api:8080"),
            ("GARAGE_LISTEN_ADDR", "127.0.0.1:3000"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
    }
}
