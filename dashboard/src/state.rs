use tracing::warn;

use crate::api::ApiClient;
use crate::context::{PageContext, Theme};
use crate::dashboard_config::DashboardConfig;

pub struct AppState {
    pub api: ApiClient,
    pub config: DashboardConfig,
}

impl AppState {
    pub fn new(api: ApiClient, config: DashboardConfig) -> Self {
        AppState { api, config }
    }

    /// Builds the render context for one request. The currency comes from the
    /// API when reachable, otherwise from the local config.
    pub async fn page_context(&self, theme: Option<Theme>) -> PageContext {
        let theme = theme.unwrap_or(self.config.default_theme);
        let currency = match self.api.settings().await {
            Ok(settings) if !settings.currency.is_empty() => settings.currency,
            Ok(_) => self.config.currency.clone(),
            Err(e) => {
                warn!("Falling back to configured currency: {e}");
                self.config.currency.clone()
            }
        };
        PageContext::new(theme, currency)
    }
}
