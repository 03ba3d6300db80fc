//! Per-request render inputs handed down the view tree.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Everything a view needs besides the data it renders.
#[derive(Clone, Debug, PartialEq)]
pub struct PageContext {
    pub theme: Theme,
    pub currency: String,
}

impl PageContext {
    pub fn new(theme: Theme, currency: impl Into<String>) -> Self {
        Self {
            theme,
            currency: currency.into(),
        }
    }

    /// Formats an amount in the page currency.
    pub fn money(&self, amount: f64) -> String {
        crate::format::format_currency(amount, &self.currency)
    }

    /// Appends the theme to an in-app link so it survives navigation.
    pub fn link(&self, path: &str) -> String {
        let sep = if path.contains('?') { '&' } else { '?' };
        format!("{path}{sep}theme={}", self.theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_carry_theme() {
        let ctx = PageContext::new(Theme::Light, "₹");
        assert_eq!(ctx.link("/vehicles/3"), "/vehicles/3?theme=light");
        assert_eq!(ctx.link("/fragments/x?tab=fuel"), "/fragments/x?tab=fuel&theme=light");
    }
}
