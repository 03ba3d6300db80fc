pub mod analytics;
pub mod breadcrumbs;
pub mod fleet;
pub mod forms;
pub mod record_actions;
pub mod records;
pub mod reminders;
pub mod vehicle_detail;

use axum::http::header;
use axum::response::IntoResponse;
use maud::{DOCTYPE, Markup, html};
use serde::Deserialize;

use crate::context::{PageContext, Theme};
use crate::styles::{self, Global};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";

#[derive(Deserialize, Default)]
pub struct ThemeQuery {
    pub theme: Option<Theme>,
}

pub async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], styles::ALL.as_str())
}

/// Full HTML document around `content`. `path` is the page's own URL, used
/// for the theme switch link.
pub fn page_shell(title: &str, path: &str, ctx: &PageContext, content: Markup) -> Markup {
    let toggle = format!("{path}?theme={}", ctx.theme.toggled().as_str());
    html! {
        (DOCTYPE)
        html lang="en" data-theme=(ctx.theme.as_str()) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/styles.css";
                script src=(HTMX_SRC) {}
            }
            body {
                header.(Global::PAGE_HEADER) {
                    a href=(ctx.link("/")) { h1 { "> garage" } }
                    a.(Global::THEME_TOGGLE) href=(toggle) {
                        "[" (ctx.theme.toggled().as_str()) " mode]"
                    }
                }
                (content)
            }
        }
    }
}
