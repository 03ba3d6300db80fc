use maud::{Markup, html};

use crate::styles::Breadcrumbs as BreadcrumbClass;

pub struct Breadcrumb<'a> {
    pub label: &'a str,
    pub href: Option<&'a str>,
}

pub fn breadcrumbs(items: &[Breadcrumb]) -> Markup {
    html! {
        nav.(BreadcrumbClass::BREADCRUMBS) {
            @for (i, item) in items.iter().enumerate() {
                @if i > 0 {
                    span.(BreadcrumbClass::SEPARATOR) { "/" }
                }
                @match item.href {
                    Some(href) => a href=(href) { (item.label) },
                    None => span.(BreadcrumbClass::CURRENT) { (item.label) },
                }
            }
        }
    }
}
