//! Job-description text selection from raw HTML.
//!
//! ### Noise Removal
//! - Drops script, style, noscript, nav, header, footer, button and aside
//!   elements, plus elements whose class or id names a navigation/menu/sidebar
//!   region.
//!
//! ### Vendor Rules
//! - When the URL belongs to a known ATS (see [`AtsVendor`]), the vendor's
//!   selectors are tried in priority order.
//!
//! ### Generic Fallback
//! - `<main>`, then `<article>`, then `[role="main"]`, then the whole document.
//!
//! Selection is a pure function of `(html, url)`: same input, same output.

pub mod sanitize;
pub mod vendor;

pub use sanitize::clean;
pub use vendor::AtsVendor;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

static NOISE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(concat!(
        "script, style, noscript, nav, header, footer, button, aside, ",
        ".navigation, .nav, .menu, .footer, .header, .sidebar, ",
        "#header, #footer, #navigation",
    ))
    .expect("valid noise selector")
});

static GENERIC: LazyLock<[(Strategy, Selector); 3]> = LazyLock::new(|| {
    [
        (Strategy::Main, Selector::parse("main").expect("valid selector")),
        (Strategy::Article, Selector::parse("article").expect("valid selector")),
        (Strategy::RoleMain, Selector::parse(r#"[role="main"]"#).expect("valid selector")),
    ]
});

/// Which rule produced the selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Vendor(AtsVendor),
    Main,
    Article,
    RoleMain,
    Document,
}

/// Text chosen from a document, before sanitizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub text: String,
    pub strategy: Strategy,
}

/// Visible text of an element: trimmed text nodes joined by single spaces.
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First match still attached under the root whose text survives sanitizing.
///
/// `Html::select` scans every node in the arena, detached ones included, so
/// queries go through the root element instead.
fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.root_element()
        .select(selector)
        .map(visible_text)
        .find(|text| !clean(text).is_empty())
}

fn strip_noise(doc: &mut Html) {
    let ids: Vec<_> = doc.select(&NOISE).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Pick the job-description text out of `html` fetched from `url`.
pub fn select(html: &str, url: &str) -> Selection {
    let mut doc = Html::parse_document(html);
    strip_noise(&mut doc);

    for vendor in AtsVendor::detect(url) {
        for selector in vendor.selectors() {
            if let Some(text) = first_text(&doc, selector) {
                return Selection { text, strategy: Strategy::Vendor(vendor) };
            }
        }
        tracing::debug!(vendor = ?vendor, url, "no vendor selector matched; trying generic fallbacks");
    }

    for (strategy, selector) in GENERIC.iter() {
        if let Some(text) = first_text(&doc, selector) {
            return Selection { text, strategy: *strategy };
        }
    }

    Selection { text: visible_text(doc.root_element()), strategy: Strategy::Document }
}

/// Raw selected text for `html` fetched from `url`.
pub fn select_text(html: &str, url: &str) -> String {
    select(html, url).text
}

/// Selected and sanitized text, ready for callers.
pub fn extract_text(html: &str, url: &str) -> String {
    clean(&select_text(html, url))
}

/// First `max` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
