//! Page scanner: finds the images and file links in one HTML document.
//!
//! The scan walks the parsed DOM once, in document order, and never fails:
//! elements whose URL is empty or excluded are skipped. Images come first,
//! followed by links, each group in the order the elements appear.

mod source;

pub use source::{PageSource, RemotePage, SnapshotPage};

use scraper::{ElementRef, Html};
use url::Url;

use crate::resource::Resource;

/// Scans `html` as if it had been loaded from `page_url`.
///
/// Relative `src`/`href` values are resolved against the document base: the
/// first `<base href>` if present, otherwise `page_url`.
pub fn scan_document(html: &str, page_url: &str) -> Vec<Resource> {
    let document = Html::parse_document(html);
    scan_parsed(&document, page_url)
}

/// Trimmed, whitespace-collapsed text of the first `<title>`, if non-empty.
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    title_of(&document)
}

pub(crate) fn scan_parsed(document: &Html, page_url: &str) -> Vec<Resource> {
    let base = document_base(document, page_url);

    let mut images = Vec::new();
    let mut files = Vec::new();
    for element in elements(document) {
        match element.value().name() {
            "img" => {
                let src = resolve(base.as_ref(), element.value().attr("src"));
                if let Some(resource) = Resource::image(&src) {
                    images.push(resource);
                }
            }
            "a" => {
                let href = resolve(base.as_ref(), element.value().attr("href"));
                if let Some(resource) = Resource::file(&href) {
                    files.push(resource);
                }
            }
            _ => {}
        }
    }

    tracing::debug!(images = images.len(), files = files.len(), "scanned document");
    images.extend(files);
    images
}

pub(crate) fn title_of(document: &Html) -> Option<String> {
    let title = elements(document).find(|e| e.value().name() == "title")?;
    let text = title.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Every element of the document in tree order, leaving out inert
/// `<template>` contents.
fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| !in_template(e))
}

fn in_template(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "template")
}

fn document_base(document: &Html, page_url: &str) -> Option<Url> {
    let page = Url::parse(page_url).ok();
    let base_href = elements(document)
        .filter(|e| e.value().name() == "base")
        .find_map(|e| e.value().attr("href"));
    let Some(href) = base_href.map(str::trim) else {
        return page;
    };
    match page {
        Some(page) => Some(page.join(href).unwrap_or(page)),
        None => Url::parse(href).ok(),
    }
}

/// What a browser reports for a URL attribute: the resolved absolute URL, or
/// the raw value when it cannot be resolved.
fn resolve(base: Option<&Url>, value: Option<&str>) -> String {
    let value = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return String::new(),
    };
    let resolved = match base {
        Some(base) => base.join(value),
        None => Url::parse(value),
    };
    match resolved {
        Ok(url) => url.to_string(),
        Err(_) => value.to_string(),
    }
}
