//! Selector-based extraction of headings, links, images, metadata and text.

mod document;
mod options;
mod types;

pub use document::{DocumentParser, HtmlParser};
pub use options::{ExtractOptions, ExtractProfile};
pub use types::{Headings, Image, Link, ScrapeResult};

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

// Compiled once; the selector strings are constants.
static HEADING_SELECTORS: Lazy<Vec<(String, Selector)>> = Lazy::new(|| {
    (1..=6)
        .map(|level| {
            let tag = format!("h{}", level);
            let selector = Selector::parse(&tag).expect("Failed to parse heading selector");
            (tag, selector)
        })
        .collect()
});

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("Failed to parse link selector")
});

static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img").expect("Failed to parse image selector")
});

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[content]").expect("Failed to parse meta selector")
});

static CONTENT_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[^\s]+").expect("Failed to compile URL pattern")
});

/// Elements whose text is never rendered.
const HIDDEN_TEXT_PARENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct Extractor {
    options: ExtractOptions,
    parser: Box<dyn HtmlParser>,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self::with_parser(options, DocumentParser)
    }

    pub fn with_parser(options: ExtractOptions, parser: impl HtmlParser + 'static) -> Self {
        Self {
            options,
            parser: Box::new(parser),
        }
    }

    /// Parse `html` and pull out every field enabled in the options.
    /// Never fails: missing elements give empty collections.
    pub fn extract(&self, html: &str) -> ScrapeResult {
        let document = self.parser.parse(html);
        let opts = &self.options;

        let text = opts.needs_text().then(|| visible_text(&document));

        ScrapeResult {
            headings: opts
                .headings
                .then(|| headings(&document, opts.max_headings_per_level)),
            links: opts.links.then(|| links(&document, opts.max_links)),
            content_links: match (&text, opts.content_links) {
                (Some(text), true) => Some(content_links(text, opts.max_content_links)),
                _ => None,
            },
            images: opts.images.then(|| images(&document, opts.max_images)),
            metadata: opts.metadata.then(|| metadata(&document)),
            content: if opts.content { text } else { None },
        }
    }
}

fn cap(limit: Option<usize>) -> usize {
    limit.unwrap_or(usize::MAX)
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn headings(document: &Html, per_level: Option<usize>) -> Headings {
    HEADING_SELECTORS
        .iter()
        .map(|(tag, selector)| {
            let texts = document
                .select(selector)
                .take(cap(per_level))
                .map(trimmed_text)
                .collect();
            (tag.clone(), texts)
        })
        .collect()
}

pub fn links(document: &Html, limit: Option<usize>) -> Vec<Link> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(Link {
                text: trimmed_text(element),
                href: href.to_string(),
            })
        })
        .take(cap(limit))
        .collect()
}

pub fn images(document: &Html, limit: Option<usize>) -> Vec<Image> {
    document
        .select(&IMAGE_SELECTOR)
        .take(cap(limit))
        .map(|element| {
            let img = element.value();
            Image {
                src: img.attr("src").map(str::to_string),
                alt: img.attr("alt").unwrap_or_default().to_string(),
            }
        })
        .collect()
}

pub fn metadata(document: &Html) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    for element in document.select(&META_SELECTOR) {
        let meta = element.value();
        let content = match meta.attr("content") {
            Some(content) if !content.is_empty() => content,
            _ => continue,
        };
        let key = meta
            .attr("name")
            .or_else(|| meta.attr("property"))
            .unwrap_or("unknown");
        metadata.insert(key.to_string(), content.to_string());
    }
    metadata
}

/// Text nodes in document order, trimmed, blank ones dropped, one per line.
pub fn visible_text(document: &Html) -> String {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| HIDDEN_TEXT_PARENTS.contains(&element.name()))
            });
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn content_links(text: &str, limit: Option<usize>) -> Vec<String> {
    CONTENT_URL
        .find_iter(text)
        .take(cap(limit))
        .map(|m| m.as_str().to_string())
        .collect()
}
