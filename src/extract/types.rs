use serde::Serialize;
use std::collections::BTreeMap;

/// Heading text keyed by `"h1"` through `"h6"`.
pub type Headings = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub src: Option<String>,
    pub alt: String,
}

/// Structured data pulled from one page. Fields turned off in the
/// extraction options are `None` and left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headings: Option<Headings>,
    #[serde(rename = "links_from_tags", skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(rename = "links_from_content", skip_serializing_if = "Option::is_none")]
    pub content_links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
