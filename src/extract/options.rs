use std::str::FromStr;

/// Which fields to extract and how many entries to keep for each.
///
/// A cap of `None` keeps everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub headings: bool,
    pub max_headings_per_level: Option<usize>,
    pub links: bool,
    pub max_links: Option<usize>,
    pub images: bool,
    pub max_images: Option<usize>,
    pub metadata: bool,
    pub content: bool,
    pub content_links: bool,
    pub max_content_links: Option<usize>,
}

impl ExtractOptions {
    /// Every field, uncapped.
    pub fn full() -> Self {
        Self {
            headings: true,
            max_headings_per_level: None,
            links: true,
            max_links: None,
            images: true,
            max_images: None,
            metadata: true,
            content: true,
            content_links: true,
            max_content_links: None,
        }
    }

    /// Headings, links and metadata only, with capped counts.
    pub fn lite() -> Self {
        Self {
            headings: true,
            max_headings_per_level: Some(10),
            links: true,
            max_links: Some(50),
            images: false,
            max_images: None,
            metadata: true,
            content: false,
            content_links: false,
            max_content_links: None,
        }
    }

    pub(crate) fn needs_text(&self) -> bool {
        self.content || self.content_links
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractProfile {
    Full,
    Lite,
}

impl ExtractProfile {
    pub fn options(self) -> ExtractOptions {
        match self {
            ExtractProfile::Full => ExtractOptions::full(),
            ExtractProfile::Lite => ExtractOptions::lite(),
        }
    }
}

impl FromStr for ExtractProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(ExtractProfile::Full),
            "lite" => Ok(ExtractProfile::Lite),
            other => Err(format!("unknown profile '{}', expected 'full' or 'lite'", other)),
        }
    }
}
