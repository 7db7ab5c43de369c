use scraper::Html;

/// Turns raw markup into a document tree. Implementations must not fail;
/// malformed input yields whatever tree the parser can recover.
pub trait HtmlParser: Send + Sync {
    fn parse(&self, html: &str) -> Html;
}

/// Error-tolerant full-document parsing via html5ever.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl HtmlParser for DocumentParser {
    fn parse(&self, html: &str) -> Html {
        Html::parse_document(html)
    }
}
