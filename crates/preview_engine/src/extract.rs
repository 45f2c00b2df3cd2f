use scraper::{ElementRef, Html, Selector};

use crate::excerpt::{collapse_whitespace, strip_permalink, truncate_at_word, PERMALINK_MARKER};
use crate::PagePreview;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractSettings {
    /// Selector of the primary content container; pages without it have no preview.
    pub content_selector: String,
    /// A paragraph must be longer than this to serve as the excerpt.
    pub min_paragraph_chars: usize,
    pub excerpt_max_chars: usize,
    pub max_sections: usize,
    pub permalink_marker: char,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            content_selector: ".md-content".to_string(),
            min_paragraph_chars: 20,
            excerpt_max_chars: 300,
            max_sections: 5,
            permalink_marker: PERMALINK_MARKER,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("invalid content selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

pub trait Extractor: Send + Sync {
    /// Builds a preview of the page at `url`, or `None` when it has nothing to show.
    fn extract(&self, html: &str, url: &str) -> Option<PagePreview>;
}

/// Extractor for the documentation page template:
/// - title from the first `h1` in the content container, falling back to the URL
/// - excerpt from the first substantial `p`
/// - section names from the leading `h2`s
#[derive(Debug)]
pub struct DocPageExtractor {
    settings: ExtractSettings,
    content: Selector,
    heading: Selector,
    paragraph: Selector,
    section: Selector,
}

impl DocPageExtractor {
    pub fn new(settings: ExtractSettings) -> Result<Self, ExtractError> {
        let content = Selector::parse(&settings.content_selector).map_err(|err| {
            ExtractError::InvalidSelector {
                selector: settings.content_selector.clone(),
                message: err.to_string(),
            }
        })?;
        Ok(Self {
            content,
            heading: fixed_selector("h1"),
            paragraph: fixed_selector("p"),
            section: fixed_selector("h2"),
            settings,
        })
    }

    fn heading_text(&self, element: ElementRef<'_>) -> String {
        strip_permalink(
            &collapse_whitespace(&element.text().collect::<String>()),
            self.settings.permalink_marker,
        )
    }
}

impl Default for DocPageExtractor {
    fn default() -> Self {
        Self {
            settings: ExtractSettings::default(),
            content: fixed_selector(".md-content"),
            heading: fixed_selector("h1"),
            paragraph: fixed_selector("p"),
            section: fixed_selector("h2"),
        }
    }
}

impl Extractor for DocPageExtractor {
    fn extract(&self, html: &str, url: &str) -> Option<PagePreview> {
        let doc = Html::parse_document(html);
        let content = doc.select(&self.content).next()?;

        let title = content
            .select(&self.heading)
            .next()
            .map(|h1| self.heading_text(h1))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| url.to_string());

        let excerpt = content
            .select(&self.paragraph)
            .map(|p| collapse_whitespace(&p.text().collect::<String>()))
            .find(|text| text.chars().count() > self.settings.min_paragraph_chars)
            .map(|text| truncate_at_word(&text, self.settings.excerpt_max_chars))
            .unwrap_or_default();

        let sections = content
            .select(&self.section)
            .take(self.settings.max_sections)
            .map(|h2| self.heading_text(h2))
            .filter(|name| !name.is_empty())
            .collect();

        Some(PagePreview {
            title,
            excerpt,
            sections,
        })
    }
}

// Only for selectors written in this file.
fn fixed_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|err| panic!("static selector {css:?}: {err}"))
}
