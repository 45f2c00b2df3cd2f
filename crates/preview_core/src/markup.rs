/// Parsed summary of a linked page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewData {
    pub title: String,
    /// Empty when the page has no paragraph long enough to quote.
    pub excerpt: String,
    pub sections: Vec<String>,
}

/// What the tooltip currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TooltipContent {
    Loading,
    Preview(PreviewData),
}

impl TooltipContent {
    /// Renders the tooltip body. Page text is always escaped.
    pub fn to_markup(&self) -> String {
        match self {
            TooltipContent::Loading => {
                "<div class=\"link-preview-loading\">Loading\u{2026}</div>".to_string()
            }
            TooltipContent::Preview(data) => render_preview(data),
        }
    }
}

fn render_preview(data: &PreviewData) -> String {
    let mut html = format!(
        "<div class=\"link-preview-title\">{}</div>",
        escape_html(&data.title)
    );
    if !data.excerpt.is_empty() {
        html.push_str("<div class=\"link-preview-excerpt\">");
        html.push_str(&escape_html(&data.excerpt));
        html.push_str("</div>");
    }
    if !data.sections.is_empty() {
        html.push_str("<div class=\"link-preview-sections\">");
        for section in &data.sections {
            html.push_str("<span class=\"link-preview-section\"># ");
            html.push_str(&escape_html(section));
            html.push_str("</span>");
        }
        html.push_str("</div>");
    }
    html
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
