//! Template merging and live page indicators
//!
//! A [`DocumentTemplate`] carries fields shared by every document page. When a
//! page is rendered, present template fields win over the page's own. The
//! footer text slot is reserved for the page indicator: its format is taken
//! from the first rendered document (or the default) and frozen for the
//! rest of the session.

use crate::page::{Document, Footer, Page};

/// Placeholder for the 1-based current page number
pub const CURRENT_PLACEHOLDER: &str = "{current}";
/// Placeholder for the total page count
pub const TOTAL_PLACEHOLDER: &str = "{total}";
/// Indicator used when no document supplies a footer
pub const DEFAULT_FOOTER_FORMAT: &str = "Page {current}/{total}";

/// Replace both placeholders in `text`
pub fn substitute(text: &str, current: usize, total: usize) -> String {
    text.replace(CURRENT_PLACEHOLDER, &current.to_string())
        .replace(TOTAL_PLACEHOLDER, &total.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Footer Format
// ─────────────────────────────────────────────────────────────────────────────

/// Frozen page-indicator format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterFormat(String);

impl FooterFormat {
    /// Derive a format from authored footer text.
    ///
    /// Text without any placeholder is kept as a static prefix and the
    /// default indicator is appended, so the page number is always shown.
    pub fn from_footer_text(text: &str) -> Self {
        if text.contains(CURRENT_PLACEHOLDER) || text.contains(TOTAL_PLACEHOLDER) {
            Self(text.to_string())
        } else {
            Self(format!("{} • {}", text, DEFAULT_FOOTER_FORMAT))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, current: usize, total: usize) -> String {
        substitute(&self.0, current, total)
    }
}

impl Default for FooterFormat {
    fn default() -> Self {
        Self(DEFAULT_FOOTER_FORMAT.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Template
// ─────────────────────────────────────────────────────────────────────────────

/// Shared fields applied over every document page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTemplate {
    fields: Document,
}

impl DocumentTemplate {
    pub fn new(fields: Document) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Document {
        &self.fields
    }

    /// Overwrite `doc` with every field this template defines
    pub fn apply_to(&self, doc: &mut Document) {
        let t = &self.fields;
        if let Some(author) = &t.author {
            doc.author = Some(author.clone());
        }
        if let Some(color) = t.color {
            doc.color = Some(color);
        }
        if let Some(description) = &t.description {
            doc.description = Some(description.clone());
        }
        if !t.fields.is_empty() {
            doc.fields = t.fields.clone();
        }
        if let Some(footer) = &t.footer {
            doc.footer = Some(footer.clone());
        }
        if let Some(image) = &t.image {
            doc.image = Some(image.clone());
        }
        if let Some(thumbnail) = &t.thumbnail {
            doc.thumbnail = Some(thumbnail.clone());
        }
        if let Some(timestamp) = t.timestamp {
            doc.timestamp = Some(timestamp);
        }
        if let Some(title) = &t.title {
            doc.title = Some(title.clone());
        }
        if let Some(url) = &t.url {
            doc.url = Some(url.clone());
        }
    }
}

impl From<Document> for DocumentTemplate {
    fn from(fields: Document) -> Self {
        Self::new(fields)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Merger
// ─────────────────────────────────────────────────────────────────────────────

/// Renders stored pages into displayable content for one session
#[derive(Debug, Clone, Default)]
pub struct TemplateMerger {
    template: Option<DocumentTemplate>,
    footer_format: Option<FooterFormat>,
}

impl TemplateMerger {
    pub fn new(template: Option<DocumentTemplate>) -> Self {
        Self {
            template,
            footer_format: None,
        }
    }

    pub fn template(&self) -> Option<&DocumentTemplate> {
        self.template.as_ref()
    }

    /// Replace the template; only meaningful before the first render
    pub fn set_template(&mut self, template: Option<DocumentTemplate>) {
        self.template = template;
    }

    /// The frozen footer format, once a document has been rendered
    pub fn footer_format(&self) -> Option<&FooterFormat> {
        self.footer_format.as_ref()
    }

    /// Render `page` at 0-based `index` out of `total` pages
    pub fn render(&mut self, page: &Page, index: usize, total: usize) -> Page {
        let current = index + 1;
        match page {
            Page::Text(text) => Page::Text(substitute(text, current, total)),
            Page::Document(doc) => {
                let mut doc = doc.clone();
                if let Some(template) = &self.template {
                    template.apply_to(&mut doc);
                }

                let footer = doc.footer.get_or_insert_with(Footer::default);
                let format = self.footer_format.get_or_insert_with(|| {
                    let format = footer
                        .text
                        .as_deref()
                        .filter(|text| !text.is_empty())
                        .map(FooterFormat::from_footer_text)
                        .unwrap_or_default();
                    tracing::debug!(format = format.as_str(), "Captured footer format");
                    format
                });
                footer.text = Some(format.render(current, total));

                Page::Document(doc)
            }
        }
    }
}
