// Page content and the ordered page store
//
// A page is either plain text or a structured document (the rich "card"
// most chat platforms support). Only documents take part in template
// merging; plain text pages get placeholder substitution only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of content shown at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Text(String),
    Document(Document),
}

impl Page {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Footer text of a document page, if any
    pub fn footer_text(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Document(doc) => doc.footer.as_ref().and_then(|f| f.text.as_deref()),
        }
    }
}

impl From<Document> for Page {
    fn from(doc: Document) -> Self {
        Self::Document(doc)
    }
}

/// Structured page content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// RGB color, e.g. 0x5865F2
    pub color: Option<u32>,
    pub timestamp: Option<DateTime<Utc>>,
    pub author: Option<Author>,
    pub footer: Option<Footer>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub fields: Vec<Field>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn footer(mut self, footer: Footer) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// Document footer; the text slot carries the page indicator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub text: Option<String>,
    pub icon_url: Option<String>,
}

impl Footer {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            icon_url: None,
        }
    }

    pub fn icon(icon_url: impl Into<String>) -> Self {
        Self {
            text: None,
            icon_url: Some(icon_url.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Store
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered sequence of pages
///
/// The store itself allows mutation at any time; the paginator only exposes
/// it while the session is still idle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageStore {
    pages: Vec<Page>,
}

impl PageStore {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn append(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn replace_all(&mut self, pages: Vec<Page>) {
        self.pages = pages;
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Index of the final page, `None` for an empty store
    pub fn last_index(&self) -> Option<usize> {
        self.pages.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

impl FromIterator<Page> for PageStore {
    fn from_iter<I: IntoIterator<Item = Page>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}
