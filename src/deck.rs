//! Deck files: a set of pages plus an optional shared template
//!
//! ```toml
//! starting_page = 1
//!
//! [template]
//! color = 0x5865F2
//! footer = { text = "Handbook • Page {current}/{total}" }
//!
//! [[pages]]
//! text = "Welcome!"
//!
//! [[pages]]
//! [pages.document]
//! title = "Chapter 1"
//! ```
//!
//! Files ending in `.json` are parsed as JSON with the same shape; anything
//! else is TOML.

use crate::page::{Document, Page};
use crate::template::DocumentTemplate;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deck {
    /// Fields overlaid onto every document page
    pub template: Option<Document>,
    /// 1-based page shown first
    pub starting_page: Option<usize>,
    pub pages: Vec<Page>,
}

impl Deck {
    /// Load a deck, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read deck {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let deck = if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_toml(&contents)
        };
        deck.with_context(|| format!("Failed to parse deck {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn template(&self) -> Option<DocumentTemplate> {
        self.template.clone().map(DocumentTemplate::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Footer;

    #[test]
    fn test_toml_deck() {
        let deck = Deck::from_toml(
            r#"
starting_page = 2

[template]
color = 255
footer = { text = "Guide • {current} of {total}" }

[[pages]]
text = "Welcome"

[[pages]]
[pages.document]
title = "Chapter 1"
description = "The beginning"
timestamp = "2024-05-01T12:00:00Z"
fields = [{ name = "Level", value = "1", inline = true }]
"#,
        )
        .unwrap();

        assert_eq!(deck.starting_page, Some(2));
        assert_eq!(deck.pages.len(), 2);
        assert_eq!(deck.pages[0], Page::text("Welcome"));

        let Page::Document(doc) = &deck.pages[1] else {
            panic!("expected a document page");
        };
        assert_eq!(doc.title.as_deref(), Some("Chapter 1"));
        assert!(doc.timestamp.is_some());
        assert!(doc.fields[0].inline);

        let template = deck.template().unwrap();
        assert_eq!(template.fields().color, Some(255));
        assert_eq!(
            template.fields().footer,
            Some(Footer::text("Guide • {current} of {total}"))
        );
    }

    #[test]
    fn test_json_deck() {
        let deck = Deck::from_json(
            r#"{
                "pages": [
                    {"text": "one"},
                    {"document": {"title": "two"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(deck.pages.len(), 2);
        assert!(deck.template.is_none());
        assert_eq!(deck.starting_page, None);
    }

    #[test]
    fn test_load_reports_the_path() {
        let path = std::env::temp_dir().join(format!(
            "reaction-pager-deck-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "pages = 3").unwrap();
        let err = Deck::load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(format!("{:#}", err).contains("Failed to parse deck"));
    }

    #[test]
    fn test_missing_deck_is_an_error() {
        let path = std::env::temp_dir().join("reaction-pager-no-such-deck.json");
        assert!(Deck::load(&path).is_err());
    }
}
