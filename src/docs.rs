//! Documentation lookup.
//!
//! The UI only sees the [`DocIndex`] trait. [`JsonDocIndex`] is the shipped
//! implementation: a pre-built JSON array of entries loaded once at
//! startup from `docs.json` beside the user config.
//!
//! Search runs in three tiers and keeps the first hit for each entry:
//! exact keyword match, then title substring, then content substring.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::config_dir;
use crate::constants::DOCS_INDEX_FILE;
use crate::error::ClientError;

/// One documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocEntry {
    /// Page title, e.g. `Iota ⍳`.
    pub title: String,
    /// Lookup keywords such as the glyph and its names.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Page body as plain text.
    #[serde(default)]
    pub content: String,
}

/// Searchable documentation.
pub trait DocIndex {
    /// Up to `limit` entries matching `query`, best tier first.
    fn search(&self, query: &str, limit: usize) -> Vec<&DocEntry>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// True when there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Index loaded from a JSON array of [`DocEntry`].
#[derive(Debug, Default, Clone)]
pub struct JsonDocIndex {
    entries: Vec<DocEntry>,
}

impl JsonDocIndex {
    /// Wrap already-loaded entries.
    pub fn from_entries(entries: Vec<DocEntry>) -> Self {
        Self { entries }
    }

    /// Parse index text.
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        let entries: Vec<DocEntry> =
            serde_json::from_str(text).map_err(|e| ClientError::Decode(format!("docs index: {e}")))?;
        Ok(Self { entries })
    }

    /// Load from `path`.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Default index location.
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(DOCS_INDEX_FILE))
    }

    /// Load the default index if one exists.
    pub fn load_default() -> Option<Self> {
        let path = Self::default_path()?;
        match Self::load(&path) {
            Ok(index) => {
                log::info!("Loaded {} doc entries from {}", index.entries.len(), path.display());
                Some(index)
            }
            Err(e) => {
                log::info!("No docs index at {}: {e}", path.display());
                None
            }
        }
    }
}

impl DocIndex for JsonDocIndex {
    fn search(&self, query: &str, limit: usize) -> Vec<&DocEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.entries.iter().take(limit).collect();
        }

        let tiers: [&dyn Fn(&DocEntry) -> bool; 3] = [
            &|e: &DocEntry| e.keywords.iter().any(|k| k.to_lowercase() == query),
            &|e: &DocEntry| e.title.to_lowercase().contains(&query),
            &|e: &DocEntry| e.content.to_lowercase().contains(&query),
        ];

        let mut seen = BTreeSet::new();
        let mut hits = Vec::new();
        for tier in tiers {
            for (i, entry) in self.entries.iter().enumerate() {
                if hits.len() >= limit {
                    return hits;
                }
                if !seen.contains(&i) && tier(entry) {
                    seen.insert(i);
                    hits.push(entry);
                }
            }
        }
        hits
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, keywords: &[&str], content: &str) -> DocEntry {
        DocEntry {
            title: title.into(),
            keywords: keywords.iter().map(|s| (*s).to_string()).collect(),
            content: content.into(),
        }
    }

    fn index() -> JsonDocIndex {
        JsonDocIndex::from_entries(vec![
            entry("Reshape", &["⍴", "rho"], "Shape of an array; see also iota."),
            entry("Index Generator", &["⍳", "iota"], "First n integers."),
            entry("Iota Underbar", &["⍸"], "Where."),
        ])
    }

    #[test]
    fn test_tiers_in_order_without_duplicates() {
        let idx = index();
        let titles: Vec<_> = idx.search("iota", 50).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Index Generator", "Iota Underbar", "Reshape"]);
    }

    #[test]
    fn test_limit() {
        let idx = index();
        assert_eq!(idx.search("iota", 1).len(), 1);
        assert_eq!(idx.search("", 2).len(), 2);
    }

    #[test]
    fn test_glyph_keyword() {
        let idx = index();
        assert_eq!(idx.search("⍴", 50)[0].title, "Reshape");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, r#"[{"title": "Tally", "keywords": ["≢"]}]"#).unwrap();
        let idx = JsonDocIndex::load(&path).unwrap();
        assert_eq!(idx.len(), 1);
        assert!(JsonDocIndex::parse("{").is_err());
    }
}
