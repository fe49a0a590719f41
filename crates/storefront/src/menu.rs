//! Menu catalog.
//!
//! The menu is a JSON array of `{name, price, category, description}`
//! records. [`MenuQuery`] narrows it by category, free-text search and price
//! range; all given constraints must hold.

use std::path::{Path, PathBuf};

use askama::Template;
use movenpick_core::Money;
use serde::Deserialize;
use thiserror::Error;

/// Category value that means "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Errors loading or querying the menu.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("failed to read menu {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid menu file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No menu item named \"{0}\"")]
    UnknownItem(String),
}

/// One dish or drink.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: Money,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl MenuItem {
    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Filter over the menu. Empty fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuQuery {
    /// Exact category; `"all"` means any.
    pub category: Option<String>,
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
}

impl MenuQuery {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
    }

    /// Trimmed, lowercased search text, if any.
    #[must_use]
    pub fn search_text(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn accepts(&self, item: &MenuItem) -> bool {
        self.category()
            .is_none_or(|category| item.category.eq_ignore_ascii_case(category))
            && self
                .search_text()
                .is_none_or(|needle| item.matches_search(&needle))
            && self.min_price.is_none_or(|min| item.price >= min)
            && self.max_price.is_none_or(|max| item.price <= max)
    }
}

/// The full menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    #[must_use]
    pub const fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Parse a menu from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a menu array.
    pub fn from_json(raw: &str) -> Result<Self, MenuError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read a menu file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, MenuError> {
        let raw = std::fs::read_to_string(path).map_err(|source| MenuError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let menu = Self::from_json(&raw)?;
        tracing::debug!(path = %path.display(), items = menu.items.len(), "Menu loaded");
        Ok(menu)
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Distinct categories in menu order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
            }
        }
        seen
    }

    /// Items accepted by `query`, in menu order.
    #[must_use]
    pub fn filter(&self, query: &MenuQuery) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| query.accepts(item)).collect()
    }

    /// Look up an item by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::UnknownItem`] if nothing matches.
    pub fn find(&self, name: &str) -> Result<&MenuItem, MenuError> {
        let name = name.trim();
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| MenuError::UnknownItem(name.to_string()))
    }
}

/// Result line shown above a searched menu, `None` when not searching.
#[must_use]
pub fn search_summary(count: usize, query: &str) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    Some(match count {
        0 => format!("No results found for \"{query}\""),
        1 => format!("Found 1 result for \"{query}\""),
        n => format!("Found {n} results for \"{query}\""),
    })
}

/// Menu row display data.
#[derive(Debug, Clone)]
pub struct MenuItemView {
    pub name: String,
    pub price: String,
    pub category: String,
    pub description: String,
}

impl From<&MenuItem> for MenuItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price.to_string(),
            category: item.category.clone(),
            description: item.description.clone(),
        }
    }
}

/// Plain-text menu listing.
#[derive(Template)]
#[template(path = "menu/list.txt")]
pub struct MenuListTemplate {
    pub summary: Option<String>,
    pub items: Vec<MenuItemView>,
}

impl MenuListTemplate {
    /// Listing of `menu` narrowed by `query`.
    #[must_use]
    pub fn new(menu: &Menu, query: &MenuQuery) -> Self {
        let items = menu.filter(query);
        let summary = query
            .search
            .as_deref()
            .map(str::trim)
            .and_then(|q| search_summary(items.len(), q));
        Self {
            summary,
            items: items.into_iter().map(MenuItemView::from).collect(),
        }
    }
}
