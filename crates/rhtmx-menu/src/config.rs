// File: src/config.rs
// Purpose: Menu configuration parsing from rhtmx-menu.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::InvalidItemError;
use crate::item::{HtmlOptions, MenuItem};
use crate::list_menu::{ListMenu, DEFAULT_ACTIVE_CLASS};
use crate::normalize::MenuNormalizer;
use crate::parser::parse_items;
use crate::resolver::PathUrlResolver;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "rhtmx-menu.toml";

/// Menu configuration
///
/// ```toml
/// items = [
///     ["Home", "site/index"],
///     ["Posts", ["post/list"], { params = false }],
/// ]
///
/// [normalizer]
/// active_class = "current"
///
/// [list]
/// id = "main-nav"
/// base_path = "/app"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MenuConfig {
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub list: ListMenuConfig,

    /// Raw item tree, in the same shape [`parse_items`] accepts
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub items: Value,
}

/// Settings for plain normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Class added to active items (none by default)
    #[serde(default)]
    pub active_class: Option<String>,

    #[serde(default = "default_true")]
    pub encode_labels: bool,
}

/// Settings for the list menu widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMenuConfig {
    #[serde(default = "default_list_id")]
    pub id: String,

    /// Class added to the active item; an empty string disables it
    #[serde(default = "default_active_class")]
    pub active_class: String,

    #[serde(default = "default_true")]
    pub encode_labels: bool,

    /// Prefix for route links
    #[serde(default)]
    pub base_path: String,

    #[serde(default)]
    pub html_options: HtmlOptions,

    #[serde(default)]
    pub label_options: HtmlOptions,
}

fn default_true() -> bool {
    true
}

fn default_list_id() -> String {
    "menu".to_string()
}

fn default_active_class() -> String {
    DEFAULT_ACTIVE_CLASS.to_string()
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            active_class: None,
            encode_labels: true,
        }
    }
}

impl Default for ListMenuConfig {
    fn default() -> Self {
        Self {
            id: default_list_id(),
            active_class: default_active_class(),
            encode_labels: true,
            base_path: String::new(),
            html_options: HtmlOptions::new(),
            label_options: HtmlOptions::new(),
        }
    }
}

impl MenuConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default configuration. The item
    /// tree is validated while loading.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("No menu config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read menu config: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load menu config: {:?}", path))
    }

    /// Load configuration from the default path (./rhtmx-menu.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_FILE)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: MenuConfig = toml::from_str(content).context("Failed to parse menu config")?;
        config.items().context("Invalid menu items")?;
        Ok(config)
    }

    /// Typed items from the configured tree
    pub fn items(&self) -> std::result::Result<Vec<MenuItem>, InvalidItemError> {
        parse_items(&self.items)
    }

    pub fn normalizer(&self) -> MenuNormalizer {
        MenuNormalizer::new()
            .active_class(self.normalizer.active_class.clone())
            .encode_labels(self.normalizer.encode_labels)
    }

    pub fn list_menu(&self) -> ListMenu {
        let normalizer = MenuNormalizer::new()
            .active_class(Some(self.list.active_class.clone()))
            .encode_labels(self.list.encode_labels);

        ListMenu::with_parts(
            self.list.id.clone(),
            normalizer,
            PathUrlResolver::new(self.list.base_path.clone()),
        )
        .html_options(self.list.html_options.clone())
        .label_options(self.list.label_options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RouteContext;

    #[test]
    fn test_default_config() {
        let config = MenuConfig::default();
        assert!(config.normalizer.active_class.is_none());
        assert!(config.normalizer.encode_labels);
        assert_eq!(config.list.id, "menu");
        assert_eq!(config.list.active_class, "active");
        assert!(config.items().unwrap().is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = MenuConfig::from_toml_str("  \n").unwrap();
        assert_eq!(config.list.id, "menu");
    }

    #[test]
    fn test_items_from_toml() {
        let config = MenuConfig::from_toml_str(
            r#"
            items = [
                ["Home", "site/index"],
                ["Post", ["post/view", { id = 5 }], { params = ["id"] }],
            ]

            [normalizer]
            active_class = "current"
            "#,
        )
        .unwrap();

        let ctx = RouteContext::new("post", "view").with_query("id", "5");
        let items = config.normalizer().normalize(&config.items().unwrap(), &ctx);

        assert!(!items[0].is_active);
        assert!(items[1].is_active);
        assert_eq!(items[1].html_options["class"], "current");
    }

    #[test]
    fn test_invalid_items_rejected() {
        let err = MenuConfig::from_toml_str(r#"items = [42]"#).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid menu item at [0]"));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let written = toml::to_string(&MenuConfig::default()).unwrap();
        assert!(!written.contains("items"));

        let config = MenuConfig::from_toml_str(&written).unwrap();
        assert_eq!(config.list.id, "menu");
        assert!(config.items.is_null());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = MenuConfig::load("does/not/exist/rhtmx-menu.toml").unwrap();
        assert_eq!(config.list.active_class, "active");
    }
}
