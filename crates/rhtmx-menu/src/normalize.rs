// File: src/normalize.rs
// Purpose: Turn typed menu items into a render-ready tree with active state

use serde::Serialize;
use serde_json::Value;

use crate::context::RouteContext;
use crate::encoder::{HtmlEncoder, MaudEncoder};
use crate::error::InvalidItemError;
use crate::item::{GroupItem, HtmlOptions, LinkItem, LinkTarget, MenuItem};
use crate::matcher::is_active;
use crate::parser::parse_items;
use crate::pattern::Pattern;

/// A menu item ready to be rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMenuItem {
    /// Label text, already HTML-encoded when the encoding policy applies
    pub label: String,
    pub link_target: LinkTarget,
    pub html_options: HtmlOptions,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NormalizedMenuItem>,
}

/// Normalizes menu items for one render pass
///
/// # Examples
///
/// ```
/// use rhtmx_menu::{LinkItem, MenuNormalizer, RouteContext};
///
/// let normalizer = MenuNormalizer::new().active_class(Some("active"));
/// let ctx = RouteContext::new("post", "list");
///
/// let items = normalizer.normalize(
///     &[
///         LinkItem::new("Home", "site/index").into(),
///         LinkItem::new("Posts", "post/list").into(),
///     ],
///     &ctx,
/// );
///
/// assert!(!items[0].is_active);
/// assert!(items[1].is_active);
/// assert_eq!(items[1].html_options.get("class").map(String::as_str), Some("active"));
/// ```
#[derive(Debug, Clone)]
pub struct MenuNormalizer<E = MaudEncoder> {
    active_class: Option<String>,
    encode_labels: bool,
    encoder: E,
}

impl MenuNormalizer {
    /// Encodes labels with Maud and adds no active class
    pub fn new() -> Self {
        Self::with_encoder(MaudEncoder)
    }
}

impl Default for MenuNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: HtmlEncoder> MenuNormalizer<E> {
    pub fn with_encoder(encoder: E) -> Self {
        Self {
            active_class: None,
            encode_labels: true,
            encoder,
        }
    }

    /// CSS class added to active items; `None` leaves classes untouched
    pub fn active_class(mut self, class: Option<impl Into<String>>) -> Self {
        self.active_class = class.map(Into::into).filter(|class| !class.is_empty());
        self
    }

    /// Whether labels are HTML-encoded (items may override with `encode_label`)
    pub fn encode_labels(mut self, encode: bool) -> Self {
        self.encode_labels = encode;
        self
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Normalizes `items` against the current route
    ///
    /// Invisible items are dropped along with their descendants; the tree
    /// shape is otherwise kept as is.
    pub fn normalize(&self, items: &[MenuItem], ctx: &RouteContext) -> Vec<NormalizedMenuItem> {
        items
            .iter()
            .filter(|item| item.is_visible())
            .map(|item| match item {
                MenuItem::Link(link) => self.normalize_link(link, ctx),
                MenuItem::Group(group) => self.normalize_group(group, ctx),
            })
            .collect()
    }

    fn normalize_group(&self, group: &GroupItem, ctx: &RouteContext) -> NormalizedMenuItem {
        NormalizedMenuItem {
            label: self.format_label(&group.label, None),
            link_target: LinkTarget::None,
            html_options: HtmlOptions::new(),
            is_active: false,
            children: self.normalize(&group.items, ctx),
        }
    }

    fn normalize_link(&self, link: &LinkItem, ctx: &RouteContext) -> NormalizedMenuItem {
        let pattern = link
            .pattern
            .clone()
            .unwrap_or_else(|| Pattern::from_target(&link.target));
        let active = is_active(&pattern, &link.params, ctx);

        let mut html_options = link.html_options.clone();
        if active {
            tracing::trace!("Menu item {:?} is active for {}", link.label, ctx.route());
            if let Some(class) = &self.active_class {
                add_class(&mut html_options, class);
            }
        }

        NormalizedMenuItem {
            label: self.format_label(&link.label, link.encode_label),
            link_target: link.target.clone(),
            html_options,
            is_active: active,
            children: self.normalize(&link.items, ctx),
        }
    }

    fn format_label(&self, label: &str, encode: Option<bool>) -> String {
        if encode.unwrap_or(self.encode_labels) {
            self.encoder.encode(label)
        } else {
            label.to_string()
        }
    }
}

/// Adds `class` to the `class` attribute unless it is already one of its tokens
pub fn add_class(options: &mut HtmlOptions, class: &str) {
    match options.get_mut("class") {
        Some(existing) if existing.split_whitespace().any(|token| token == class) => {}
        Some(existing) if existing.trim().is_empty() => *existing = class.to_string(),
        Some(existing) => {
            existing.push(' ');
            existing.push_str(class);
        }
        None => {
            options.insert("class".to_string(), class.to_string());
        }
    }
}

/// Parses a raw menu description and normalizes it in one step
///
/// Labels are encoded with Maud; `active_class` is added to active items
/// when given.
///
/// # Examples
///
/// ```
/// use rhtmx_menu::{normalize, RouteContext};
/// use serde_json::json;
///
/// let ctx = RouteContext::new("post", "view").with_query("id", "5");
/// let items = normalize(
///     &json!([["Post 5", ["post/view", {"id": 5}]], ["Post 7", ["post/view", {"id": 7}]]]),
///     &ctx,
///     Some("active"),
/// )
/// .unwrap();
///
/// assert!(items[0].is_active);
/// assert!(!items[1].is_active);
/// ```
pub fn normalize(
    raw: &Value,
    ctx: &RouteContext,
    active_class: Option<&str>,
) -> Result<Vec<NormalizedMenuItem>, InvalidItemError> {
    let items = parse_items(raw)?;
    Ok(MenuNormalizer::new()
        .active_class(active_class)
        .normalize(&items, ctx))
}
