// File: src/item.rs
// Purpose: Typed menu items as written by the page author

use serde::Serialize;
use std::collections::BTreeMap;

use crate::pattern::{ParamsPolicy, Pattern, RouteTarget};

/// HTML attributes (name → value) attached to an item's link
pub type HtmlOptions = BTreeMap<String, String>;

/// Where a menu item links to
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LinkTarget {
    /// Not clickable
    #[default]
    None,
    /// Literal URL (or route text), passed to the renderer unchanged
    Url(String),
    /// Route descriptor resolved to a URL by a [`UrlResolver`](crate::UrlResolver)
    Route(RouteTarget),
}

impl LinkTarget {
    pub fn is_none(&self) -> bool {
        matches!(self, LinkTarget::None)
    }
}

impl From<&str> for LinkTarget {
    fn from(url: &str) -> Self {
        LinkTarget::Url(url.to_string())
    }
}

impl From<String> for LinkTarget {
    fn from(url: String) -> Self {
        LinkTarget::Url(url)
    }
}

impl From<RouteTarget> for LinkTarget {
    fn from(route: RouteTarget) -> Self {
        LinkTarget::Route(route)
    }
}

impl<T: Into<LinkTarget>> From<Option<T>> for LinkTarget {
    fn from(target: Option<T>) -> Self {
        target.map(Into::into).unwrap_or_default()
    }
}

/// A menu entry before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Link(LinkItem),
    /// Unlinked heading with nested items (`"Label" => [...]` shorthand)
    Group(GroupItem),
}

impl MenuItem {
    pub fn label(&self) -> &str {
        match self {
            MenuItem::Link(link) => &link.label,
            MenuItem::Group(group) => &group.label,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            MenuItem::Link(link) => link.visible,
            MenuItem::Group(group) => group.visible,
        }
    }

    pub fn children(&self) -> &[MenuItem] {
        match self {
            MenuItem::Link(link) => &link.items,
            MenuItem::Group(group) => &group.items,
        }
    }
}

impl From<LinkItem> for MenuItem {
    fn from(link: LinkItem) -> Self {
        MenuItem::Link(link)
    }
}

impl From<GroupItem> for MenuItem {
    fn from(group: GroupItem) -> Self {
        MenuItem::Group(group)
    }
}

/// A regular menu entry: label, optional link, optional nested items
///
/// # Examples
///
/// ```
/// use rhtmx_menu::{LinkItem, MenuItem, ParamsPolicy, RouteTarget};
///
/// let item: MenuItem = LinkItem::new("Posts", RouteTarget::new("post/list"))
///     .pattern("/^post\\//")
///     .params(ParamsPolicy::Ignore)
///     .html_option("title", "All posts")
///     .into();
///
/// assert_eq!(item.label(), "Posts");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinkItem {
    pub label: String,
    pub target: LinkTarget,
    /// Overrides the target as the match pattern when set
    pub pattern: Option<Pattern>,
    pub params: ParamsPolicy,
    pub html_options: HtmlOptions,
    pub visible: bool,
    /// Overrides the normalizer's label encoding for this item
    pub encode_label: Option<bool>,
    pub items: Vec<MenuItem>,
}

impl LinkItem {
    pub fn new(label: impl Into<String>, target: impl Into<LinkTarget>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            pattern: None,
            params: ParamsPolicy::All,
            html_options: HtmlOptions::new(),
            visible: true,
            encode_label: None,
            items: Vec::new(),
        }
    }

    /// An entry that is not clickable
    pub fn unlinked(label: impl Into<String>) -> Self {
        Self::new(label, LinkTarget::None)
    }

    pub fn pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn params(mut self, params: impl Into<ParamsPolicy>) -> Self {
        self.params = params.into();
        self
    }

    pub fn html_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.html_options.insert(name.into(), value.into());
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn encode_label(mut self, encode: bool) -> Self {
        self.encode_label = Some(encode);
        self
    }

    pub fn child(mut self, item: impl Into<MenuItem>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn items(mut self, items: Vec<MenuItem>) -> Self {
        self.items = items;
        self
    }
}

/// An unlinked heading grouping nested items
#[derive(Debug, Clone, PartialEq)]
pub struct GroupItem {
    pub label: String,
    pub items: Vec<MenuItem>,
    pub visible: bool,
}

impl GroupItem {
    pub fn new(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            items,
            visible: true,
        }
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_item_defaults() {
        let item = LinkItem::new("Home", "site/index");
        assert_eq!(item.target, LinkTarget::Url("site/index".into()));
        assert_eq!(item.params, ParamsPolicy::All);
        assert!(item.visible);
        assert!(item.pattern.is_none());
        assert!(item.encode_label.is_none());
        assert!(item.html_options.is_empty());
    }

    #[test]
    fn test_optional_target() {
        let none: Option<&str> = None;
        assert!(LinkTarget::from(none).is_none());
        assert_eq!(LinkTarget::from(Some("about")), LinkTarget::Url("about".into()));
    }

    #[test]
    fn test_menu_item_accessors() {
        let group: MenuItem = GroupItem::new(
            "Admin",
            vec![LinkItem::new("Users", "user/admin").into()],
        )
        .into();

        assert_eq!(group.label(), "Admin");
        assert!(group.is_visible());
        assert_eq!(group.children().len(), 1);
        assert_eq!(group.children()[0].label(), "Users");
    }
}
