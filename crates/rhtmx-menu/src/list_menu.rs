// File: src/list_menu.rs
// Purpose: Nested <ul> rendering of a normalized menu

use maud::{html, Markup, PreEscaped};

use crate::context::RouteContext;
use crate::encoder::{render_attributes, HtmlEncoder, MaudEncoder};
use crate::item::{HtmlOptions, MenuItem};
use crate::normalize::{MenuNormalizer, NormalizedMenuItem};
use crate::resolver::{PathUrlResolver, UrlResolver};

/// Default CSS class of the outer `<ul>`
pub const DEFAULT_LIST_CLASS: &str = "list-menu";

/// Default class added to the active item's link
pub const DEFAULT_ACTIVE_CLASS: &str = "active";

/// Menu widget rendering items as nested lists
///
/// Linked items become `<a>` tags carrying their own html options;
/// unlinked items and groups become `<span>` tags carrying `label_options`.
///
/// # Examples
///
/// ```
/// use rhtmx_menu::{LinkItem, ListMenu, RouteContext};
///
/// let menu = ListMenu::new("main-nav");
/// let html = menu
///     .render(
///         &[LinkItem::new("Posts", "post/list").into()],
///         &RouteContext::new("post", "list"),
///     )
///     .into_string();
///
/// assert_eq!(
///     html,
///     r#"<ul class="list-menu" id="main-nav"><li><a class="active" href="post/list">Posts</a></li></ul>"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ListMenu<E = MaudEncoder, R = PathUrlResolver> {
    id: String,
    html_options: HtmlOptions,
    label_options: HtmlOptions,
    normalizer: MenuNormalizer<E>,
    resolver: R,
}

impl ListMenu {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_parts(
            id,
            MenuNormalizer::new().active_class(Some(DEFAULT_ACTIVE_CLASS)),
            PathUrlResolver::default(),
        )
    }
}

impl<E: HtmlEncoder, R: UrlResolver> ListMenu<E, R> {
    pub fn with_parts(id: impl Into<String>, normalizer: MenuNormalizer<E>, resolver: R) -> Self {
        Self {
            id: id.into(),
            html_options: HtmlOptions::new(),
            label_options: HtmlOptions::new(),
            normalizer,
            resolver,
        }
    }

    /// Attributes of the outer `<ul>`; `id` and `class` get defaults when absent
    pub fn html_options(mut self, options: HtmlOptions) -> Self {
        self.html_options = options;
        self
    }

    /// Attributes of the `<span>` wrapping unlinked labels
    pub fn label_options(mut self, options: HtmlOptions) -> Self {
        self.label_options = options;
        self
    }

    pub fn normalizer(&self) -> &MenuNormalizer<E> {
        &self.normalizer
    }

    /// Normalizes `items` against `ctx` and renders them
    pub fn render(&self, items: &[MenuItem], ctx: &RouteContext) -> Markup {
        self.render_normalized(&self.normalizer.normalize(items, ctx))
    }

    /// Renders an already normalized tree
    pub fn render_normalized(&self, items: &[NormalizedMenuItem]) -> Markup {
        let mut options = self.html_options.clone();
        options
            .entry("id".to_string())
            .or_insert_with(|| self.id.clone());
        options
            .entry("class".to_string())
            .or_insert_with(|| DEFAULT_LIST_CLASS.to_string());

        let encoder = self.normalizer.encoder();
        html! {
            (PreEscaped(format!("<ul{}>", render_attributes(encoder, &options))))
            (self.render_items(items))
            (PreEscaped("</ul>"))
        }
    }

    fn render_items(&self, items: &[NormalizedMenuItem]) -> Markup {
        html! {
            @for item in items {
                li {
                    (self.render_label(item))
                    @if !item.children.is_empty() {
                        ul { (self.render_items(&item.children)) }
                    }
                }
            }
        }
    }

    // Labels were encoded (or deliberately left raw) during normalization
    fn render_label(&self, item: &NormalizedMenuItem) -> Markup {
        let encoder = self.normalizer.encoder();
        match self.resolver.resolve(&item.link_target) {
            Some(href) => {
                let mut options = item.html_options.clone();
                options.insert("href".to_string(), href);
                PreEscaped(format!(
                    "<a{}>{}</a>",
                    render_attributes(encoder, &options),
                    item.label
                ))
            }
            None => PreEscaped(format!(
                "<span{}>{}</span>",
                render_attributes(encoder, &self.label_options),
                item.label
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{GroupItem, LinkItem};
    use crate::pattern::RouteTarget;
    use pretty_assertions::assert_eq;

    fn ctx() -> RouteContext {
        RouteContext::new("post", "view").with_query("id", "5")
    }

    #[test]
    fn test_nested_rendering() {
        let menu = ListMenu::new("nav");
        let items: Vec<MenuItem> = vec![
            LinkItem::new("Home", "/").into(),
            GroupItem::new(
                "Posts",
                vec![LinkItem::new("Post 5", RouteTarget::new("post/view").param("id", 5)).into()],
            )
            .into(),
        ];

        assert_eq!(
            menu.render(&items, &ctx()).into_string(),
            concat!(
                r#"<ul class="list-menu" id="nav">"#,
                r#"<li><a href="/">Home</a></li>"#,
                r#"<li><span>Posts</span><ul>"#,
                r#"<li><a class="active" href="/post/view?id=5">Post 5</a></li>"#,
                r#"</ul></li></ul>"#
            )
        );
    }

    #[test]
    fn test_custom_options() {
        let mut html_options = HtmlOptions::new();
        html_options.insert("class".to_string(), "sidebar".to_string());
        let mut label_options = HtmlOptions::new();
        label_options.insert("class".to_string(), "heading".to_string());

        let menu = ListMenu::new("side")
            .html_options(html_options)
            .label_options(label_options);

        let html = menu
            .render(&[LinkItem::unlinked("A & B").into()], &ctx())
            .into_string();

        assert_eq!(
            html,
            r#"<ul class="sidebar" id="side"><li><span class="heading">A &amp; B</span></li></ul>"#
        );
    }

    #[test]
    fn test_boolean_html_options_render_as_attributes() {
        let items = crate::parser::parse_items(&serde_json::json!([
            ["Home", "/", {"htmlOptions": {"hidden": false, "disabled": true}}]
        ]))
        .unwrap();

        let html = ListMenu::new("nav").render(&items, &ctx()).into_string();

        assert!(!html.contains("hidden"));
        assert_eq!(
            html,
            r#"<ul class="list-menu" id="nav"><li><a disabled="disabled" href="/">Home</a></li></ul>"#
        );
    }

    #[test]
    fn test_empty_menu() {
        let html = ListMenu::new("empty").render(&[], &ctx()).into_string();
        assert_eq!(html, r#"<ul class="list-menu" id="empty"></ul>"#);
    }
}
