// File: src/resolver.rs
// Purpose: Turn link targets into hrefs

use crate::item::LinkTarget;
use crate::pattern::RouteTarget;

/// Renders a [`LinkTarget`] to an `href`; `None` means "not a link"
pub trait UrlResolver {
    fn resolve(&self, target: &LinkTarget) -> Option<String>;
}

/// Resolves routes to `/{base}/{route}?name=value` paths
///
/// URLs are passed through untouched.
///
/// # Examples
///
/// ```
/// use rhtmx_menu::{LinkTarget, PathUrlResolver, RouteTarget, UrlResolver};
///
/// let resolver = PathUrlResolver::new("/app");
/// let target = LinkTarget::Route(RouteTarget::new("/post/view").param("id", 5));
///
/// assert_eq!(resolver.resolve(&target).as_deref(), Some("/app/post/view?id=5"));
/// assert_eq!(resolver.resolve(&LinkTarget::None), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathUrlResolver {
    base_path: String,
}

impl PathUrlResolver {
    pub fn new(base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    fn route_url(&self, route: &RouteTarget) -> String {
        let mut url = format!("{}/{}", self.base_path, route.route.trim_matches('/'));

        let query: Vec<String> = route
            .params
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(&value.to_string())
                )
            })
            .collect();

        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }
}

impl UrlResolver for PathUrlResolver {
    fn resolve(&self, target: &LinkTarget) -> Option<String> {
        match target {
            LinkTarget::None => None,
            LinkTarget::Url(url) => Some(url.clone()),
            LinkTarget::Route(route) => Some(self.route_url(route)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_passthrough() {
        let resolver = PathUrlResolver::default();
        let target = LinkTarget::Url("https://example.com/?a=1".into());
        assert_eq!(resolver.resolve(&target).as_deref(), Some("https://example.com/?a=1"));
    }

    #[test]
    fn test_route_without_params() {
        let resolver = PathUrlResolver::default();
        let target = LinkTarget::Route(RouteTarget::new("post/list"));
        assert_eq!(resolver.resolve(&target).as_deref(), Some("/post/list"));
    }

    #[test]
    fn test_params_are_encoded_in_order() {
        let resolver = PathUrlResolver::new("/");
        let target = LinkTarget::Route(
            RouteTarget::new("post/search")
                .param("q", "a&b c")
                .param("draft", true),
        );
        assert_eq!(
            resolver.resolve(&target).as_deref(),
            Some("/post/search?q=a%26b%20c&draft=1")
        );
    }
}
