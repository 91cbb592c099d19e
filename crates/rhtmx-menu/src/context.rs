// File: src/context.rs
// Purpose: Route context (controller, action, query) of the request being rendered

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, Uri},
};
use std::collections::BTreeMap;
use std::convert::Infallible;

/// Controller used for the site root (`/`)
pub const DEFAULT_CONTROLLER: &str = "site";

/// Action used when the path names only a controller
pub const DEFAULT_ACTION: &str = "index";

/// Identity of the page currently being served
///
/// Menus compare their patterns against this value; it never changes while
/// a menu is being normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    controller_id: String,
    action_id: String,
    query: BTreeMap<String, String>,
}

impl RouteContext {
    pub fn new(controller_id: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            controller_id: controller_id.into(),
            action_id: action_id.into(),
            query: BTreeMap::new(),
        }
    }

    /// Adds a query parameter
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Builds the context from a request URI
    ///
    /// All path segments but the last form the controller id, the last one
    /// is the action. A single segment is a controller with the default
    /// action; the root path is the default controller and action.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_menu::RouteContext;
    ///
    /// let uri = "/admin/post/view?id=5".parse().unwrap();
    /// let ctx = RouteContext::from_uri(&uri);
    ///
    /// assert_eq!(ctx.controller_id(), "admin/post");
    /// assert_eq!(ctx.action_id(), "view");
    /// assert_eq!(ctx.query_param("id"), Some("5"));
    /// assert_eq!(ctx.route(), "admin/post/view");
    /// ```
    pub fn from_uri(uri: &Uri) -> Self {
        let mut segments: Vec<String> = uri
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(decode_component)
            .collect();

        let (controller_id, action_id) = match segments.len() {
            0 => (DEFAULT_CONTROLLER.to_string(), DEFAULT_ACTION.to_string()),
            1 => (segments.remove(0), DEFAULT_ACTION.to_string()),
            _ => {
                let action = segments.pop().unwrap_or_default();
                (segments.join("/"), action)
            }
        };

        Self {
            controller_id,
            action_id,
            query: uri.query().map(parse_query).unwrap_or_default(),
        }
    }

    pub fn controller_id(&self) -> &str {
        &self.controller_id
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    /// The current route as `controller/action`
    pub fn route(&self) -> String {
        format!("{}/{}", self.controller_id, self.action_id)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RouteContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RouteContext::from_uri(&parts.uri))
    }
}

/// Parses `a=1&b=two+words`; a repeated name keeps its last value
fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(name), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn ctx(uri: &str) -> RouteContext {
        RouteContext::from_uri(&uri.parse().unwrap())
    }

    #[test]
    fn test_root_uses_defaults() {
        let ctx = ctx("/");
        assert_eq!(ctx.controller_id(), "site");
        assert_eq!(ctx.action_id(), "index");
        assert!(ctx.query().is_empty());
    }

    #[test]
    fn test_single_segment_is_controller() {
        let ctx = ctx("/post");
        assert_eq!(ctx.route(), "post/index");
    }

    #[test]
    fn test_trailing_and_double_slashes_ignored() {
        let ctx = ctx("/post//list/");
        assert_eq!(ctx.controller_id(), "post");
        assert_eq!(ctx.action_id(), "list");
    }

    #[test]
    fn test_query_decoding() {
        let ctx = ctx("/post/search?q=hello+world&tag=r%26d&flag&page=1&page=2");
        assert_eq!(ctx.query_param("q"), Some("hello world"));
        assert_eq!(ctx.query_param("tag"), Some("r&d"));
        assert_eq!(ctx.query_param("flag"), Some(""));
        assert_eq!(ctx.query_param("page"), Some("2"));
        assert_eq!(ctx.query_param("missing"), None);
    }

    #[test]
    fn test_builder() {
        let ctx = RouteContext::new("post", "view").with_query("id", "5");
        assert_eq!(ctx.route(), "post/view");
        assert_eq!(ctx.query_param("id"), Some("5"));
    }

    #[tokio::test]
    async fn test_extractor_reads_request_uri() {
        let (mut parts, _) = Request::builder()
            .uri("/post/view?id=7")
            .body(())
            .unwrap()
            .into_parts();

        let ctx = RouteContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx, RouteContext::new("post", "view").with_query("id", "7"));
    }
}
