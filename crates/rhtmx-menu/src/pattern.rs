//! Match patterns for deciding whether a menu item is the current page
//!
//! A pattern is compared against the current route (`controller/action`)
//! and, for structured patterns, against the current query parameters.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::item::LinkTarget;

/// Scalar value attached to a route descriptor (`["post/view", {"id": 5}]`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Compares a query-string value against this one the way query text
    /// is usually compared: `"5"` equals `5` and `"5.0"`, and booleans
    /// compare against the truthiness of the text (`""` and `"0"` are false).
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_menu::ParamValue;
    ///
    /// assert!(ParamValue::Int(5).loosely_equals("5"));
    /// assert!(ParamValue::String("5".into()).loosely_equals("05"));
    /// assert!(!ParamValue::String("abc".into()).loosely_equals("ABC"));
    /// assert!(ParamValue::Bool(false).loosely_equals("0"));
    /// ```
    pub fn loosely_equals(&self, actual: &str) -> bool {
        match self {
            ParamValue::String(expected) => match (as_number(actual), as_number(expected)) {
                (Some(a), Some(b)) => a == b,
                _ => actual == expected,
            },
            ParamValue::Int(expected) => match as_number(actual) {
                Some(a) => a == *expected as f64,
                None => actual == expected.to_string(),
            },
            ParamValue::Float(expected) => match as_number(actual) {
                Some(a) => a == *expected,
                None => actual == expected.to_string(),
            },
            ParamValue::Bool(expected) => is_truthy(actual) == *expected,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => write!(f, "{}", s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
            ParamValue::Bool(true) => write!(f, "1"),
            ParamValue::Bool(false) => write!(f, "0"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Float(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

// Numeric strings: optional surrounding whitespace, sign, digits, fraction, exponent
static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$").unwrap()
});

fn as_number(text: &str) -> Option<f64> {
    if !NUMERIC.is_match(text) {
        return None;
    }
    text.trim().parse().ok()
}

fn is_truthy(text: &str) -> bool {
    !(text.is_empty() || text == "0")
}

/// A route plus named parameters, e.g. `["post/view", {"id": 5}]`
///
/// Used both as a link target (rendered to a URL by a
/// [`UrlResolver`](crate::UrlResolver)) and as a structured match pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteTarget {
    pub route: String,
    /// Named parameters in declaration order
    pub params: Vec<(String, ParamValue)>,
}

impl RouteTarget {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            params: Vec::new(),
        }
    }

    /// Adds a named parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

/// How an item decides whether it is the current page
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Exact `controller/action` route
    Route(String),
    /// Delimited regular expression such as `/^post\//i`, searched in `controller/action`
    Regex(String),
    /// Route (or bare controller) plus named query parameters
    Structured(RouteTarget),
    /// Never matches (unlinked items, unparseable pattern values)
    Unresolvable,
}

impl Pattern {
    /// Classifies a textual pattern: a leading `/` marks a regular
    /// expression, anything else is an exact route.
    ///
    /// A route that itself starts with `/` cannot be written this way;
    /// build [`Pattern::Route`] or [`Pattern::Structured`] directly instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_menu::Pattern;
    ///
    /// assert_eq!(Pattern::from_text("post/list"), Pattern::Route("post/list".into()));
    /// assert_eq!(Pattern::from_text("/^post\\//"), Pattern::Regex("/^post\\//".into()));
    /// ```
    pub fn from_text(text: &str) -> Self {
        if text.starts_with('/') {
            Pattern::Regex(text.to_string())
        } else {
            Pattern::Route(text.to_string())
        }
    }

    /// The pattern implied by a link target when no explicit pattern is given
    pub fn from_target(target: &LinkTarget) -> Self {
        match target {
            LinkTarget::None => Pattern::Unresolvable,
            LinkTarget::Url(url) => Pattern::from_text(url),
            LinkTarget::Route(route) => Pattern::Structured(route.clone()),
        }
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern::from_text(text)
    }
}

impl From<RouteTarget> for Pattern {
    fn from(route: RouteTarget) -> Self {
        Pattern::Structured(route)
    }
}

/// Which of a structured pattern's named parameters must match the query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParamsPolicy {
    /// Every named parameter must match (default)
    #[default]
    All,
    /// Parameters are ignored; only the route is compared
    Ignore,
    /// Only the listed parameters must match
    Only(BTreeSet<String>),
}

impl ParamsPolicy {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamsPolicy::Only(names.into_iter().map(Into::into).collect())
    }

    /// Whether the parameter `name` has to be present and equal in the query
    pub fn requires(&self, name: &str) -> bool {
        match self {
            ParamsPolicy::All => true,
            ParamsPolicy::Ignore => false,
            ParamsPolicy::Only(names) => names.contains(name),
        }
    }
}

impl From<bool> for ParamsPolicy {
    fn from(enabled: bool) -> Self {
        if enabled {
            ParamsPolicy::All
        } else {
            ParamsPolicy::Ignore
        }
    }
}
