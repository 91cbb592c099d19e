//! Active-route matching
//!
//! Decides whether a menu item's pattern denotes the page being served.
//! Matching never fails: anything that cannot be evaluated is simply
//! not the current page.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::context::RouteContext;
use crate::pattern::{ParamsPolicy, Pattern, RouteTarget};

/// Whether `pattern` matches the current route and query
///
/// # Rules (by pattern kind)
///
/// 1. **Regex** `/body/flags`: searched (unanchored) in `controller/action`
/// 2. **Route**: equal to `controller/action`
/// 3. **Structured**: route (trimmed of `/`) equal to `controller/action`,
///    or to `controller` when it has no `/`; then every named parameter the
///    policy selects must be in the query with a loosely equal value
/// 4. **Unresolvable**: never matches
///
/// # Examples
///
/// ```
/// use rhtmx_menu::{is_active, ParamsPolicy, Pattern, RouteContext, RouteTarget};
///
/// let ctx = RouteContext::new("post", "view").with_query("id", "5");
///
/// assert!(is_active(&Pattern::from_text("post/view"), &ParamsPolicy::All, &ctx));
/// assert!(is_active(&Pattern::from_text("/^post\\//"), &ParamsPolicy::All, &ctx));
///
/// let pattern = Pattern::Structured(RouteTarget::new("post/view").param("id", 7));
/// assert!(!is_active(&pattern, &ParamsPolicy::All, &ctx));
/// assert!(is_active(&pattern, &ParamsPolicy::Ignore, &ctx));
/// ```
pub fn is_active(pattern: &Pattern, params: &ParamsPolicy, ctx: &RouteContext) -> bool {
    match pattern {
        Pattern::Regex(expression) => regex_matches(expression, &ctx.route()),
        Pattern::Route(route) => *route == ctx.route(),
        Pattern::Structured(target) => structured_matches(target, params, ctx),
        Pattern::Unresolvable => false,
    }
}

fn structured_matches(target: &RouteTarget, params: &ParamsPolicy, ctx: &RouteContext) -> bool {
    let route = target.route.trim_matches('/');
    let matched = if route.contains('/') {
        route == ctx.route()
    } else {
        route == ctx.controller_id()
    };

    if !matched {
        return false;
    }

    target
        .params
        .iter()
        .filter(|(name, _)| params.requires(name))
        .all(|(name, expected)| {
            ctx.query_param(name)
                .map_or(false, |actual| expected.loosely_equals(actual))
        })
}

// Compiled expressions by source text; unusable ones are kept as `None`
// so they are only reported once
static REGEX_CACHE: Lazy<Mutex<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn regex_matches(expression: &str, route: &str) -> bool {
    let mut cache = REGEX_CACHE.lock().unwrap_or_else(PoisonError::into_inner);

    let compiled = cache.entry(expression.to_string()).or_insert_with(|| {
        compile_delimited(expression)
            .map_err(|reason| {
                tracing::warn!("Menu pattern {:?} is not a usable regex: {}", expression, reason);
            })
            .ok()
    });

    compiled.as_ref().map_or(false, |regex| regex.is_match(route))
}

/// Compiles a delimited expression such as `/^post\//i`
///
/// The delimiter is the first character. Bracket delimiters close with
/// their pair (`{...}`, `(...)`, `[...]`, `<...>`) and may nest; any other
/// delimiter closes at its first unescaped repetition. Whatever follows is
/// flags, so `/a/b/` is rejected rather than read as `a/b`. Escaped
/// delimiters inside the body are unescaped.
///
/// # Flags
///
/// - `i`, `m`, `s`, `x`, `U` → the same inline flags
/// - `A` → anchored at the start of the subject
/// - `u`, `D` → accepted, no effect
pub fn compile_delimited(expression: &str) -> Result<Regex, String> {
    let mut chars = expression.chars();
    let delimiter = chars.next().ok_or("empty expression")?;
    if delimiter.is_alphanumeric() || delimiter == '\\' || delimiter.is_whitespace() {
        return Err(format!("invalid delimiter {:?}", delimiter));
    }
    let closing = match delimiter {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    };

    let rest = chars.as_str();
    let end = closing_position(rest, delimiter, closing)
        .ok_or_else(|| format!("missing closing delimiter {:?}", closing))?;
    let (body, flags) = (&rest[..end], &rest[end + closing.len_utf8()..]);

    let mut inline = String::new();
    let mut anchored = false;
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => inline.push(flag),
            'A' => anchored = true,
            'u' | 'D' => {}
            other => return Err(format!("unknown flag {:?}", other)),
        }
    }

    let body = if closing == delimiter {
        unescape_delimiter(body, delimiter)
    } else {
        body.to_string()
    };

    let mut source = String::with_capacity(body.len() + 8);
    if !inline.is_empty() {
        source.push_str(&format!("(?{})", inline));
    }
    if anchored {
        source.push_str(&format!(r"\A(?:{})", body));
    } else {
        source.push_str(&body);
    }

    Regex::new(&source).map_err(|err| err.to_string())
}

/// Byte offset of the unescaped closing delimiter in `rest`
fn closing_position(rest: &str, opening: char, closing: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = rest.char_indices();
    while let Some((position, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == closing {
            if depth == 0 {
                return Some(position);
            }
            depth -= 1;
        } else if c == opening {
            depth += 1;
        }
    }
    None
}

fn unescape_delimiter(body: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next == delimiter => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn post_list() -> RouteContext {
        RouteContext::new("post", "list")
    }

    #[rstest]
    #[case("/^post\\//", true)]
    #[case("/^POST\\//i", true)]
    #[case("/^POST\\//", false)]
    #[case("/list$/", true)]
    #[case("#post/li#", true)]
    #[case("/^user/", false)]
    #[case("/post/A", true)]
    #[case("/list/A", false)]
    #[case("{^post/}", true)]
    #[case("(^post/(list|view))", true)]
    #[case("[^user/]", false)]
    fn test_regex_patterns(#[case] expression: &str, #[case] expected: bool) {
        let pattern = Pattern::Regex(expression.to_string());
        assert_eq!(is_active(&pattern, &ParamsPolicy::All, &post_list()), expected);
    }

    #[rstest]
    #[case("/post/index")] // "index" is not a flag set
    #[case("/unterminated")]
    #[case("/(/")]
    #[case("/")]
    #[case("/post/list/")] // closes after "post"; "list/" is not a flag set
    #[case("{post")]
    fn test_broken_regex_is_inactive(#[case] expression: &str) {
        let pattern = Pattern::Regex(expression.to_string());
        assert!(!is_active(&pattern, &ParamsPolicy::All, &post_list()));
    }

    #[test]
    fn test_compile_delimited_rejects_alphanumeric_delimiter() {
        assert!(compile_delimited("apost/lista").is_err());
        assert!(compile_delimited("").is_err());
    }

    #[test]
    fn test_body_ends_at_first_unescaped_delimiter() {
        assert_eq!(compile_delimited(r"/a\/b/").unwrap().as_str(), "a/b");
        assert!(compile_delimited("/a/b/").is_err());
        assert_eq!(closing_position(r"a\}b}i", '{', '}'), Some(4));
        assert_eq!(closing_position("a{b}c}", '{', '}'), Some(5));
    }

    #[test]
    fn test_compiled_expressions_are_cached() {
        let ctx = post_list();
        let pattern = Pattern::Regex("~^post/l~".to_string());
        let broken = Pattern::Regex("~unterminated".to_string());

        for _ in 0..3 {
            assert!(is_active(&pattern, &ParamsPolicy::All, &ctx));
            assert!(!is_active(&broken, &ParamsPolicy::All, &ctx));
        }

        let cache = REGEX_CACHE.lock().unwrap();
        assert!(cache["~^post/l~"].is_some());
        assert!(cache["~unterminated"].is_none());
    }

    #[test]
    fn test_unescape_delimiter_keeps_other_escapes() {
        assert_eq!(unescape_delimiter(r"^post\/\d+", '/'), r"^post/\d+");
        assert_eq!(unescape_delimiter(r"a\\", '/'), r"a\\");
    }

    #[test]
    fn test_route_pattern_is_exact() {
        let ctx = post_list();
        assert!(is_active(&Pattern::Route("post/list".into()), &ParamsPolicy::All, &ctx));
        assert!(!is_active(&Pattern::Route("post/lis".into()), &ParamsPolicy::All, &ctx));
        assert!(!is_active(&Pattern::Route("post".into()), &ParamsPolicy::All, &ctx));
    }

    #[test]
    fn test_structured_controller_only() {
        let ctx = post_list();
        let pattern = Pattern::Structured(RouteTarget::new("/post/"));
        assert!(is_active(&pattern, &ParamsPolicy::All, &ctx));

        let pattern = Pattern::Structured(RouteTarget::new("user"));
        assert!(!is_active(&pattern, &ParamsPolicy::All, &ctx));
    }

    #[test]
    fn test_structured_params_subset() {
        let ctx = RouteContext::new("post", "view").with_query("id", "5");
        let pattern = Pattern::Structured(
            RouteTarget::new("/post/view").param("id", 5).param("page", 2),
        );

        assert!(!is_active(&pattern, &ParamsPolicy::All, &ctx));
        assert!(is_active(&pattern, &ParamsPolicy::only(["id"]), &ctx));
        assert!(!is_active(&pattern, &ParamsPolicy::only(["page"]), &ctx));
        assert!(is_active(&pattern, &ParamsPolicy::Ignore, &ctx));
    }

    #[test]
    fn test_structured_route_mismatch_ignores_params() {
        let ctx = RouteContext::new("post", "list").with_query("id", "5");
        let pattern = Pattern::Structured(RouteTarget::new("post/view").param("id", 5));
        assert!(!is_active(&pattern, &ParamsPolicy::Ignore, &ctx));
        assert!(!is_active(&pattern, &ParamsPolicy::All, &ctx));
    }

    #[test]
    fn test_unresolvable_never_matches() {
        assert!(!is_active(&Pattern::Unresolvable, &ParamsPolicy::Ignore, &post_list()));
    }
}
