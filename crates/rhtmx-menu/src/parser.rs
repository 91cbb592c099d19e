// File: src/parser.rs
// Purpose: Strict parser from loosely-shaped configuration values to typed menu items

use serde_json::{Map, Value};

use crate::encoder::is_valid_attribute_name;
use crate::error::{InvalidItemError, ItemPath, PathSegment};
use crate::item::{GroupItem, HtmlOptions, LinkItem, LinkTarget, MenuItem};
use crate::pattern::{ParamValue, ParamsPolicy, Pattern, RouteTarget};

/// Parses a raw menu description into typed items
///
/// The item list is either an array of entries or an object whose numeric
/// keys are entries and whose other keys are shorthand groups
/// (`"Label": [...]`). An entry is `[label, target?, {options}?]` or an
/// object with `0`/`label`, `1`/`url` and named options (`items`,
/// `visible`, `pattern`, `params`, `htmlOptions`, `encodeLabel`).
///
/// Entries with `"visible": false` are dropped before the rest of their
/// shape is looked at. A group hides the same way when its value is an
/// object carrying `"visible": false` next to its numbered entries.
///
/// # Examples
///
/// ```
/// use rhtmx_menu::{parse_items, MenuItem};
/// use serde_json::json;
///
/// let items = parse_items(&json!([
///     ["Home", "site/index"],
///     ["Posts", ["post/list"], {"items": [["New", ["post/create"]]]}],
///     ["Admin", "admin/index", {"visible": false}],
/// ]))
/// .unwrap();
///
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[1].children()[0].label(), "New");
/// ```
pub fn parse_items(raw: &Value) -> Result<Vec<MenuItem>, InvalidItemError> {
    let mut path = ItemPath::root();
    parse_list(raw, &mut path)
}

fn parse_list(raw: &Value, path: &mut ItemPath) -> Result<Vec<MenuItem>, InvalidItemError> {
    let mut items = Vec::new();

    match raw {
        Value::Null => {}
        Value::Array(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                path.push(PathSegment::Index(index));
                let parsed = parse_entry(entry, path);
                path.pop();
                items.extend(parsed?);
            }
        }
        Value::Object(entries) => {
            for (key, entry) in entries {
                let parsed = match key.parse::<usize>() {
                    Ok(index) => {
                        path.push(PathSegment::Index(index));
                        parse_entry(entry, path)
                    }
                    Err(_) => {
                        path.push(PathSegment::Group(key.clone()));
                        parse_group(key, entry, path)
                    }
                };
                path.pop();
                items.extend(parsed?);
            }
        }
        _ => return Err(InvalidItemError::new(path, "expected a list of menu items")),
    }

    Ok(items)
}

/// Shorthand group `"Label": [...]` or `"Label": {"0": ..., "visible": false}`
///
/// Only an object value can carry `visible`; it is checked before the
/// children are looked at and is not itself a child.
fn parse_group(
    label: &str,
    raw: &Value,
    path: &mut ItemPath,
) -> Result<Option<MenuItem>, InvalidItemError> {
    let children = match raw {
        Value::Object(map) if map.contains_key("visible") => {
            match map.get("visible") {
                Some(Value::Bool(false)) => {
                    tracing::debug!("Skipping invisible menu group at {}", path);
                    return Ok(None);
                }
                Some(Value::Bool(true)) | Some(Value::Null) => {}
                _ => return Err(InvalidItemError::new(path, "`visible` must be a boolean")),
            }

            let entries: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| key.as_str() != "visible")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            parse_list(&Value::Object(entries), path)?
        }
        _ => parse_list(raw, path)?,
    };

    Ok(Some(MenuItem::Group(GroupItem::new(label, children))))
}

/// Label, target and named options of one entry, whatever its shape
struct EntryParts<'a> {
    label: Option<&'a Value>,
    target: Option<&'a Value>,
    options: Map<String, Value>,
}

fn split_entry<'a>(entry: &'a Value, path: &ItemPath) -> Result<EntryParts<'a>, InvalidItemError> {
    match entry {
        Value::Array(values) => {
            let mut positional = Vec::new();
            let mut options = Map::new();

            for value in values {
                match value {
                    // An object right after the label is options, unless it is
                    // a route descriptor (has a "0" key)
                    Value::Object(map) if !positional.is_empty() && !map.contains_key("0") => {
                        options.extend(map.clone());
                    }
                    _ if options.is_empty() => positional.push(value),
                    _ => {}
                }
            }

            Ok(EntryParts {
                label: positional.first().copied(),
                target: positional.get(1).copied(),
                options,
            })
        }
        Value::Object(map) => Ok(EntryParts {
            label: map.get("0").or_else(|| map.get("label")),
            target: map.get("1").or_else(|| map.get("url")),
            options: map.clone(),
        }),
        _ => Err(InvalidItemError::new(
            path,
            "expected an array or object describing a menu item",
        )),
    }
}

fn parse_entry(entry: &Value, path: &mut ItemPath) -> Result<Option<MenuItem>, InvalidItemError> {
    let parts = split_entry(entry, path)?;
    let options = &parts.options;

    let visible = match options.get("visible") {
        None | Some(Value::Null) => true,
        Some(Value::Bool(visible)) => *visible,
        Some(_) => return Err(InvalidItemError::new(path, "`visible` must be a boolean")),
    };
    if !visible {
        tracing::debug!("Skipping invisible menu item at {}", path);
        return Ok(None);
    }

    let label = match parts.label {
        Some(Value::String(label)) => label.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(_) => return Err(InvalidItemError::new(path, "label must be a string")),
        None => return Err(InvalidItemError::new(path, "missing label")),
    };

    let target = match parts.target {
        None => LinkTarget::None,
        Some(value) => parse_target(value).map_err(|reason| InvalidItemError::new(path, reason))?,
    };

    let mut item = LinkItem::new(label, target);

    if let Some(pattern) = options.get("pattern") {
        item.pattern = parse_pattern(pattern);
    }

    if let Some(params) = options.get("params") {
        item.params = parse_params(params).map_err(|reason| InvalidItemError::new(path, reason))?;
    }

    if let Some(html_options) = options.get("htmlOptions") {
        item.html_options =
            parse_html_options(html_options).map_err(|reason| InvalidItemError::new(path, reason))?;
    }

    match options.get("encodeLabel") {
        None | Some(Value::Null) => {}
        Some(Value::Bool(encode)) => item.encode_label = Some(*encode),
        Some(_) => return Err(InvalidItemError::new(path, "`encodeLabel` must be a boolean")),
    }

    if let Some(children) = options.get("items") {
        path.push(PathSegment::Children);
        let parsed = parse_list(children, path);
        path.pop();
        item.items = parsed?;
    }

    Ok(Some(item.into()))
}

fn parse_target(value: &Value) -> Result<LinkTarget, String> {
    match value {
        Value::Null | Value::Bool(false) => Ok(LinkTarget::None),
        Value::String(url) => Ok(LinkTarget::Url(url.clone())),
        Value::Array(_) | Value::Object(_) => parse_route_target(value).map(LinkTarget::Route),
        _ => Err("link target must be a URL, a route descriptor, or false".to_string()),
    }
}

/// Pattern values that cannot be understood become [`Pattern::Unresolvable`]
/// instead of an error; `false`/`null` fall back to the target.
fn parse_pattern(value: &Value) -> Option<Pattern> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) => Some(Pattern::from_text(text)),
        Value::Array(_) | Value::Object(_) => Some(
            parse_route_target(value)
                .map(Pattern::Structured)
                .unwrap_or_else(|reason| {
                    tracing::debug!("Unresolvable menu pattern {}: {}", value, reason);
                    Pattern::Unresolvable
                }),
        ),
        other => {
            tracing::debug!("Unresolvable menu pattern {}", other);
            Some(Pattern::Unresolvable)
        }
    }
}

/// `["post/view", {"id": 5}]` or `{"0": "post/view", "id": 5}`
fn parse_route_target(value: &Value) -> Result<RouteTarget, String> {
    let (route, named): (Option<&Value>, Vec<(&String, &Value)>) = match value {
        Value::Array(values) => (
            values.first(),
            values
                .iter()
                .skip(1)
                .filter_map(Value::as_object)
                .flat_map(|map| map.iter())
                .collect(),
        ),
        Value::Object(map) => (
            map.get("0"),
            map.iter()
                .filter(|(key, _)| key.parse::<usize>().is_err())
                .collect(),
        ),
        _ => return Err("route descriptor must be an array or object".to_string()),
    };

    let route = match route {
        Some(Value::String(route)) => route.clone(),
        _ => return Err("route descriptor must start with a route string".to_string()),
    };

    let mut target = RouteTarget::new(route);
    for (name, value) in named {
        let value = parse_param_value(value)
            .ok_or_else(|| format!("route parameter `{}` must be a scalar", name))?;
        target.params.push((name.clone(), value));
    }
    Ok(target)
}

fn parse_param_value(value: &Value) -> Option<ParamValue> {
    match value {
        Value::String(s) => Some(ParamValue::String(s.clone())),
        Value::Bool(b) => Some(ParamValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(ParamValue::Int)
            .or_else(|| n.as_f64().map(ParamValue::Float)),
        _ => None,
    }
}

fn parse_params(value: &Value) -> Result<ParamsPolicy, String> {
    match value {
        Value::Bool(enabled) => Ok(ParamsPolicy::from(*enabled)),
        Value::Array(names) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| "`params` names must be strings".to_string())
            })
            .collect::<Result<_, _>>()
            .map(ParamsPolicy::Only),
        _ => Err("`params` must be a boolean or a list of parameter names".to_string()),
    }
}

fn parse_html_options(value: &Value) -> Result<HtmlOptions, String> {
    let map = match value {
        Value::Null => return Ok(HtmlOptions::new()),
        Value::Object(map) => map,
        _ => return Err("`htmlOptions` must be an object".to_string()),
    };

    // Boolean attributes: `true` renders as `name="name"`, `false` is omitted
    let mut options = HtmlOptions::new();
    for (name, value) in map {
        if !is_valid_attribute_name(name) {
            return Err(format!("`{}` is not a valid html attribute name", name));
        }
        let text = match value {
            Value::Null | Value::Bool(false) => continue,
            Value::Bool(true) => name.clone(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Err(format!("html option `{}` must be a scalar", name)),
        };
        options.insert(name.clone(), text);
    }
    Ok(options)
}
