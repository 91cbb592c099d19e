// File: src/encoder.rs
// Purpose: HTML escaping for labels and attribute values

use maud::html;

use crate::item::HtmlOptions;

/// Escapes text for safe embedding in HTML
pub trait HtmlEncoder {
    fn encode(&self, text: &str) -> String;
}

/// Escapes through Maud's own text rendering (`&`, `<`, `>`, `"`)
#[derive(Debug, Clone, Copy, Default)]
pub struct MaudEncoder;

impl HtmlEncoder for MaudEncoder {
    fn encode(&self, text: &str) -> String {
        html! { (text) }.into_string()
    }
}

impl<E: HtmlEncoder + ?Sized> HtmlEncoder for &E {
    fn encode(&self, text: &str) -> String {
        (**self).encode(text)
    }
}

/// Whether `name` can be written as an attribute name without quoting
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '<' | '/' | '=')
        })
}

/// Renders ` name="value"` pairs, values escaped with `encoder`
///
/// Names that are not valid attribute names are left out.
pub fn render_attributes(encoder: &impl HtmlEncoder, options: &HtmlOptions) -> String {
    options
        .iter()
        .filter(|(name, _)| {
            let valid = is_valid_attribute_name(name);
            if !valid {
                tracing::warn!("Dropping invalid html attribute name {:?}", name);
            }
            valid
        })
        .map(|(name, value)| format!(" {}=\"{}\"", name, encoder.encode(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maud_encoder_escapes_markup() {
        let encoded = MaudEncoder.encode(r#"<b>Tom & "Jerry"</b>"#);
        assert_eq!(encoded, "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(MaudEncoder.encode("Posts"), "Posts");
    }

    #[test]
    fn test_render_attributes_sorted_and_escaped() {
        let mut options = HtmlOptions::new();
        options.insert("title".to_string(), "a \"quote\"".to_string());
        options.insert("class".to_string(), "nav active".to_string());

        assert_eq!(
            render_attributes(&MaudEncoder, &options),
            " class=\"nav active\" title=\"a &quot;quote&quot;\""
        );
    }

    #[test]
    fn test_attribute_names_are_checked() {
        assert!(is_valid_attribute_name("data-id"));
        assert!(is_valid_attribute_name("hx-get"));
        for name in ["", "on click", "a\"b", "x>y", "a/b", "a=b"] {
            assert!(!is_valid_attribute_name(name), "{:?}", name);
        }

        let mut options = HtmlOptions::new();
        options.insert("onclick=\"x\" title".to_string(), "y".to_string());
        options.insert("title".to_string(), "ok".to_string());
        assert_eq!(render_attributes(&MaudEncoder, &options), " title=\"ok\"");
    }
}
