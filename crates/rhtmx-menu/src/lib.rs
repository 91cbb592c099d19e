//! # RHTMX Menu
//!
//! Menu normalization and active-route matching for RHTMX menu widgets:
//! - Nested menus written as loosely-shaped config (JSON or TOML)
//! - Shorthand groups (`"Admin": [...]`) rendered as unlinked headings
//! - Active item detection by route, regex, or route + query parameters
//! - Optional CSS class on the active item
//! - Nested `<ul>` rendering with Maud
//!
//! ## Example
//!
//! ```
//! use rhtmx_menu::{normalize, RouteContext};
//! use serde_json::json;
//!
//! let ctx = RouteContext::new("post", "list");
//! let items = normalize(
//!     &json!({
//!         "0": ["Home", "site/index"],
//!         "Blog": [
//!             ["Posts", "post/list"],
//!             ["Drafts", "post/drafts", {"visible": false}]
//!         ]
//!     }),
//!     &ctx,
//!     Some("active"),
//! )
//! .unwrap();
//!
//! assert_eq!(items.len(), 2);
//! assert!(!items[1].is_active);
//! assert!(items[1].children[0].is_active);
//! assert_eq!(items[1].children.len(), 1);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod context;
pub mod encoder;
pub mod error;
pub mod item;
pub mod list_menu;
pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod pattern;
pub mod resolver;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::MenuConfig;
pub use context::RouteContext;
pub use encoder::{HtmlEncoder, MaudEncoder};
pub use error::{InvalidItemError, ItemPath, PathSegment};
pub use item::{GroupItem, HtmlOptions, LinkItem, LinkTarget, MenuItem};
pub use list_menu::ListMenu;
pub use matcher::is_active;
pub use normalize::{normalize, MenuNormalizer, NormalizedMenuItem};
pub use parser::parse_items;
pub use pattern::{ParamValue, ParamsPolicy, Pattern, RouteTarget};
pub use resolver::{PathUrlResolver, UrlResolver};

// Re-export Maud's markup type for callers rendering menus
pub use maud::Markup;
