//! Text helpers for list subtitles and open-URL actions.

use crate::model::project::LinkKind;
use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;
const SHOPIFY_ADMIN_STORE_URL: &str = "https://admin.shopify.com/store/";

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static STORE_HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-]*$").expect("valid handle regex"));
static URI_SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("valid scheme regex"));

/// Plain-text summary of a markdown description.
///
/// Images are dropped, link text is kept, markdown symbols are removed,
/// whitespace collapses, and the first 100 chars are retained. Returns
/// `None` when nothing readable is left.
pub fn description_preview(markdown: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(markdown, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}

/// Turns a stored link value into something a browser can open.
///
/// Values carrying a URI scheme (`https:`, `mailto:`, `figma:`) pass through.
/// Partial values such as `github.com/acme/site` get `https://` prepended.
pub fn resolve_link(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    // `localhost:3000` parses as a scheme; a digit after the colon means port.
    let has_scheme = URI_SCHEME_RE
        .find(trimmed)
        .is_some_and(|found| !trimmed[found.end()..].starts_with(|c: char| c.is_ascii_digit()));
    if has_scheme {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

/// Like `resolve_link`, with per-slot shorthands.
///
/// A bare store handle in the backend slot (`shop-one`) opens that store's
/// Shopify admin.
pub fn resolve_link_as(kind: LinkKind, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if kind == LinkKind::Backend && STORE_HANDLE_RE.is_match(trimmed) {
        return Some(format!("{SHOPIFY_ADMIN_STORE_URL}{trimmed}/"));
    }
    resolve_link(trimmed)
}
