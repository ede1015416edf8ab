//! README scanning.

use once_cell::sync::Lazy;
use regex::Regex;

static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).expect("valid img regex"));

/// URL of the first `<img>` in `readme` that is not a `badge.svg`.
pub fn first_image_url(readme: &str) -> Option<String> {
    IMG_SRC_RE
        .captures_iter(readme)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|url| !url.to_lowercase().contains("badge.svg"))
        .map(str::to_owned)
}
