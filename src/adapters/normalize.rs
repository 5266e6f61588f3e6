use url::Url;

use crate::listing::collapse_whitespace;

/// Resolve a listing href against the board's base URL.
///
/// Absolute http(s) links pass through. Other schemes (`javascript:`,
/// `mailto:`) and unparseable input give `None`.
#[must_use]
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base).ok()?.join(href).ok()?,
        Err(_) => return None,
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Whether `c` is an emoji or flag glyph rather than text.
fn is_glyph(c: char) -> bool {
    matches!(
        c,
        '\u{1F1E6}'..='\u{1F1FF}'       // regional indicators (flags)
            | '\u{1F300}'..='\u{1FAFF}' // pictographs
            | '\u{2600}'..='\u{27BF}'   // misc symbols, dingbats
            | '\u{FE0F}'
            | '\u{200D}'
    )
}

/// Remove emoji and flag glyphs.
#[must_use]
pub fn strip_glyphs(text: &str) -> String {
    text.chars().filter(|c| !is_glyph(*c)).collect()
}

/// Clean location text scraped from pill-style UI labels.
///
/// Drops flag glyphs, the `Remote` marker and stray `+` counters, then
/// squeezes whitespace and trims spaces and commas. May return an empty
/// string, which callers replace with the board's sentinel.
#[must_use]
pub fn strip_location_pills(raw: &str) -> String {
    let text = strip_glyphs(raw)
        .replace("– Remote", "")
        .replace("Remote", "")
        .replace('+', "");
    collapse_whitespace(&text)
        .trim_matches(|c| c == ' ' || c == ',')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_url("https://dribbble.com", "/jobs/123-designer").as_deref(),
            Some("https://dribbble.com/jobs/123-designer")
        );
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        assert_eq!(
            resolve_url("https://builtin.com", "https://other.example/job/9").as_deref(),
            Some("https://other.example/job/9")
        );
    }

    #[test]
    fn test_resolve_rejects_non_http() {
        assert_eq!(resolve_url("https://a.test", "javascript:void(0)"), None);
        assert_eq!(resolve_url("https://a.test", "mailto:jobs@a.test"), None);
        assert_eq!(resolve_url("https://a.test", "#apply"), None);
        assert_eq!(resolve_url("https://a.test", "   "), None);
    }

    #[test]
    fn test_strip_pills_flags_and_markers() {
        assert_eq!(strip_location_pills("🇺🇸 United States – Remote"), "United States");
        assert_eq!(strip_location_pills("🇩🇪 Germany +2"), "Germany 2");
        assert_eq!(strip_location_pills("Remote"), "");
        assert_eq!(strip_location_pills("  Canada,  "), "Canada");
    }

    #[test]
    fn test_strip_glyphs_keeps_text() {
        assert_eq!(strip_glyphs("🌎 Worldwide").trim(), "Worldwide");
        assert_eq!(strip_glyphs("São Paulo"), "São Paulo");
    }
}
