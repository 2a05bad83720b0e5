//! Signal extraction from dining-site markup.
//!
//! Every function here is total: malformed or unrelated input produces
//! `None` fields, never an error.

use std::sync::LazyLock;

use regex::Regex;

static STATUS_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span class="status-text[^>]*>(.*?)</span>"#)
        .expect("valid status text regex")
});

static STATUS_DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<p class="dining-status">(.*?)</p>"#).expect("valid status detail regex")
});

static ACTIVITY_LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)id="activity-level">\s*([\d.]+)%"#).expect("valid activity level regex")
});

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Entity patterns and their plain-text replacements, applied in order.
static ENTITIES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)&nbsp;", " "),
        (r"(?i)&amp;", "&"),
        (r"(?i)&rsquo;|&#8217;", "'"),
        (r"(?i)&lsquo;", "'"),
        (r"(?i)&ldquo;|&rdquo;|&#8220;|&#8221;", "\""),
        (r"(?i)&#8211;|&ndash;", "-"),
        (r"(?i)&#8212;|&mdash;", "-"),
        (r"(?i)&hellip;|&#8230;", "..."),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid entity regex"), replacement))
    .collect()
});

/// Label and detail text found on a venue's page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub label: Option<String>,
    pub detail: Option<String>,
}

/// Pulls the status label and detail out of a venue page.
#[must_use]
pub fn extract_page(html: &str) -> PageSignals {
    PageSignals {
        label: first_capture(&STATUS_TEXT_RE, html).and_then(decode_html),
        detail: first_capture(&STATUS_DETAIL_RE, html).and_then(decode_html),
    }
}

/// Reads the activity-meter percentage, rounded to the nearest integer and
/// clamped to `0..=100`.
#[must_use]
pub fn extract_activity_level(html: &str) -> Option<u8> {
    let raw = first_capture(&ACTIVITY_LEVEL_RE, html)?;
    let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let level = value.round().clamp(0.0, 100.0) as u8;
    Some(level)
}

/// Converts a markup fragment to plain text. Returns `None` when nothing
/// but whitespace remains.
#[must_use]
pub fn decode_html(fragment: &str) -> Option<String> {
    let mut text = LINE_BREAK_RE.replace_all(fragment, " ").into_owned();
    for (pattern, replacement) in ENTITIES.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    let text = TAG_RE.replace_all(&text, "");
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn first_capture<'h>(re: &Regex, haystack: &'h str) -> Option<&'h str> {
    re.captures(haystack)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
