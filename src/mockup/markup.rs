//! Pattern-level scanning of diagram markup
//!
//! Nothing in here parses the markup structurally. Every helper works on raw
//! substrings so malformed or truncated documents can only lose matches.

use regex::Regex;
use std::sync::OnceLock;

/// Shape identifier of the phone frame; one occurrence per laid-out screen
pub const DEVICE_FRAME_MARKER: &str = "mxgraph.android.phone2";

/// Style prefix of ellipse shapes, used for radio buttons
pub const ELLIPSE_MARKER: &str = "ellipse;";

/// Labels the drawing tool inserts for freshly dropped shapes
pub const PLACEHOLDER_LABELS: &[&str] = &["Text", "Button", "Label"];

const FONT_NOISE: &[&str] = &[
    "helvetica",
    "arial",
    "verdana",
    "roboto",
    "sans-serif",
    "monospace",
    "fontfamily",
    "fontsize",
];

const URL_NOISE: &[&str] = &["http://", "https://", "www.", "data:image"];

const MAX_LABEL_CHARS: usize = 100;

/// A label recovered from the markup together with its byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub offset: usize,
}

/// Counts non-overlapping occurrences of `needle`
pub fn count_occurrences(markup: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    markup.matches(needle).count()
}

/// Finds the first occurrence of `term` that is not embedded in a longer word
pub fn find_term(markup: &str, term: &str) -> Option<usize> {
    find_bounded(markup, term, markup)
}

/// Case-insensitive variant of [`find_term`] (ASCII folding keeps byte offsets stable)
pub fn find_term_ci(markup: &str, term: &str) -> Option<usize> {
    let haystack = markup.to_ascii_lowercase();
    let needle = term.to_ascii_lowercase();
    find_bounded(&haystack, &needle, markup)
}

fn find_bounded(haystack: &str, needle: &str, original: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let bytes = original.as_bytes();
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + 1;
        while from < haystack.len() && !haystack.is_char_boundary(from) {
            from += 1;
        }
        if from >= haystack.len() {
            break;
        }
    }
    None
}

/// Returns every label-like attribute value, decoded and noise-filtered, in source order
///
/// Duplicates keep their first offset.
pub fn label_texts(markup: &str) -> Vec<Label> {
    static LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = LABEL_REGEX.get_or_init(|| {
        Regex::new(r#"\b(?:value|label)="([^"]*)""#).expect("Invalid label regex")
    });

    let mut labels: Vec<Label> = Vec::new();
    for cap in re.captures_iter(markup) {
        let Some(raw) = cap.get(1) else { continue };
        let text = clean_label(raw.as_str());
        if is_noise(&text) || labels.iter().any(|l| l.text == text) {
            continue;
        }
        labels.push(Label {
            text,
            offset: raw.start(),
        });
    }
    labels
}

/// Decodes the entities the drawing tool emits and strips inline HTML
pub fn clean_label(raw: &str) -> String {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

    let decoded = raw
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&#xa;", " ")
        .replace("&#10;", " ")
        .replace("&amp;", "&");
    let stripped = tag_re.replace_all(&decoded, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for values that are styling, URLs, numbers, colors or placeholder labels
pub fn is_noise(text: &str) -> bool {
    static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();
    static HEX_REGEX: OnceLock<Regex> = OnceLock::new();
    let numeric_re = NUMERIC_REGEX.get_or_init(|| {
        Regex::new(r"^-?\d+(?:\.\d+)?(?:px|pt|%)?$").expect("Invalid numeric regex")
    });
    let hex_re = HEX_REGEX.get_or_init(|| {
        Regex::new(r"^(?:#[0-9a-fA-F]{3,8}|0x[0-9a-fA-F]+|[0-9a-fA-F]{6,8})$")
            .expect("Invalid hex regex")
    });

    let len = text.chars().count();
    if len == 0 || len >= MAX_LABEL_CHARS {
        return true;
    }
    if text.contains(';') || text.contains('=') {
        return true;
    }
    let lower = text.to_lowercase();
    if FONT_NOISE.iter().any(|f| lower.contains(f)) || URL_NOISE.iter().any(|u| lower.contains(u)) {
        return true;
    }
    if numeric_re.is_match(text) {
        return true;
    }
    if hex_re.is_match(text) && (text.starts_with('#') || text.chars().any(|c| c.is_ascii_digit())) {
        return true;
    }
    PLACEHOLDER_LABELS.contains(&text)
}

/// Distinct fill/stroke/font colors in source order, upper-cased
pub fn style_colors(markup: &str) -> Vec<String> {
    static COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = COLOR_REGEX.get_or_init(|| {
        Regex::new(r"(?:fillColor|strokeColor|fontColor)=(#[0-9a-fA-F]{6}|#[0-9a-fA-F]{3})\b")
            .expect("Invalid color regex")
    });

    let mut colors: Vec<String> = Vec::new();
    for cap in re.captures_iter(markup) {
        let color = cap[1].to_uppercase();
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
    colors
}

/// Converts a free-form label into a PascalCase identifier
///
/// Articles and short connectives are dropped unless nothing else remains, and
/// leading digits are skipped so the result is a valid class name.
pub fn to_pascal_case(text: &str) -> String {
    const STOPWORDS: &[&str] = &["a", "an", "the", "of", "and", "to", "your"];

    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let kept: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !STOPWORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    let words = if kept.is_empty() { words } else { kept };

    let mut out = String::new();
    for word in words.iter().take(4) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out.trim_start_matches(|c: char| c.is_ascii_digit()).to_string()
}

/// Builds a screen title from a label, e.g. `"Create a project"` -> `CreateProjectScreen`
pub fn screen_title(text: &str) -> Option<String> {
    let base = to_pascal_case(text);
    if base.is_empty() {
        return None;
    }
    if base.ends_with("Screen") {
        Some(base)
    } else {
        Some(format!("{}Screen", base))
    }
}
