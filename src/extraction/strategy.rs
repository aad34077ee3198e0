//! Extraction strategy abstraction and the fence helpers all strategies share

use regex::Regex;
use std::sync::OnceLock;

pub const FENCE: &str = "```";

/// One file recovered from a generative reply, before repair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub path: String,
    pub content: String,
}

impl ExtractedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// One way of recovering `(path, content)` pairs from free-form text
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Files in reply order; empty when the strategy does not recognise the text
    fn extract(&self, text: &str) -> Vec<ExtractedFile>;
}

/// A fenced code block located by its fence offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Offset of the opening fence
    pub open: usize,
    /// Offset of the closing fence, or the text length for an unclosed block
    pub close: usize,
    /// End of the preceding block's closing fence, or 0
    pub prose_start: usize,
}

impl FencedBlock {
    /// Text between the fences, info line included
    pub fn raw<'a>(&self, text: &'a str) -> &'a str {
        &text[(self.open + FENCE.len()).min(self.close)..self.close]
    }

    /// The info string after the opening fence (`dart`, `dart lib/main.dart`, ...)
    pub fn info<'a>(&self, text: &'a str) -> &'a str {
        let raw = self.raw(text);
        raw.split_once('\n').map(|(first, _)| first).unwrap_or("").trim()
    }

    pub fn prose<'a>(&self, text: &'a str) -> &'a str {
        &text[self.prose_start..self.open]
    }
}

/// Offsets of every fence in `text`
pub fn fence_offsets(text: &str) -> Vec<usize> {
    text.match_indices(FENCE).map(|(i, _)| i).collect()
}

/// Pairs fences into blocks: 0 opens, 1 closes, 2 opens, ...
///
/// A trailing unmatched fence opens a block that runs to the end of the text,
/// which keeps truncated replies usable.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let offsets = fence_offsets(text);
    let mut blocks = Vec::new();
    let mut prose_start = 0;
    for pair in offsets.chunks(2) {
        let open = pair[0];
        let close = pair.get(1).copied().unwrap_or(text.len());
        blocks.push(FencedBlock {
            open,
            close,
            prose_start,
        });
        prose_start = (close + FENCE.len()).min(text.len());
    }
    blocks
}

/// Drops the info line of a raw fenced chunk and normalises the trailing newline
pub fn block_content(raw: &str) -> String {
    let body = match raw.split_once('\n') {
        Some((_, rest)) => rest,
        None if is_language_tag(raw) => "",
        None => raw,
    };
    let body = body.trim_end();
    if body.trim().is_empty() {
        return String::new();
    }
    format!("{}\n", body)
}

fn is_language_tag(s: &str) -> bool {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"^\s*[\w+#.-]*\s*$").expect("Invalid language tag regex"))
        .is_match(s)
}

/// Normalises a path taken from a reply: quotes and emphasis are stripped, as are
/// leading `./` and `/`. Traversal is left for the project writer to reject.
pub fn normalize_path(raw: &str) -> String {
    let mut path = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '`' | '*' | '"' | '\'' | ':' | ','))
        .trim()
        .replace('\\', "/");
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest.to_string();
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest.to_string();
        } else {
            break;
        }
    }
    path
}

/// Whether a normalised path looks like a file path rather than prose
pub fn is_plausible_path(path: &str) -> bool {
    if path.is_empty() || path.len() > 200 || path.chars().any(char::is_whitespace) {
        return false;
    }
    match path.rsplit('/').next().and_then(|name| name.rsplit_once('.')) {
        Some((stem, ext)) => {
            !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_blocks() {
        let text = "intro\n```dart\nmain\n```\nmiddle\n```yaml\nname: x\n```";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].prose(text), "intro\n");
        assert_eq!(blocks[0].info(text), "dart");
        assert_eq!(block_content(blocks[0].raw(text)), "main\n");
        assert_eq!(blocks[1].prose(text), "\nmiddle\n");
        assert_eq!(block_content(blocks[1].raw(text)), "name: x\n");
    }

    #[test]
    fn test_unclosed_block_runs_to_end() {
        let text = "```dart\nvoid main() {}\n";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].close, text.len());
        assert_eq!(block_content(blocks[0].raw(text)), "void main() {}\n");
    }

    #[test]
    fn test_block_content_single_line() {
        assert_eq!(block_content("dart"), "");
        assert_eq!(block_content("print('x');"), "print('x');\n");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(" `./lib/main.dart` "), "lib/main.dart");
        assert_eq!(normalize_path("**/src/app/app.module.ts**"), "src/app/app.module.ts");
        assert_eq!(normalize_path("\"pubspec.yaml\""), "pubspec.yaml");
        assert_eq!(normalize_path("lib\\screens\\home.dart"), "lib/screens/home.dart");
    }

    #[test]
    fn test_plausible_path() {
        assert!(is_plausible_path("lib/main.dart"));
        assert!(is_plausible_path("pubspec.yaml"));
        assert!(!is_plausible_path("main"));
        assert!(!is_plausible_path("the main file.dart"));
        assert!(!is_plausible_path("lib/.dart"));
    }
}
