//! Explicit file markers
//!
//! Recognises a declaration on the line right before a fenced block:
//!
//! ```text
//! [FILE: lib/main.dart]
//! FILE: lib/main.dart          (also **File:**, // File:, ### File:)
//! ```
//!
//! or a path following the language tag on the fence line itself
//! (`` ```dart lib/main.dart ``).

use super::strategy::{
    block_content, fenced_blocks, is_plausible_path, normalize_path, ExtractedFile,
    ExtractionStrategy, FencedBlock,
};
use regex::Regex;
use std::sync::OnceLock;

fn bracketed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\[\s*file\s*:\s*([^\]]+?)\s*\]$").expect("Invalid bracketed marker regex")
    })
}

fn plain_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:#{1,6}\s*|//\s*|<!--\s*)?(?:\*\*)?\s*file\s*:\s*(?:\*\*)?\s*(.+?)\s*(?:-->)?$")
            .expect("Invalid plain marker regex")
    })
}

fn inline_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[\w+#.-]+\s+(\S+)$").expect("Invalid inline marker regex")
    })
}

pub struct MarkerStrategy;

impl MarkerStrategy {
    /// Path declared for `block`, checked in order: bracketed, plain, inline
    fn declared_path(text: &str, block: &FencedBlock) -> Option<String> {
        let marker_line = block
            .prose(text)
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty());

        let candidates = [
            marker_line.and_then(|line| bracketed_regex().captures(line)),
            marker_line.and_then(|line| plain_regex().captures(line)),
            inline_regex().captures(block.info(text)),
        ];

        candidates
            .into_iter()
            .flatten()
            .map(|caps| normalize_path(&caps[1]))
            .find(|path| is_plausible_path(path))
    }
}

impl ExtractionStrategy for MarkerStrategy {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn extract(&self, text: &str) -> Vec<ExtractedFile> {
        fenced_blocks(text)
            .iter()
            .filter_map(|block| {
                let path = Self::declared_path(text, block)?;
                let content = block_content(block.raw(text));
                (!content.is_empty()).then(|| ExtractedFile::new(path, content))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        bracketed = { "[FILE: lib/main.dart]\n```dart\nvoid main() {}\n```" },
        bracketed_lowercase = { "[file: lib/main.dart]\n\n```dart\nvoid main() {}\n```" },
        plain = { "FILE: lib/main.dart\n```dart\nvoid main() {}\n```" },
        bold = { "**File:** `lib/main.dart`\n```dart\nvoid main() {}\n```" },
        comment = { "// File: lib/main.dart\n```dart\nvoid main() {}\n```" },
        heading = { "### File: lib/main.dart\n```dart\nvoid main() {}\n```" },
        inline = { "Entry point:\n```dart lib/main.dart\nvoid main() {}\n```" },
    )]
    fn test_marker_variants(reply: &str) {
        let files = MarkerStrategy.extract(reply);
        assert_eq!(files, vec![ExtractedFile::new("lib/main.dart", "void main() {}\n")]);
    }

    #[test]
    fn test_multiple_files_in_order() {
        let reply = "[FILE: pubspec.yaml]\n```yaml\nname: app\n```\n\n[FILE: lib/main.dart]\n```dart\nvoid main() {}\n```\n";
        let files = MarkerStrategy.extract(reply);
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["pubspec.yaml", "lib/main.dart"]);
    }

    #[test]
    fn test_marker_must_precede_block() {
        let reply = "[FILE: lib/main.dart]\nSome explanation first.\n```dart\nvoid main() {}\n```";
        assert!(MarkerStrategy.extract(reply).is_empty());
    }

    #[test]
    fn test_unmarked_blocks_ignored() {
        let reply = "```dart\nvoid main() {}\n```";
        assert!(MarkerStrategy.extract(reply).is_empty());
    }

    #[test]
    fn test_empty_block_skipped() {
        let reply = "[FILE: lib/empty.dart]\n```dart\n```";
        assert!(MarkerStrategy.extract(reply).is_empty());
    }
}
