//! Loose fenced blocks named somewhere in the surrounding prose

use super::strategy::{
    block_content, is_plausible_path, normalize_path, ExtractedFile, ExtractionStrategy, FENCE,
};
use regex::Regex;
use std::sync::OnceLock;

fn filename_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:file(?:name)?|path)\b\s*[:=]?\s*[*_`"']*\s*([\w][\w./-]*\.[A-Za-z0-9]+)"#)
            .expect("Invalid filename regex")
    })
}

/// Splits the reply on fences and names each code chunk after the last
/// `file`/`filename`/`path` mention in the prose chunk before it
pub struct LooseBlockStrategy;

impl LooseBlockStrategy {
    fn filename_in(prose: &str) -> Option<String> {
        filename_regex()
            .captures_iter(prose)
            .filter_map(|caps| caps.get(1).map(|m| normalize_path(m.as_str())))
            .filter(|path| is_plausible_path(path))
            .last()
    }
}

impl ExtractionStrategy for LooseBlockStrategy {
    fn name(&self) -> &'static str {
        "loose_block"
    }

    fn extract(&self, text: &str) -> Vec<ExtractedFile> {
        let chunks: Vec<&str> = text.split(FENCE).collect();
        let mut files = Vec::new();

        for (index, code) in chunks.iter().enumerate().skip(1).step_by(2) {
            let prose = chunks[index - 1];
            let Some(path) = Self::filename_in(prose) else {
                continue;
            };
            let content = block_content(code);
            if !content.is_empty() {
                files.push(ExtractedFile::new(path, content));
            }
        }
        files
    }
}
