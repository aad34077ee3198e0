//! Content signatures for mandatory scaffold files
//!
//! Used when a reply names nothing at all: a block that looks like the Flutter
//! entry point is taken to be `lib/main.dart`, and so on.

use super::strategy::{block_content, fenced_blocks, ExtractedFile, ExtractionStrategy};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Extensions a canonical scaffold path may carry
pub const ALLOWED_EXTENSIONS: &[&str] = &["dart", "yaml", "ts", "json", "html", "scss", "css"];

/// `(signature, canonical path)`
type Signature = (&'static str, &'static str);

/// Scaffold signatures, in the order files are emitted
const SIGNATURES: &[Signature] = &[
    (r"(?s)void\s+main\s*\([^)]*\).*?\brunApp\s*\(", "lib/main.dart"),
    (r"(?ms)^name:\s*\S+.*?^\s+sdk:\s*flutter\b", "pubspec.yaml"),
    (r"\bclass\s+AppRouter\b", "lib/router/app_router.dart"),
    (r"\bclass\s+AppTheme\b", "lib/theme/app_theme.dart"),
    (
        r"\bplatformBrowserDynamic\s*\(\s*\)\s*\.\s*bootstrapModule\s*\(|\bbootstrapApplication\s*\(",
        "src/main.ts",
    ),
    (r"@NgModule\s*\(", "src/app/app.module.ts"),
    (r"\bexport\s+const\s+routes\s*:\s*Routes\b", "src/app/app.routes.ts"),
    (
        r#"(?s)@Component\s*\(\s*\{.*?selector\s*:\s*['"]app-root['"]"#,
        "src/app/app.component.ts",
    ),
    (r#""@angular/core"\s*:"#, "package.json"),
    (r"<app-root>\s*</app-root>", "src/index.html"),
];

pub fn has_allowed_extension(path: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext))
}

fn compile(table: &[Signature]) -> Vec<(Regex, &'static str)> {
    table
        .iter()
        .map(|(pattern, path)| (Regex::new(pattern).expect("Invalid signature regex"), *path))
        .collect()
}

fn signatures() -> &'static [(Regex, &'static str)] {
    static COMPILED: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    COMPILED.get_or_init(|| compile(SIGNATURES))
}

/// Recognises scaffold files by content and assigns their canonical path
pub struct SignatureStrategy;

impl SignatureStrategy {
    fn extract_with(text: &str, signatures: &[(Regex, &'static str)]) -> Vec<ExtractedFile> {
        let blocks = fenced_blocks(text);
        let mut files = Vec::new();

        for (re, path) in signatures {
            if !has_allowed_extension(path) {
                warn!("Skipping signature for {}: extension not allowed", path);
                continue;
            }
            // The signature must sit inside a block; mentions in prose do not count
            let Some(block) = blocks.iter().find(|block| re.is_match(block.raw(text))) else {
                continue;
            };
            let content = block_content(block.raw(text));
            if !content.is_empty() {
                files.push(ExtractedFile::new(*path, content));
            }
        }
        files
    }
}

impl ExtractionStrategy for SignatureStrategy {
    fn name(&self) -> &'static str {
        "signature"
    }

    fn extract(&self, text: &str) -> Vec<ExtractedFile> {
        Self::extract_with(text, signatures())
    }
}
