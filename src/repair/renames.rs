//! Deprecated API renames

use super::rule::FixRule;
use regex::Regex;
use std::sync::OnceLock;

/// Text theme styles renamed by Material 3: (old, new)
const TEXT_THEME_RENAMES: &[(&str, &str)] = &[
    ("headline1", "displayLarge"),
    ("headline2", "displayMedium"),
    ("headline3", "displaySmall"),
    ("headline4", "headlineMedium"),
    ("headline5", "headlineSmall"),
    ("headline6", "titleLarge"),
    ("subtitle1", "titleMedium"),
    ("subtitle2", "titleSmall"),
    ("bodyText1", "bodyLarge"),
    ("bodyText2", "bodyMedium"),
];

/// Names too generic to rename outside a `textTheme.` access
const QUALIFIED_TEXT_THEME_RENAMES: &[(&str, &str)] = &[
    ("caption", "bodySmall"),
    ("button", "labelLarge"),
    ("overline", "labelSmall"),
];

/// Plain pattern rewrites: (regex, replacement)
const API_RENAMES: &[(&str, &str)] = &[
    (
        r"(\bTheme\.of\(\s*\w+\s*\)|\b(?:theme|[a-z]\w*Theme))\.accentColor\b",
        "$1.colorScheme.secondary",
    ),
    (r"\.withOpacity\(", ".withValues(alpha: "),
    (r"\bMaterialStatePropertyAll\b", "WidgetStatePropertyAll"),
    (r"\bMaterialStateProperty\b", "WidgetStateProperty"),
    (r"\bMaterialState\b", "WidgetState"),
];

/// Renames deprecated framework API names to their current equivalents
pub struct DeprecatedApiRule;

impl DeprecatedApiRule {
    fn rules() -> &'static [(Regex, String)] {
        static RULES: OnceLock<Vec<(Regex, String)>> = OnceLock::new();
        RULES.get_or_init(|| {
            let mut rules = Vec::new();
            for (old, new) in TEXT_THEME_RENAMES {
                rules.push((
                    Regex::new(&format!(r"\.{}\b", old)).expect("Invalid rename regex"),
                    format!(".{}", new),
                ));
                rules.push((
                    Regex::new(&format!(r"\b{}(\s*:)", old)).expect("Invalid rename regex"),
                    format!("{}$1", new),
                ));
            }
            for (old, new) in QUALIFIED_TEXT_THEME_RENAMES {
                rules.push((
                    Regex::new(&format!(r"\btextTheme\.{}\b", old)).expect("Invalid rename regex"),
                    format!("textTheme.{}", new),
                ));
            }
            for (pattern, replacement) in API_RENAMES {
                rules.push((
                    Regex::new(pattern).expect("Invalid rename regex"),
                    replacement.to_string(),
                ));
            }
            rules
        })
    }
}

impl FixRule for DeprecatedApiRule {
    fn name(&self) -> &'static str {
        "deprecated_api"
    }

    fn apply(&self, content: &str, _path: &str) -> String {
        let mut out = content.to_string();
        for (re, replacement) in Self::rules() {
            if re.is_match(&out) {
                out = re.replace_all(&out, replacement.as_str()).into_owned();
            }
        }
        out
    }
}
