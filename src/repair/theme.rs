//! Theme lookup rewrite for render-time code

use super::rule::FixRule;
use super::scan::{matching_close, statement_end};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::OnceLock;

/// Constant names mapped to the color scheme role that replaces them
const ROLE_TABLE: &[(&[&str], &str)] = &[
    (&["primaryColor", "primary"], "primary"),
    (
        &["secondaryColor", "secondary", "accentColor", "accent"],
        "secondary",
    ),
    (
        &["backgroundColor", "background", "surfaceColor", "surface"],
        "surface",
    ),
    (&["errorColor", "error"], "error"),
    (&["textColor", "textPrimary", "onSurface"], "onSurface"),
    (&["onPrimary"], "onPrimary"),
];

fn role_for(constant: &str) -> Option<&'static str> {
    ROLE_TABLE
        .iter()
        .find(|(names, _)| names.contains(&constant))
        .map(|(_, role)| *role)
}

fn build_method_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Widget\s+build\s*\(\s*BuildContext\s+(\w+)\s*\)").expect("Invalid build regex")
    })
}

fn constant_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:AppTheme|AppColors)\.(\w+)\b").expect("Invalid constant regex"))
}

fn const_keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bconst\s+").expect("Invalid const regex"))
}

/// Routes bare theme color constants used while building widgets through
/// `Theme.of(context).colorScheme`
pub struct ThemeLookupRule;

impl ThemeLookupRule {
    fn rewrite_line(line: &str, context: &str) -> String {
        let rewritten = constant_regex().replace_all(line, |caps: &Captures| {
            let whole = &caps[0];
            let Some(m) = caps.get(0) else {
                return whole.to_string();
            };
            // Member calls and nested accesses are not plain color constants
            if matches!(line[m.end()..].chars().next(), Some('(') | Some('.')) {
                return whole.to_string();
            }
            match role_for(&caps[1]) {
                Some(role) => format!("Theme.of({}).colorScheme.{}", context, role),
                None => whole.to_string(),
            }
        });

        if rewritten == line {
            return line.to_string();
        }
        const_keyword_regex().replace_all(&rewritten, "").into_owned()
    }

    /// Body of each `build` method, with the name of its context parameter.
    /// A block body ends at its matching brace, an arrow body at its `;`.
    fn build_bodies(content: &str) -> Vec<(Range<usize>, String)> {
        let mut bodies: Vec<(Range<usize>, String)> = Vec::new();
        for caps in build_method_regex().captures_iter(content) {
            let (Some(signature), Some(context)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if bodies.last().is_some_and(|(body, _)| signature.start() < body.end) {
                continue;
            }

            let rest = &content[signature.end()..];
            let start = signature.end() + (rest.len() - rest.trim_start().len());
            let end = if content[start..].starts_with('{') {
                matching_close(content, start)
            } else if content[start..].starts_with("=>") {
                statement_end(content, start)
            } else {
                None
            };
            if let Some(end) = end {
                bodies.push((start..end, context.as_str().to_string()));
            }
        }
        bodies
    }
}

impl FixRule for ThemeLookupRule {
    fn name(&self) -> &'static str {
        "theme_lookup"
    }

    fn apply(&self, content: &str, _path: &str) -> String {
        let bodies = Self::build_bodies(content);
        if bodies.is_empty() {
            return content.to_string();
        }

        let mut out = String::with_capacity(content.len());
        let mut last = 0;
        for (body, context) in bodies {
            out.push_str(&content[last..body.start]);
            for line in content[body.clone()].split_inclusive('\n') {
                out.push_str(&Self::rewrite_line(line, &context));
            }
            last = body.end;
        }
        out.push_str(&content[last..]);
        out
    }
}
