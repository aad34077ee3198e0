//! File-role structural fixes
//!
//! The application root must wire the router through a single `routerConfig`
//! argument of `MaterialApp.router`, and must not keep a local copy of the router.
//! The Flutter manifest must declare the router package the generated code uses.

use super::rule::{file_name, is_dart, FixRule};
use super::scan::enclosing_block_end;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

const ROUTER_CALL: &str = "AppRouter().router";
const GO_ROUTER_DEPENDENCY: &str = "  go_router: ^14.2.0\n";

pub struct AppRootRule;

impl AppRootRule {
    fn collapse_delegate_triple(content: &str) -> String {
        static DELEGATE_TRIPLE: OnceLock<Regex> = OnceLock::new();
        let re = DELEGATE_TRIPLE.get_or_init(|| {
            Regex::new(concat!(
                r"routerDelegate:\s*([\w().]+?)\.routerDelegate\s*,\s*",
                r"routeInformationParser:\s*[\w().]+?\.routeInformationParser\s*,",
                r"(?:\s*routeInformationProvider:\s*[\w().]+?\.routeInformationProvider\s*,)?",
            ))
            .expect("Invalid router delegate regex")
        });
        re.replace_all(content, "routerConfig: $1,").into_owned()
    }

    /// Removes `final router = AppRouter().router;` style locals and inlines the call
    fn inline_router_local(content: &str) -> String {
        static ROUTER_LOCAL: OnceLock<Regex> = OnceLock::new();
        static ROUTER_HOLDER: OnceLock<Regex> = OnceLock::new();
        let local_re = ROUTER_LOCAL.get_or_init(|| {
            Regex::new(
                r"(?m)^[ \t]*(?:final|var|late final)\s+(?:GoRouter\s+)?(\w+)\s*=\s*AppRouter\(\)\.router\s*;[ \t]*\r?\n",
            )
            .expect("Invalid router local regex")
        });
        let holder_re = ROUTER_HOLDER.get_or_init(|| {
            Regex::new(
                r"(?m)^[ \t]*(?:final|var|late final)\s+(?:AppRouter\s+)?(\w+)\s*=\s*AppRouter\(\)\s*;[ \t]*\r?\n",
            )
            .expect("Invalid router holder regex")
        });

        let mut out = content.to_string();

        while let Some(caps) = local_re.captures(&out) {
            let Some(decl) = caps.get(0) else {
                break;
            };
            let name = caps[1].to_string();
            out = inline_declaration(&out, decl.range(), &[(name.as_str(), ROUTER_CALL)]);
        }

        while let Some(caps) = holder_re.captures(&out) {
            let Some(decl) = caps.get(0) else {
                break;
            };
            let name = caps[1].to_string();
            let router = format!("{}.router", name);
            out = inline_declaration(
                &out,
                decl.range(),
                &[(router.as_str(), ROUTER_CALL), (name.as_str(), "AppRouter()")],
            );
        }

        out
    }

    fn use_router_constructor(content: &str) -> String {
        static PLAIN_APP: OnceLock<Regex> = OnceLock::new();
        if !content.contains("routerConfig:") {
            return content.to_string();
        }
        let re = PLAIN_APP
            .get_or_init(|| Regex::new(r"\bMaterialApp\(").expect("Invalid MaterialApp regex"));
        re.replace_all(content, "MaterialApp.router(").into_owned()
    }
}

/// Drops the declaration at `decl` and applies `replacements` from there to the
/// end of the block declaring it (the end of the file for top-level declarations)
fn inline_declaration(content: &str, decl: Range<usize>, replacements: &[(&str, &str)]) -> String {
    let scope_end = enclosing_block_end(content, decl.start).unwrap_or(content.len());
    let mut scope = content[decl.end..scope_end].to_string();
    for (name, replacement) in replacements {
        scope = replace_identifier(&scope, name, replacement);
    }

    let mut out = String::with_capacity(content.len());
    out.push_str(&content[..decl.start]);
    out.push_str(&scope);
    out.push_str(&content[scope_end..]);
    out
}

/// Replaces whole-identifier occurrences of `name` (which may contain dots) that
/// are not member accesses on something else, named-argument labels or part of
/// an import path
fn replace_identifier(content: &str, name: &str, replacement: &str) -> String {
    let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(name))) else {
        return content.to_string();
    };

    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for m in re.find_iter(content) {
        let before = content[..m.start()].chars().next_back();
        let after = content[m.end()..].chars().next();
        if matches!(before, Some('.' | '\'' | '"' | '/')) || matches!(after, Some('/' | ':')) {
            continue;
        }
        out.push_str(&content[last..m.start()]);
        out.push_str(replacement);
        last = m.end();
    }
    out.push_str(&content[last..]);
    out
}

impl FixRule for AppRootRule {
    fn name(&self) -> &'static str {
        "app_root"
    }

    fn applies_to(&self, path: &str) -> bool {
        is_dart(path) && file_name(path) == "main.dart"
    }

    fn apply(&self, content: &str, _path: &str) -> String {
        let out = Self::collapse_delegate_triple(content);
        let out = Self::inline_router_local(&out);
        Self::use_router_constructor(&out)
    }
}

/// Declares `go_router` in a Flutter manifest that lacks it
pub struct ManifestDependencyRule;

impl FixRule for ManifestDependencyRule {
    fn name(&self) -> &'static str {
        "manifest_dependency"
    }

    fn applies_to(&self, path: &str) -> bool {
        file_name(path) == "pubspec.yaml"
    }

    fn apply(&self, content: &str, _path: &str) -> String {
        static DEPENDENCIES: OnceLock<Regex> = OnceLock::new();
        if content.contains("go_router") || !content.contains("sdk: flutter") {
            return content.to_string();
        }
        let re = DEPENDENCIES.get_or_init(|| {
            Regex::new(
                r"(?m)^dependencies:[ \t]*\r?\n(?:[ \t]+flutter:[ \t]*\r?\n[ \t]+sdk:[ \t]*flutter[ \t]*\r?\n)?",
            )
            .expect("Invalid dependencies regex")
        });
        match re.find(content) {
            Some(m) => {
                let mut out = String::with_capacity(content.len() + GO_ROUTER_DEPENDENCY.len());
                out.push_str(&content[..m.end()]);
                out.push_str(GO_ROUTER_DEPENDENCY);
                out.push_str(&content[m.end()..]);
                out
            }
            None => content.to_string(),
        }
    }
}
