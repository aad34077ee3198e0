//! Import path rules
//!
//! Generated projects often import their own files through a guessed package
//! name. Those imports are rewritten relative to the importing file, while
//! imports of known third-party packages stay untouched. A second rule adds the
//! framework imports a file needs but forgot.

use super::rule::FixRule;
use regex::Regex;
use std::sync::OnceLock;

/// Packages that are never part of the generated project
pub const THIRD_PARTY_PACKAGES: &[&str] = &[
    "flutter",
    "flutter_test",
    "flutter_localizations",
    "flutter_bloc",
    "flutter_riverpod",
    "flutter_svg",
    "go_router",
    "provider",
    "riverpod",
    "bloc",
    "equatable",
    "http",
    "dio",
    "intl",
    "cupertino_icons",
    "shared_preferences",
    "google_fonts",
    "path",
    "path_provider",
    "collection",
    "meta",
    "async",
    "url_launcher",
    "cached_network_image",
    "font_awesome_flutter",
    "uuid",
    "json_annotation",
    "freezed_annotation",
    "get",
    "get_it",
    "image_picker",
    "sqflite",
    "firebase_core",
    "firebase_auth",
    "cloud_firestore",
];

const MATERIAL_IMPORT: &str = "import 'package:flutter/material.dart';";
const GO_ROUTER_IMPORT: &str = "import 'package:go_router/go_router.dart';";

/// Rewrites `package:<app>/...` imports of project files to relative paths
pub struct RelativeImportRule;

impl FixRule for RelativeImportRule {
    fn name(&self) -> &'static str {
        "relative_imports"
    }

    fn applies_to(&self, path: &str) -> bool {
        path.ends_with(".dart") && path.starts_with("lib/")
    }

    fn apply(&self, content: &str, path: &str) -> String {
        static PACKAGE_IMPORT: OnceLock<Regex> = OnceLock::new();
        let re = PACKAGE_IMPORT.get_or_init(|| {
            Regex::new(r#"\b(import|export)(\s+)(['"])package:(\w+)/([^'"]+)(['"])"#)
                .expect("Invalid package import regex")
        });

        let from_dir: Vec<&str> = path
            .trim_start_matches("lib/")
            .split('/')
            .collect::<Vec<_>>()
            .split_last()
            .map(|(_, dirs)| dirs.to_vec())
            .unwrap_or_default();

        re.replace_all(content, |caps: &regex::Captures| {
            let package = &caps[4];
            if THIRD_PARTY_PACKAGES.contains(&package) {
                return caps[0].to_string();
            }
            format!(
                "{}{}{}{}{}",
                &caps[1],
                &caps[2],
                &caps[3],
                relative_path(&from_dir, &caps[5]),
                &caps[6]
            )
        })
        .into_owned()
    }
}

/// Relative path from the directory `from_dir` (relative to `lib/`) to `target`
fn relative_path(from_dir: &[&str], target: &str) -> String {
    let target_parts: Vec<&str> = target.split('/').filter(|p| !p.is_empty()).collect();
    let Some((file, target_dir)) = target_parts.split_last() else {
        return target.to_string();
    };

    let common = from_dir
        .iter()
        .zip(target_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_dir.len() - common];
    parts.extend_from_slice(&target_dir[common..]);
    parts.push(*file);
    parts.join("/")
}

/// Prepends framework imports for capabilities a file uses without importing
pub struct MissingImportRule;

impl MissingImportRule {
    fn needs_material(content: &str) -> bool {
        static MARKERS: OnceLock<Regex> = OnceLock::new();
        let re = MARKERS.get_or_init(|| {
            Regex::new(concat!(
                r"\b(?:StatelessWidget|StatefulWidget|BuildContext|MaterialApp|Scaffold|ThemeData)\b",
                r"|\bTheme\.of\(|\bColors\.",
            ))
            .expect("Invalid material marker regex")
        });
        !content.contains("package:flutter/material.dart") && re.is_match(content)
    }

    fn needs_go_router(content: &str) -> bool {
        const MARKERS: &[&str] = &["context.go(", "context.push(", "GoRouter", "GoRoute("];
        !content.contains("package:go_router/go_router.dart")
            && MARKERS.iter().any(|m| content.contains(m))
    }
}

impl FixRule for MissingImportRule {
    fn name(&self) -> &'static str {
        "missing_imports"
    }

    fn apply(&self, content: &str, _path: &str) -> String {
        let mut header = String::new();
        if Self::needs_material(content) {
            header.push_str(MATERIAL_IMPORT);
            header.push('\n');
        }
        if Self::needs_go_router(content) {
            header.push_str(GO_ROUTER_IMPORT);
            header.push('\n');
        }
        if header.is_empty() {
            return content.to_string();
        }
        format!("{}{}", header, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path(&["screens"], "widgets/drawer.dart"), "../widgets/drawer.dart");
        assert_eq!(relative_path(&[], "screens/home.dart"), "screens/home.dart");
        assert_eq!(relative_path(&["screens"], "screens/home.dart"), "home.dart");
        assert_eq!(relative_path(&["a", "b"], "c.dart"), "../../c.dart");
    }

    #[test]
    fn test_rewrites_project_imports() {
        let input = "import 'package:my_app/widgets/app_drawer.dart';\nimport 'package:flutter/material.dart';\n";
        let out = RelativeImportRule.apply(input, "lib/screens/dashboard_screen.dart");
        assert_eq!(
            out,
            "import '../widgets/app_drawer.dart';\nimport 'package:flutter/material.dart';\n"
        );
    }

    #[test]
    fn test_rewrites_from_lib_root() {
        let input = "import \"package:app/router/app_router.dart\";";
        let out = RelativeImportRule.apply(input, "lib/main.dart");
        assert_eq!(out, "import \"router/app_router.dart\";");
    }

    #[test]
    fn test_only_applies_under_lib() {
        assert!(!RelativeImportRule.applies_to("test/widget_test.dart"));
        assert!(RelativeImportRule.applies_to("lib/main.dart"));
    }

    #[test]
    fn test_adds_material_import() {
        let input = "class A extends StatelessWidget {}\n";
        let out = MissingImportRule.apply(input, "lib/a.dart");
        assert!(out.starts_with(MATERIAL_IMPORT));
        assert_eq!(MissingImportRule.apply(&out, "lib/a.dart"), out);
    }

    #[test]
    fn test_adds_go_router_import() {
        let input = "import 'package:flutter/material.dart';\nvoid f(BuildContext context) { context.go('/'); }\n";
        let out = MissingImportRule.apply(input, "lib/a.dart");
        assert!(out.starts_with(GO_ROUTER_IMPORT));
    }

    #[test]
    fn test_app_color_constants_need_no_material() {
        let input = "import 'app_colors.dart';\n\nfinal tint = AppColors.primary;\n";
        assert_eq!(MissingImportRule.apply(input, "lib/theme/tint.dart"), input);

        let uses_material = "final tint = Colors.blue;\n";
        assert!(MissingImportRule
            .apply(uses_material, "lib/theme/tint.dart")
            .starts_with(MATERIAL_IMPORT));
    }

    #[test]
    fn test_plain_dart_untouched() {
        let input = "int add(int a, int b) => a + b;\n";
        assert_eq!(MissingImportRule.apply(input, "lib/math.dart"), input);
    }
}
