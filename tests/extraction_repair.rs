//! Recovering files from free-form replies and repairing them

use mockforge::extraction::CodeExtractor;
use mockforge::{extract_files, repair};

#[test]
fn test_reply_without_markers_or_fences() {
    let reply = "I'm sorry, but I can't generate that project right now. \
                 Please try again with a more detailed description.";
    assert!(extract_files(reply).is_empty());
}

#[test]
fn test_marker_strategy_wins_over_signature() {
    let reply = r#"Here is the app.

[FILE: lib/main.dart]
```dart
import 'package:flutter/material.dart';

void main() {
  runApp(const MaterialApp(home: Scaffold()));
}
```
"#;
    let outcome = CodeExtractor::new().extract(reply);

    assert_eq!(outcome.strategy, Some("marker"));
    assert_eq!(outcome.files.len(), 1);
    assert!(outcome.files.contains_key("lib/main.dart"));
}

#[test]
fn test_signature_strategy_names_unlabelled_blocks() {
    let reply = r#"```dart
import 'package:flutter/material.dart';

void main() {
  runApp(const MaterialApp(home: Scaffold()));
}
```

```yaml
name: demo
dependencies:
  flutter:
    sdk: flutter
```
"#;
    let outcome = CodeExtractor::new().extract(reply);

    assert_eq!(outcome.strategy, Some("signature"));
    assert!(outcome.files.contains_key("lib/main.dart"));
    let manifest = &outcome.files["pubspec.yaml"];
    assert!(manifest.contains("go_router"), "manifest was repaired: {}", manifest);
}

#[test]
fn test_extracted_files_are_repaired() {
    let reply = r#"[FILE: lib/main.dart]
```dart
import 'package:flutter/material.dart';
import 'package:demo/router/app_router.dart';

void main() => runApp(MaterialApp.router(routerConfig: AppRouter.router));
```
"#;
    let files = extract_files(reply);
    let main = &files["lib/main.dart"];

    assert!(main.contains("AppRouter().router"));
    assert!(!main.contains("AppRouter.router"));
    assert!(main.contains("import 'router/app_router.dart';"));
}

#[test]
fn test_router_singleton_repair() {
    let input = "final config = AppRouter.router;\nfinal other = AppRouter.router.routerDelegate;\n";
    let out = repair(input, "lib/app.dart");

    assert!(out.contains("AppRouter().router"));
    assert!(!out.contains("AppRouter.router"));
}

#[test]
fn test_circular_theme_repair_is_idempotent() {
    let input = r#"import 'package:flutter/material.dart';

class AppTheme {
  static final ColorScheme lightScheme = ColorScheme.fromSeed(
    seedColor: lightScheme.primary,
    primary: const Color(0xFF6200EE),
    secondary: Color(0xFF03DAC6),
  );

  static final ThemeData light = ThemeData(
    colorScheme: lightScheme,
    scaffoldBackgroundColor: AppTheme.lightScheme.secondary,
  );
}
"#;
    let once = repair(input, "lib/theme/app_theme.dart");
    let twice = repair(&once, "lib/theme/app_theme.dart");

    assert_ne!(once, input);
    assert_eq!(once, twice);
    assert!(!once.contains("seedColor: lightScheme.primary"));
}

#[test]
fn test_non_dart_files_pass_through() {
    let html = "<app-root></app-root>\n<!-- AppRouter.router -->\n";
    assert_eq!(repair(html, "src/index.html"), html);
}
