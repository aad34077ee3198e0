//! Flutter project templates: go_router navigation, Material 3 theme seeded
//! from the mockup's dominant color

use super::{camel_identifier, display_title, plain_texts, Blueprint};
use crate::mockup::{RadioGroup, ScreenSection};
use std::collections::BTreeMap;
use std::fmt::Write;

pub const MANIFEST: &str = "pubspec.yaml";
pub const MAIN: &str = "lib/main.dart";
pub const ROUTER: &str = "lib/router/app_router.dart";
pub const THEME: &str = "lib/theme/app_theme.dart";
pub const DRAWER: &str = "lib/widgets/app_drawer.dart";

pub const MANDATORY_FILES: &[&str] = &[MANIFEST, MAIN, ROUTER, THEME];

pub fn screen_path(section: &ScreenSection) -> String {
    format!("lib/screens/{}.dart", section.file_stem())
}

pub fn render(blueprint: &Blueprint) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    files.insert(MANIFEST.to_string(), manifest());
    files.insert(MAIN.to_string(), main_dart(blueprint));
    files.insert(ROUTER.to_string(), router(blueprint));
    files.insert(THEME.to_string(), theme(blueprint));
    if blueprint.drawer {
        files.insert(DRAWER.to_string(), drawer(blueprint));
    }
    for section in &blueprint.screens {
        files.insert(screen_path(section), screen(section, blueprint.drawer));
    }
    files
}

/// Template files that `path` imports
pub fn dependencies(blueprint: &Blueprint, path: &str) -> Vec<String> {
    match path {
        MAIN => vec![ROUTER.to_string(), THEME.to_string()],
        ROUTER => blueprint.screens.iter().map(screen_path).collect(),
        p if p.starts_with("lib/screens/") && blueprint.drawer => vec![DRAWER.to_string()],
        _ => Vec::new(),
    }
}

/// Single-quoted Dart string literal
fn dart_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

fn manifest() -> String {
    "name: mockforge_app
description: Generated from a UI mockup.
publish_to: 'none'
version: 1.0.0+1

environment:
  sdk: '>=3.3.0 <4.0.0'

dependencies:
  flutter:
    sdk: flutter
  go_router: ^14.2.0

dev_dependencies:
  flutter_test:
    sdk: flutter
  flutter_lints: ^4.0.0

flutter:
  uses-material-design: true
"
    .to_string()
}

fn main_dart(blueprint: &Blueprint) -> String {
    format!(
        "import 'package:flutter/material.dart';

import 'router/app_router.dart';
import 'theme/app_theme.dart';

void main() {{
  runApp(const MockforgeApp());
}}

class MockforgeApp extends StatelessWidget {{
  const MockforgeApp({{super.key}});

  @override
  Widget build(BuildContext context) {{
    return MaterialApp.router(
      title: {title},
      debugShowCheckedModeBanner: false,
      theme: AppTheme.light,
      darkTheme: AppTheme.dark,
      routerConfig: AppRouter().router,
    );
  }}
}}
",
        title = dart_string(&blueprint.app_title)
    )
}

fn router(blueprint: &Blueprint) -> String {
    let mut out = String::from("import 'package:go_router/go_router.dart';\n\n");
    for section in &blueprint.screens {
        let _ = writeln!(out, "import '../screens/{}.dart';", section.file_stem());
    }

    let initial = blueprint
        .screens
        .first()
        .map(|s| format!("/{}", s.route_name()))
        .unwrap_or_else(|| "/".to_string());

    let _ = write!(
        out,
        "\nclass AppRouter {{\n  final GoRouter router = GoRouter(\n    initialLocation: {},\n    routes: [\n",
        dart_string(&initial)
    );
    for section in &blueprint.screens {
        let _ = write!(
            out,
            "      GoRoute(\n        path: {},\n        builder: (context, state) => const {}(),\n      ),\n",
            dart_string(&format!("/{}", section.route_name())),
            section.title
        );
    }
    out.push_str("    ],\n  );\n}\n");
    out
}

fn theme(blueprint: &Blueprint) -> String {
    format!(
        "import 'package:flutter/material.dart';

class AppTheme {{
  static const Color seedColor = Color(0xFF{seed});

  static ThemeData get light => ThemeData(
        useMaterial3: true,
        colorScheme: ColorScheme.fromSeed(seedColor: seedColor),
      );

  static ThemeData get dark => ThemeData(
        useMaterial3: true,
        colorScheme: ColorScheme.fromSeed(
          seedColor: seedColor,
          brightness: Brightness.dark,
        ),
      );
}}
",
        seed = blueprint.seed_color
    )
}

fn drawer(blueprint: &Blueprint) -> String {
    let mut out = format!(
        "import 'package:flutter/material.dart';
import 'package:go_router/go_router.dart';

class AppDrawer extends StatelessWidget {{
  const AppDrawer({{super.key}});

  @override
  Widget build(BuildContext context) {{
    return Drawer(
      child: ListView(
        padding: EdgeInsets.zero,
        children: [
          DrawerHeader(
            decoration: BoxDecoration(color: Theme.of(context).colorScheme.primaryContainer),
            child: Text({title}, style: Theme.of(context).textTheme.titleLarge),
          ),
",
        title = dart_string(&blueprint.app_title)
    );
    for section in &blueprint.screens {
        let _ = write!(
            out,
            "          ListTile(
            title: Text({label}),
            onTap: () {{
              Navigator.pop(context);
              context.go({route});
            }},
          ),
",
            label = dart_string(&display_title(section)),
            route = dart_string(&format!("/{}", section.route_name()))
        );
    }
    out.push_str("        ],\n      ),\n    );\n  }\n}\n");
    out
}

/// State field holding the selection of the `index`th radio group
fn radio_field(group: &RadioGroup, index: usize) -> String {
    format!("_{}", camel_identifier(&group.title, &format!("group{}", index)))
}

fn screen(section: &ScreenSection, drawer: bool) -> String {
    let stateful = !section.radio_groups.is_empty();
    let class = &section.title;

    let mut out = String::from("import 'package:flutter/material.dart';\n");
    if drawer {
        out.push_str("\nimport '../widgets/app_drawer.dart';\n");
    }
    out.push('\n');

    if stateful {
        let _ = write!(
            out,
            "class {class} extends StatefulWidget {{
  const {class}({{super.key}});

  @override
  State<{class}> createState() => _{class}State();
}}

class _{class}State extends State<{class}> {{
"
        );
        for (i, group) in section.radio_groups.iter().enumerate() {
            let initial = group
                .selected()
                .map(|o| dart_string(&o.text))
                .unwrap_or_else(|| "null".to_string());
            let _ = writeln!(out, "  String? {} = {};", radio_field(group, i), initial);
        }
        out.push('\n');
    } else {
        let _ = write!(
            out,
            "class {class} extends StatelessWidget {{
  const {class}({{super.key}});

"
        );
    }

    let _ = write!(
        out,
        "  @override
  Widget build(BuildContext context) {{
    return Scaffold(
      appBar: AppBar(title: Text({title})),
",
        title = dart_string(&display_title(section))
    );
    if drawer {
        out.push_str("      drawer: const AppDrawer(),\n");
    }
    out.push_str(
        "      body: ListView(\n        padding: const EdgeInsets.all(16),\n        children: [\n",
    );

    for text in plain_texts(section) {
        let _ = write!(
            out,
            "          Text({}, style: Theme.of(context).textTheme.bodyLarge),\n          const SizedBox(height: 12),\n",
            dart_string(text)
        );
    }
    for field in &section.fields {
        let _ = write!(
            out,
            "          TextField(
            decoration: InputDecoration(
              labelText: {},
              border: const OutlineInputBorder(),
            ),
          ),
          const SizedBox(height: 12),
",
            dart_string(field)
        );
    }
    for (i, group) in section.radio_groups.iter().enumerate() {
        let field = radio_field(group, i);
        let _ = writeln!(
            out,
            "          Text({}, style: Theme.of(context).textTheme.titleMedium),",
            dart_string(&group.title)
        );
        for option in &group.options {
            let value = dart_string(&option.text);
            let _ = write!(
                out,
                "          RadioListTile<String>(
            title: Text({value}),
            value: {value},
            groupValue: {field},
            onChanged: (value) => setState(() => {field} = value),
          ),
"
            );
        }
        out.push_str("          const SizedBox(height: 12),\n");
    }
    for button in &section.buttons {
        let _ = write!(
            out,
            "          FilledButton(\n            onPressed: () {{}},\n            child: Text({}),\n          ),\n          const SizedBox(height: 8),\n",
            dart_string(button)
        );
    }

    out.push_str("        ],\n      ),\n    );\n  }\n}\n");
    out
}
