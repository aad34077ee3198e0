//! Angular project templates built from standalone components

use super::{camel_identifier, display_title, kebab_case, plain_texts, Blueprint};
use crate::mockup::ScreenSection;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt::Write;

pub const PACKAGE: &str = "package.json";
pub const WORKSPACE: &str = "angular.json";
pub const TSCONFIG: &str = "tsconfig.json";
pub const INDEX: &str = "src/index.html";
pub const MAIN: &str = "src/main.ts";
pub const STYLES: &str = "src/styles.scss";
pub const APP_CONFIG: &str = "src/app/app.config.ts";
pub const ROUTES: &str = "src/app/app.routes.ts";
pub const APP_COMPONENT: &str = "src/app/app.component.ts";

pub const MANDATORY_FILES: &[&str] = &[
    PACKAGE,
    WORKSPACE,
    TSCONFIG,
    INDEX,
    MAIN,
    STYLES,
    APP_COMPONENT,
];

const PROJECT_NAME: &str = "mockforge-app";
const ANGULAR_VERSION: &str = "^18.2.0";

fn component_dir(section: &ScreenSection) -> String {
    kebab_case(&section.title)
}

fn component_class(section: &ScreenSection) -> String {
    format!("{}Component", section.title)
}

pub fn screen_path(section: &ScreenSection) -> String {
    let dir = component_dir(section);
    format!("src/app/screens/{dir}/{dir}.component.ts")
}

pub fn render(blueprint: &Blueprint) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    files.insert(PACKAGE.to_string(), package_json());
    files.insert(WORKSPACE.to_string(), angular_json());
    files.insert(TSCONFIG.to_string(), tsconfig_json());
    files.insert(INDEX.to_string(), index_html(blueprint));
    files.insert(MAIN.to_string(), main_ts());
    files.insert(STYLES.to_string(), styles(blueprint));
    files.insert(APP_CONFIG.to_string(), app_config());
    files.insert(ROUTES.to_string(), routes(blueprint));
    files.insert(APP_COMPONENT.to_string(), app_component(blueprint));
    for section in &blueprint.screens {
        files.insert(screen_path(section), screen(section));
    }
    files
}

pub fn dependencies(blueprint: &Blueprint, path: &str) -> Vec<String> {
    match path {
        MAIN => vec![APP_CONFIG.to_string(), APP_COMPONENT.to_string()],
        APP_CONFIG => vec![ROUTES.to_string()],
        ROUTES => blueprint.screens.iter().map(screen_path).collect(),
        _ => Vec::new(),
    }
}

fn pretty(value: serde_json::Value) -> String {
    let mut out = serde_json::to_string_pretty(&value).unwrap_or_default();
    out.push('\n');
    out
}

fn package_json() -> String {
    pretty(json!({
        "name": PROJECT_NAME,
        "version": "0.0.0",
        "private": true,
        "scripts": {
            "ng": "ng",
            "start": "ng serve",
            "build": "ng build"
        },
        "dependencies": {
            "@angular/common": ANGULAR_VERSION,
            "@angular/compiler": ANGULAR_VERSION,
            "@angular/core": ANGULAR_VERSION,
            "@angular/forms": ANGULAR_VERSION,
            "@angular/platform-browser": ANGULAR_VERSION,
            "@angular/router": ANGULAR_VERSION,
            "rxjs": "~7.8.0",
            "tslib": "^2.6.0",
            "zone.js": "~0.14.10"
        },
        "devDependencies": {
            "@angular-devkit/build-angular": ANGULAR_VERSION,
            "@angular/cli": ANGULAR_VERSION,
            "@angular/compiler-cli": ANGULAR_VERSION,
            "typescript": "~5.5.2"
        }
    }))
}

fn angular_json() -> String {
    pretty(json!({
        "$schema": "./node_modules/@angular/cli/lib/config/schema.json",
        "version": 1,
        "newProjectRoot": "projects",
        "projects": {
            PROJECT_NAME: {
                "projectType": "application",
                "root": "",
                "sourceRoot": "src",
                "prefix": "app",
                "architect": {
                    "build": {
                        "builder": "@angular-devkit/build-angular:application",
                        "options": {
                            "outputPath": format!("dist/{PROJECT_NAME}"),
                            "index": "src/index.html",
                            "browser": "src/main.ts",
                            "polyfills": ["zone.js"],
                            "tsConfig": "tsconfig.json",
                            "inlineStyleLanguage": "scss",
                            "styles": ["src/styles.scss"]
                        }
                    },
                    "serve": {
                        "builder": "@angular-devkit/build-angular:dev-server",
                        "options": {
                            "buildTarget": format!("{PROJECT_NAME}:build")
                        }
                    }
                }
            }
        }
    }))
}

fn tsconfig_json() -> String {
    pretty(json!({
        "compileOnSave": false,
        "compilerOptions": {
            "outDir": "./dist/out-tsc",
            "strict": true,
            "noImplicitOverride": true,
            "noImplicitReturns": true,
            "skipLibCheck": true,
            "esModuleInterop": true,
            "experimentalDecorators": true,
            "moduleResolution": "bundler",
            "importHelpers": true,
            "target": "ES2022",
            "module": "ES2022",
            "lib": ["ES2022", "dom"]
        },
        "angularCompilerOptions": {
            "strictTemplates": true
        }
    }))
}

/// Escapes text for an HTML element or attribute inside an Angular template
fn html_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            '`' => out.push_str("&#96;"),
            '$' => out.push_str("&#36;"),
            '\\' => out.push_str("&#92;"),
            '@' => out.push_str("&#64;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Single-quoted TypeScript string literal
fn ts_string(text: &str) -> String {
    let mut out = String::from("'");
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

fn index_html(blueprint: &Blueprint) -> String {
    format!(
        "<!doctype html>
<html lang=\"en\">
<head>
  <meta charset=\"utf-8\">
  <title>{}</title>
  <base href=\"/\">
  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
</head>
<body>
  <app-root></app-root>
</body>
</html>
",
        html_text(&blueprint.app_title)
    )
}

fn main_ts() -> String {
    "import { bootstrapApplication } from '@angular/platform-browser';

import { appConfig } from './app/app.config';
import { AppComponent } from './app/app.component';

bootstrapApplication(AppComponent, appConfig).catch((err) => console.error(err));
"
    .to_string()
}

fn styles(blueprint: &Blueprint) -> String {
    format!(
        ":root {{
  --seed-color: #{seed};
}}

body {{
  margin: 0;
  font-family: Roboto, 'Helvetica Neue', sans-serif;
}}

.screen {{
  display: flex;
  flex-direction: column;
  gap: 12px;
  padding: 16px;
}}

.drawer a {{
  display: block;
  padding: 12px 16px;
  color: var(--seed-color);
}}

button {{
  background: var(--seed-color);
  border: none;
  border-radius: 20px;
  color: #FFFFFF;
  padding: 10px 24px;
}}
",
        seed = blueprint.seed_color
    )
}

fn app_config() -> String {
    "import { ApplicationConfig, provideZoneChangeDetection } from '@angular/core';
import { provideRouter } from '@angular/router';

import { routes } from './app.routes';

export const appConfig: ApplicationConfig = {
  providers: [provideZoneChangeDetection({ eventCoalescing: true }), provideRouter(routes)],
};
"
    .to_string()
}

fn routes(blueprint: &Blueprint) -> String {
    let mut out = String::from("import { Routes } from '@angular/router';\n\n");
    for section in &blueprint.screens {
        let dir = component_dir(section);
        let _ = writeln!(
            out,
            "import {{ {} }} from './screens/{dir}/{dir}.component';",
            component_class(section)
        );
    }
    out.push_str("\nexport const routes: Routes = [\n");
    if let Some(first) = blueprint.screens.first() {
        let _ = writeln!(
            out,
            "  {{ path: '', pathMatch: 'full', redirectTo: {} }},",
            ts_string(&first.route_name())
        );
    }
    for section in &blueprint.screens {
        let _ = writeln!(
            out,
            "  {{ path: {}, component: {} }},",
            ts_string(&section.route_name()),
            component_class(section)
        );
    }
    out.push_str("];\n");
    out
}

fn app_component(blueprint: &Blueprint) -> String {
    let mut template = String::new();
    if blueprint.drawer {
        template.push_str("    <nav class=\"drawer\">\n");
        for section in &blueprint.screens {
            let _ = writeln!(
                template,
                "      <a routerLink=\"/{}\">{}</a>",
                section.route_name(),
                html_text(&display_title(section))
            );
        }
        template.push_str("    </nav>\n");
    }
    template.push_str("    <router-outlet />\n");

    let imports = if blueprint.drawer {
        "RouterOutlet, RouterLink"
    } else {
        "RouterOutlet"
    };

    format!(
        "import {{ Component }} from '@angular/core';
import {{ {imports} }} from '@angular/router';

@Component({{
  selector: 'app-root',
  standalone: true,
  imports: [{imports}],
  template: `
{template}  `,
}})
export class AppComponent {{
  title = {title};
}}
",
        title = ts_string(&blueprint.app_title)
    )
}

fn screen(section: &ScreenSection) -> String {
    let has_radios = !section.radio_groups.is_empty();
    let mut template = String::new();
    let mut properties = String::new();

    let _ = writeln!(template, "    <section class=\"screen\">");
    let _ = writeln!(template, "      <h1>{}</h1>", html_text(&display_title(section)));
    for text in plain_texts(section) {
        let _ = writeln!(template, "      <p>{}</p>", html_text(text));
    }
    for field in &section.fields {
        let _ = writeln!(
            template,
            "      <label>{} <input type=\"text\" /></label>",
            html_text(field)
        );
    }
    for (i, group) in section.radio_groups.iter().enumerate() {
        let property = camel_identifier(&group.title, &format!("group{}", i));
        let initial = group
            .selected()
            .map(|o| ts_string(&o.text))
            .unwrap_or_else(|| "null".to_string());
        let _ = writeln!(properties, "  {property}: string | null = {initial};");

        let _ = writeln!(template, "      <fieldset>");
        let _ = writeln!(template, "        <legend>{}</legend>", html_text(&group.title));
        for option in &group.options {
            let text = html_text(&option.text);
            let _ = writeln!(
                template,
                "        <label><input type=\"radio\" name=\"{property}\" value=\"{text}\" [(ngModel)]=\"{property}\" /> {text}</label>"
            );
        }
        let _ = writeln!(template, "      </fieldset>");
    }
    for button in &section.buttons {
        let _ = writeln!(template, "      <button type=\"button\">{}</button>", html_text(button));
    }
    let _ = writeln!(template, "    </section>");

    let (forms_import, imports) = if has_radios {
        ("import { FormsModule } from '@angular/forms';\n", "FormsModule")
    } else {
        ("", "")
    };
    let body = if properties.is_empty() {
        format!("export class {} {{}}\n", component_class(section))
    } else {
        format!("export class {} {{\n{}}}\n", component_class(section), properties)
    };

    format!(
        "import {{ Component }} from '@angular/core';
{forms_import}
@Component({{
  selector: 'app-{selector}',
  standalone: true,
  imports: [{imports}],
  template: `
{template}  `,
}})
{body}",
        selector = component_dir(section)
    )
}
