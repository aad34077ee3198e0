//! Prompt composition for the generative service
//!
//! The system prompt pins the reply format (a `[FILE: path]` marker before every
//! fenced block) and the conventions the repair engine would otherwise have to
//! fix. The user prompt carries the detected screens, or the free-text request.

use crate::llm::ChatMessage;
use crate::mockup::{ScreenDetectionResult, ScreenSection};
use crate::pipeline::{GenerationRequest, TargetPlatform};
use crate::templates;
use std::fmt::Write;

const FLUTTER_CONVENTIONS: &str = r#"Conventions:
- Navigation uses go_router. lib/router/app_router.dart declares `class AppRouter { final GoRouter router = GoRouter(...); }`
- lib/main.dart builds `MaterialApp.router(routerConfig: AppRouter().router)`; never reference AppRouter.router statically
- Import project files with relative paths, never `package:<app>/...`
- Use Material 3 names: displayLarge, titleLarge, bodyMedium, labelLarge, WidgetStateProperty, withValues(alpha: ...)
- Inside build methods read colors from `Theme.of(context).colorScheme`, not from static theme constants
- Theme constants must not reference themselves; declare seed colors as separate `static const Color` fields
- Declare go_router in pubspec.yaml"#;

const ANGULAR_CONVENTIONS: &str = r#"Conventions:
- Use standalone components only; no NgModule
- src/main.ts calls bootstrapApplication(AppComponent, appConfig)
- src/app/app.config.ts provides the router with provideRouter(routes)
- src/app/app.routes.ts exports `routes: Routes` with one route per screen
- Put each screen in src/app/screens/<name>/<name>.component.ts with an inline template
- Use FormsModule with [(ngModel)] for radio groups"#;

fn system_prompt(platform: TargetPlatform) -> String {
    let (framework, conventions) = match platform {
        TargetPlatform::Flutter => ("Flutter (Dart, Material 3)", FLUTTER_CONVENTIONS),
        TargetPlatform::Angular => ("Angular (TypeScript, standalone components)", ANGULAR_CONVENTIONS),
    };

    format!(
        r#"You are an expert {framework} developer. Generate a complete, runnable project.

Output format:
- Before every file write a line `[FILE: relative/path]`
- Follow it immediately with the file content in a fenced code block
- Output every file in full; no placeholders or omitted sections
- No explanations outside the file blocks

Required files:
{required}

{conventions}
"#,
        required = templates::mandatory_files(platform)
            .iter()
            .map(|p| format!("- {}", p))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

fn describe_section(out: &mut String, section: &ScreenSection) {
    let _ = writeln!(out, "## {} (route /{})", section.title, section.route_name());
    if !section.description.is_empty() {
        let _ = writeln!(out, "{}", section.description);
    }
    if !section.fields.is_empty() {
        let _ = writeln!(out, "Input fields: {}", section.fields.join(", "));
    }
    if !section.buttons.is_empty() {
        let _ = writeln!(out, "Buttons: {}", section.buttons.join(", "));
    }
    for group in &section.radio_groups {
        let options: Vec<String> = group
            .options
            .iter()
            .map(|o| {
                if o.is_selected {
                    format!("{} (selected)", o.text)
                } else {
                    o.text.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "Radio group \"{}\": {}", group.title, options.join(", "));
    }
    if !section.texts.is_empty() {
        let _ = writeln!(out, "Texts: {}", section.texts.join(" | "));
    }
    if !section.colors.is_empty() {
        let _ = writeln!(out, "Colors: {}", section.colors.join(", "));
    }
    out.push('\n');
}

fn user_prompt(request: &GenerationRequest, detection: Option<&ScreenDetectionResult>) -> String {
    let mut out = String::new();

    match detection.filter(|d| !d.is_empty()) {
        Some(detection) => {
            let _ = writeln!(
                out,
                "Using {}, build an app from this UI mockup. It shows {} device frame(s) and {} screen(s).\n",
                request.platform,
                detection.phone_count,
                detection.screen_sections.len()
            );
            for section in &detection.screen_sections {
                describe_section(&mut out, section);
            }
            if detection.should_create_drawer {
                out.push_str("Add a navigation drawer linking every screen.\n");
            }
            if let Some(prompt) = request.prompt() {
                let _ = writeln!(out, "\nAdditional instructions:\n{}", prompt.trim());
            }
        }
        None => {
            let _ = writeln!(
                out,
                "Using {}, build an app for this description:\n\n{}",
                request.platform,
                request.prompt().map(str::trim).unwrap_or_default()
            );
        }
    }

    out
}

/// System and user messages for one generation request
pub fn compose(
    request: &GenerationRequest,
    detection: Option<&ScreenDetectionResult>,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(request.platform)),
        ChatMessage::user(user_prompt(request, detection)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;
    use crate::mockup::{RadioGroup, RadioOption};

    fn detection() -> ScreenDetectionResult {
        let section = ScreenSection {
            title: "CreateProjectScreen".to_string(),
            texts: vec!["Create a project".into()],
            fields: vec!["Project name".into()],
            buttons: vec!["Publish".into()],
            radio_groups: vec![RadioGroup {
                title: "Visibility".into(),
                options: vec![
                    RadioOption {
                        text: "Public".into(),
                        is_selected: true,
                    },
                    RadioOption {
                        text: "Private".into(),
                        is_selected: false,
                    },
                ],
            }],
            colors: vec!["#0052CC".into()],
            description: "Form for a new project".into(),
        };
        ScreenDetectionResult {
            phone_count: 2,
            has_multiple_screens: true,
            should_create_drawer: true,
            detected_screens: vec![section.title.clone()],
            screen_sections: vec![section],
            ..Default::default()
        }
    }

    #[test]
    fn test_compose_roles() {
        let request = GenerationRequest::from_prompt("A notes app");
        let messages = compose(&request, None);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
    }

    #[test]
    fn test_system_prompt_lists_required_files() {
        let flutter = system_prompt(TargetPlatform::Flutter);
        assert!(flutter.contains("[FILE: relative/path]"));
        assert!(flutter.contains("- lib/router/app_router.dart"));
        assert!(flutter.contains("AppRouter().router"));

        let angular = system_prompt(TargetPlatform::Angular);
        assert!(angular.contains("- src/app/app.component.ts"));
        assert!(angular.contains("bootstrapApplication"));
    }

    #[test]
    fn test_user_prompt_describes_sections() {
        let request = GenerationRequest::from_markup("<x/>").with_prompt("Use a dark palette");
        let prompt = user_prompt(&request, Some(&detection()));
        assert!(prompt.contains("2 device frame(s) and 1 screen(s)"));
        assert!(prompt.contains("## CreateProjectScreen (route /create-project)"));
        assert!(prompt.contains("Input fields: Project name"));
        assert!(prompt.contains("Radio group \"Visibility\": Public (selected), Private"));
        assert!(prompt.contains("navigation drawer"));
        assert!(prompt.contains("Additional instructions:\nUse a dark palette"));
    }

    #[test]
    fn test_user_prompt_free_text() {
        let request = GenerationRequest::from_prompt("  A weather dashboard ")
            .with_platform(TargetPlatform::Angular);
        let prompt = user_prompt(&request, Some(&ScreenDetectionResult::default()));
        assert!(prompt.starts_with("Using angular, build an app for this description:"));
        assert!(prompt.contains("A weather dashboard"));
    }
}
