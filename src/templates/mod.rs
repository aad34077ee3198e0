//! Deterministic project templates
//!
//! Used when no generative service is available or its reply is unusable, and to
//! fill in scaffold files a reply left out. Output depends only on the
//! [`Blueprint`], so the same mockup always yields the same project.

mod angular;
mod flutter;

use crate::mockup::markup::to_pascal_case;
use crate::mockup::{ScreenDetectionResult, ScreenSection};
use crate::pipeline::TargetPlatform;
use std::collections::BTreeMap;

pub const APP_TITLE: &str = "Mockforge App";
const DEFAULT_SEED_COLOR: &str = "2196F3";
const PROMPT_SCREEN_TITLE: &str = "HomeScreen";
/// Prompt text shown on a screen generated without a mockup is cut to this many chars
const MAX_PROMPT_TEXT: usize = 200;

/// What the templates render: screens, navigation and theme seed
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub app_title: String,
    pub screens: Vec<ScreenSection>,
    pub drawer: bool,
    /// Theme seed as six upper-case hex digits, no `#`. White and black never seed.
    pub seed_color: String,
}

impl Blueprint {
    /// Screens come from the detection result when it found any, otherwise a
    /// single home screen carrying the prompt text
    pub fn new(detection: Option<&ScreenDetectionResult>, prompt: Option<&str>) -> Self {
        if let Some(detection) = detection.filter(|d| !d.is_empty()) {
            let seed_color = detection
                .screen_sections
                .iter()
                .flat_map(|s| s.colors.iter())
                .filter_map(|c| normalize_hex(c))
                .find(|hex| hex != "FFFFFF" && hex != "000000")
                .unwrap_or_else(|| DEFAULT_SEED_COLOR.to_string());

            return Self {
                app_title: APP_TITLE.to_string(),
                screens: detection.screen_sections.clone(),
                drawer: detection.should_create_drawer,
                seed_color,
            };
        }

        let prompt = prompt.map(str::trim).unwrap_or_default();
        let text: String = prompt.chars().take(MAX_PROMPT_TEXT).collect();
        let screen = ScreenSection {
            title: PROMPT_SCREEN_TITLE.to_string(),
            texts: if text.is_empty() { Vec::new() } else { vec![text] },
            description: prompt.to_string(),
            ..Default::default()
        };

        Self {
            app_title: APP_TITLE.to_string(),
            screens: vec![screen],
            drawer: false,
            seed_color: DEFAULT_SEED_COLOR.to_string(),
        }
    }
}

/// `#abc` / `#AABBCC` to `AABBCC`; anything else is rejected
fn normalize_hex(color: &str) -> Option<String> {
    let hex = color.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(hex.to_uppercase()),
        3 => Some(hex.chars().flat_map(|c| [c, c]).collect::<String>().to_uppercase()),
        _ => None,
    }
}

/// Full project for `platform`
pub fn generate_project(platform: TargetPlatform, blueprint: &Blueprint) -> BTreeMap<String, String> {
    match platform {
        TargetPlatform::Flutter => flutter::render(blueprint),
        TargetPlatform::Angular => angular::render(blueprint),
    }
}

/// Files every project of `platform` must contain
pub fn mandatory_files(platform: TargetPlatform) -> &'static [&'static str] {
    match platform {
        TargetPlatform::Flutter => flutter::MANDATORY_FILES,
        TargetPlatform::Angular => angular::MANDATORY_FILES,
    }
}

/// Adds template versions of missing mandatory files, plus whatever template
/// files those depend on that are missing too. Returns the added paths.
pub fn complete_scaffold(
    platform: TargetPlatform,
    files: &mut BTreeMap<String, String>,
    blueprint: &Blueprint,
) -> Vec<String> {
    let templates = generate_project(platform, blueprint);
    let mut pending: Vec<String> = mandatory_files(platform)
        .iter()
        .map(|p| p.to_string())
        .collect();
    let mut added = Vec::new();

    while let Some(path) = pending.pop() {
        if files.contains_key(&path) {
            continue;
        }
        let Some(content) = templates.get(&path) else {
            continue;
        };
        files.insert(path.clone(), content.clone());

        let dependencies = match platform {
            TargetPlatform::Flutter => flutter::dependencies(blueprint, &path),
            TargetPlatform::Angular => angular::dependencies(blueprint, &path),
        };
        pending.extend(dependencies);
        added.push(path);
    }

    added.sort();
    added
}

/// `CreateProjectScreen` -> `Create Project`
pub fn display_title(section: &ScreenSection) -> String {
    let base = section.title.strip_suffix("Screen").unwrap_or(&section.title);
    let mut out = String::new();
    for (i, ch) in base.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    if out.is_empty() {
        section.title.clone()
    } else {
        out
    }
}

/// Texts shown as plain text: everything not already rendered as a field,
/// button or radio group
pub fn plain_texts(section: &ScreenSection) -> Vec<&str> {
    let claimed = |text: &str| {
        section.fields.iter().any(|f| f == text)
            || section.buttons.iter().any(|b| b == text)
            || section.radio_groups.iter().any(|g| {
                g.title == text || g.options.iter().any(|o| o.text == text)
            })
    };
    section
        .texts
        .iter()
        .map(String::as_str)
        .filter(|t| !claimed(t))
        .collect()
}

/// lowerCamel identifier for a label, `fallback` when the label has no usable words
pub fn camel_identifier(label: &str, fallback: &str) -> String {
    let pascal: String = to_pascal_case(label)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            first.to_lowercase().chain(chars).collect()
        }
        _ => fallback.to_string(),
    }
}

/// `CreateProjectScreen` -> `create-project-screen`
pub fn kebab_case(title: &str) -> String {
    let mut out = String::new();
    for (i, ch) in title.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}
