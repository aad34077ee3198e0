//! Structured screen model produced by the mockup detector

use serde::{Deserialize, Serialize};

/// One option of a radio group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioOption {
    pub text: String,
    pub is_selected: bool,
}

/// A group of mutually exclusive options
///
/// Selection is never declared by the markup; it is inferred from styling, and at
/// most one option of a group is ever marked selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioGroup {
    pub title: String,
    pub options: Vec<RadioOption>,
}

impl RadioGroup {
    pub fn selected(&self) -> Option<&RadioOption> {
        self.options.iter().find(|o| o.is_selected)
    }
}

/// One conceptual screen recovered from the mockup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSection {
    /// PascalCase title ending in `Screen`
    pub title: String,
    pub texts: Vec<String>,
    pub fields: Vec<String>,
    pub buttons: Vec<String>,
    pub radio_groups: Vec<RadioGroup>,
    /// Upper-cased hex colors (`#RRGGBB`)
    pub colors: Vec<String>,
    pub description: String,
}

impl ScreenSection {
    /// Route segment used by generated routers, e.g. `CreateProjectScreen` -> `create-project`
    pub fn route_name(&self) -> String {
        let base = self.title.strip_suffix("Screen").unwrap_or(&self.title);
        let mut route = String::new();
        for (i, ch) in base.chars().enumerate() {
            if ch.is_uppercase() && i > 0 {
                route.push('-');
            }
            route.extend(ch.to_lowercase());
        }
        route
    }

    /// Snake-case file stem, e.g. `CreateProjectScreen` -> `create_project_screen`
    pub fn file_stem(&self) -> String {
        let mut stem = String::new();
        for (i, ch) in self.title.chars().enumerate() {
            if ch.is_uppercase() && i > 0 {
                stem.push('_');
            }
            stem.extend(ch.to_lowercase());
        }
        stem
    }
}

/// Aggregate result of screen detection
///
/// `detected_screens` always mirrors the titles of `screen_sections`, in the same
/// order and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenDetectionResult {
    pub phone_count: usize,
    pub has_multiple_screens: bool,
    pub should_create_drawer: bool,
    pub detected_screens: Vec<String>,
    pub detected_fields: Vec<String>,
    pub detected_buttons: Vec<String>,
    pub detected_radio_groups: Vec<String>,
    pub all_texts: Vec<String>,
    pub screen_sections: Vec<ScreenSection>,
}

impl ScreenDetectionResult {
    pub fn is_empty(&self) -> bool {
        self.screen_sections.is_empty()
    }

    pub fn section(&self, title: &str) -> Option<&ScreenSection> {
        self.screen_sections.iter().find(|s| s.title == title)
    }
}
