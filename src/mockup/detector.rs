//! Screen detection over raw mockup markup
//!
//! Detection is content-driven: a screen family is present when its anchor texts
//! occur anywhere in the document, and its section is synthesized by re-scanning
//! the whole document for the family vocabulary. Two instances of the same family
//! collapse into one section.

use super::families::{
    ScreenFamily, BUTTON_KEYWORDS, CREATE_PROJECT, DASHBOARD, FAMILIES, FIELD_KEYWORDS,
};
use super::markup::{
    count_occurrences, find_term, find_term_ci, label_texts, screen_title, style_colors, Label,
    DEVICE_FRAME_MARKER,
};
use super::model::{ScreenDetectionResult, ScreenSection};
use super::radio::detect_group;
use std::time::Instant;
use tracing::debug;

const MAX_SECTION_COLORS: usize = 12;
const FALLBACK_TITLE: &str = "MainScreen";
const SECONDARY_TITLE: &str = "SecondaryScreen";

/// Detects screens in diagram markup. Never panics; empty input yields the
/// default result.
pub fn detect_screens(markup: &str) -> ScreenDetectionResult {
    ScreenDetector::new(markup).detect()
}

struct ScreenDetector<'a> {
    markup: &'a str,
    labels: Vec<Label>,
    colors: Vec<String>,
}

impl<'a> ScreenDetector<'a> {
    fn new(markup: &'a str) -> Self {
        let mut colors = style_colors(markup);
        colors.truncate(MAX_SECTION_COLORS);
        Self {
            markup,
            labels: label_texts(markup),
            colors,
        }
    }

    fn detect(self) -> ScreenDetectionResult {
        let start = Instant::now();
        if self.markup.trim().is_empty() {
            return ScreenDetectionResult::default();
        }

        let phone_count = count_occurrences(self.markup, DEVICE_FRAME_MARKER);
        let matched: Vec<&ScreenFamily> = FAMILIES
            .iter()
            .filter(|family| self.family_present(family))
            .collect();

        let mut sections: Vec<ScreenSection> =
            matched.iter().map(|family| self.family_section(family)).collect();

        if sections.is_empty() && phone_count > 0 {
            sections.push(self.generic_section());
        }

        if sections.len() == 1 && phone_count > 1 {
            let secondary = self.secondary_section(&sections[0]);
            sections.push(secondary);
        }

        let both_core_families = [DASHBOARD, CREATE_PROJECT]
            .iter()
            .all(|name| matched.iter().any(|f| f.name == *name));
        let should_create_drawer = phone_count > 1 || both_core_families || sections.len() > 1;

        let result = self.assemble(phone_count, should_create_drawer, sections);
        debug!(
            phones = result.phone_count,
            screens = ?result.detected_screens,
            drawer = result.should_create_drawer,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Screen detection complete"
        );
        result
    }

    fn family_present(&self, family: &ScreenFamily) -> bool {
        family
            .anchors
            .iter()
            .any(|anchor| find_term_ci(self.markup, anchor).is_some())
    }

    /// Vocabulary entries present in the markup, ordered by first occurrence
    fn present(&self, vocabulary: &[&str]) -> Vec<String> {
        let mut found: Vec<(usize, &str)> = vocabulary
            .iter()
            .filter_map(|term| find_term(self.markup, term).map(|offset| (offset, *term)))
            .collect();
        found.sort_by_key(|(offset, _)| *offset);

        let mut out: Vec<String> = Vec::with_capacity(found.len());
        for (_, term) in found {
            if !out.iter().any(|t| t == term) {
                out.push(term.to_string());
            }
        }
        out
    }

    fn family_section(&self, family: &ScreenFamily) -> ScreenSection {
        let texts = self.present(family.texts);
        let fields = self.present(family.fields);
        let buttons = self.present(family.buttons);
        let radio_groups: Vec<_> = family
            .radio
            .as_ref()
            .and_then(|vocabulary| detect_group(self.markup, vocabulary))
            .into_iter()
            .collect();

        debug!(
            family = family.name,
            fields = fields.len(),
            buttons = buttons.len(),
            radio_groups = radio_groups.len(),
            "Matched screen family"
        );

        self.section(family.title.to_string(), texts, fields, buttons, radio_groups)
    }

    fn generic_section(&self) -> ScreenSection {
        let labels: Vec<&str> = self.labels.iter().map(|l| l.text.as_str()).collect();
        let title = title_from(&labels).unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let (fields, buttons) = classify(&labels);
        debug!(title = %title, labels = labels.len(), "Synthesized generic section");
        self.section(
            title,
            labels.iter().map(|s| s.to_string()).collect(),
            fields,
            buttons,
            Vec::new(),
        )
    }

    /// Builds a section from texts no other section claimed so a second device
    /// frame is never silently dropped
    fn secondary_section(&self, primary: &ScreenSection) -> ScreenSection {
        let claimed = |text: &str| {
            primary.texts.iter().any(|t| t == text)
                || primary.fields.iter().any(|t| t == text)
                || primary.buttons.iter().any(|t| t == text)
                || primary
                    .radio_groups
                    .iter()
                    .any(|g| g.title == text || g.options.iter().any(|o| o.text == text))
        };
        let leftover: Vec<&str> = self
            .labels
            .iter()
            .map(|l| l.text.as_str())
            .filter(|text| !claimed(text))
            .collect();

        let title = title_from(&leftover)
            .filter(|t| *t != primary.title)
            .unwrap_or_else(|| SECONDARY_TITLE.to_string());
        let title = if title == primary.title {
            format!("{}2", SECONDARY_TITLE)
        } else {
            title
        };
        let (fields, buttons) = classify(&leftover);
        debug!(title = %title, leftover = leftover.len(), "Synthesized secondary section");
        self.section(
            title,
            leftover.iter().map(|s| s.to_string()).collect(),
            fields,
            buttons,
            Vec::new(),
        )
    }

    fn section(
        &self,
        title: String,
        texts: Vec<String>,
        fields: Vec<String>,
        buttons: Vec<String>,
        radio_groups: Vec<super::model::RadioGroup>,
    ) -> ScreenSection {
        let description = describe(&title, fields.len(), buttons.len(), radio_groups.len());
        ScreenSection {
            title,
            texts,
            fields,
            buttons,
            radio_groups,
            colors: self.colors.clone(),
            description,
        }
    }

    fn assemble(
        &self,
        phone_count: usize,
        should_create_drawer: bool,
        sections: Vec<ScreenSection>,
    ) -> ScreenDetectionResult {
        let mut result = ScreenDetectionResult {
            phone_count,
            has_multiple_screens: phone_count > 1,
            should_create_drawer,
            all_texts: self.labels.iter().map(|l| l.text.clone()).collect(),
            ..Default::default()
        };

        for section in sections {
            if result.detected_screens.contains(&section.title) {
                continue;
            }
            result.detected_screens.push(section.title.clone());
            extend_unique(&mut result.detected_fields, &section.fields);
            extend_unique(&mut result.detected_buttons, &section.buttons);
            let group_titles: Vec<String> =
                section.radio_groups.iter().map(|g| g.title.clone()).collect();
            extend_unique(&mut result.detected_radio_groups, &group_titles);
            result.screen_sections.push(section);
        }
        result
    }
}

fn extend_unique(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

fn is_button_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    let words = lower.split_whitespace().count();
    BUTTON_KEYWORDS.iter().any(|kw| {
        lower == *kw || (words <= 3 && lower.starts_with(kw) && lower[kw.len()..].starts_with(' '))
    })
}

fn is_field_label(label: &str) -> bool {
    if label.ends_with(':') {
        return true;
    }
    let lower = label.to_lowercase();
    lower.split_whitespace().count() <= 3
        && lower
            .split(|c: char| !c.is_alphanumeric() && c != '-')
            .any(|word| FIELD_KEYWORDS.contains(&word))
}

/// Splits labels into (fields, buttons); buttons take precedence
fn classify(labels: &[&str]) -> (Vec<String>, Vec<String>) {
    let mut fields = Vec::new();
    let mut buttons = Vec::new();
    for label in labels {
        if is_button_label(label) {
            buttons.push(label.to_string());
        } else if is_field_label(label) {
            fields.push(label.trim_end_matches(':').trim().to_string());
        }
    }
    (fields, buttons)
}

/// Title from the first plain text label, falling back to the first label of any kind
fn title_from(labels: &[&str]) -> Option<String> {
    labels
        .iter()
        .find(|l| !is_button_label(l) && !is_field_label(l))
        .or_else(|| labels.first())
        .and_then(|l| screen_title(l))
}

fn describe(title: &str, fields: usize, buttons: usize, radio_groups: usize) -> String {
    let name = title.strip_suffix("Screen").unwrap_or(title);
    let mut parts = vec![
        plural(fields, "input field"),
        plural(buttons, "button"),
    ];
    if radio_groups > 0 {
        parts.push(plural(radio_groups, "radio group"));
    }
    format!("{} screen with {}", name, parts.join(", "))
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> &'static str {
        r#"<mxCell style="shape=mxgraph.android.phone2;strokeColor=#c0c0c0;" vertex="1"/>"#
    }

    fn text(label: &str) -> String {
        format!(r#"<mxCell value="{}" style="text;html=1;" vertex="1"/>"#, label)
    }

    #[test]
    fn test_empty_markup() {
        let result = detect_screens("");
        assert_eq!(result, ScreenDetectionResult::default());
        assert_eq!(result.phone_count, 0);
        assert!(!result.has_multiple_screens);
        assert!(result.detected_screens.is_empty());
    }

    #[test]
    fn test_single_family_single_phone() {
        let markup = format!("{}{}{}", phone(), text("Dashboard"), text("Search"));
        let result = detect_screens(&markup);
        assert_eq!(result.detected_screens, vec!["DashboardScreen"]);
        assert_eq!(result.detected_fields, vec!["Search"]);
        assert!(!result.should_create_drawer);
    }

    #[test]
    fn test_generic_section_from_labels() {
        let markup = format!(
            "{}{}{}{}{}",
            phone(),
            text("Inventory"),
            text("Email"),
            text("Submit"),
            text("Text"),
        );
        let result = detect_screens(&markup);
        assert_eq!(result.detected_screens, vec!["InventoryScreen"]);
        let section = &result.screen_sections[0];
        assert_eq!(section.fields, vec!["Email"]);
        assert_eq!(section.buttons, vec!["Submit"]);
        assert!(!section.texts.contains(&"Text".to_string()));
    }

    #[test]
    fn test_generic_without_phone_yields_nothing() {
        let markup = text("Inventory");
        let result = detect_screens(&markup);
        assert!(result.screen_sections.is_empty());
        assert_eq!(result.all_texts, vec!["Inventory"]);
    }

    #[test]
    fn test_secondary_section_from_leftovers() {
        let markup = format!(
            "{}{}{}{}{}",
            phone(),
            phone(),
            text("Dashboard"),
            text("Orders"),
            text("Refresh"),
        );
        let result = detect_screens(&markup);
        assert_eq!(
            result.detected_screens,
            vec!["DashboardScreen", "OrdersScreen"]
        );
        assert!(result.should_create_drawer);
    }

    #[test]
    fn test_secondary_section_without_leftovers() {
        let markup = format!("{}{}{}", phone(), phone(), text("Dashboard"));
        let result = detect_screens(&markup);
        assert_eq!(
            result.detected_screens,
            vec!["DashboardScreen", "SecondaryScreen"]
        );
    }

    #[test]
    fn test_description() {
        assert_eq!(
            describe("CreateProjectScreen", 4, 2, 1),
            "CreateProject screen with 4 input fields, 2 buttons, 1 radio group"
        );
    }

    #[test]
    fn test_button_and_field_classification() {
        assert!(is_button_label("Sign in"));
        assert!(is_button_label("Create a project"));
        assert!(!is_button_label("Createnew"));
        assert!(is_field_label("Project name"));
        assert!(is_field_label("Phone:"));
        assert!(!is_field_label("Welcome to the application"));
    }
}
