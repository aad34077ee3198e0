//! Radio group recovery
//!
//! A group only exists when enough ellipse shapes are drawn. Option labels come
//! from a fixed vocabulary and selection is inferred from the one fill/stroke
//! pair the mockups use for a checked radio.

use super::families::RadioVocabulary;
use super::markup::{count_occurrences, find_term, ELLIPSE_MARKER};
use super::model::{RadioGroup, RadioOption};
use regex::Regex;
use std::sync::OnceLock;

/// Minimum number of ellipse shapes before any group is recognized
pub const MIN_ELLIPSES: usize = 2;

/// Byte offsets of every selected-radio color signature
pub fn selection_signatures(markup: &str) -> Vec<usize> {
    static SIGNATURE_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = SIGNATURE_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?i)fillColor=#0052CC;[^"]*strokeColor=#0052CC|strokeColor=#0052CC;[^"]*fillColor=#0052CC"#,
        )
        .expect("Invalid selection signature regex")
    });
    re.find_iter(markup).map(|m| m.start()).collect()
}

/// Builds the group described by `vocabulary`, or `None` when the markup has too
/// few ellipses or none of the option labels
pub fn detect_group(markup: &str, vocabulary: &RadioVocabulary) -> Option<RadioGroup> {
    if count_occurrences(markup, ELLIPSE_MARKER) < MIN_ELLIPSES {
        return None;
    }

    let mut found: Vec<(usize, &str)> = vocabulary
        .options
        .iter()
        .filter_map(|option| find_term(markup, option).map(|offset| (offset, *option)))
        .collect();
    if found.is_empty() {
        return None;
    }
    found.sort_by_key(|(offset, _)| *offset);

    let signatures = selection_signatures(markup);
    let mut options = Vec::with_capacity(found.len());
    let mut previous = 0;
    let mut selected_seen = false;

    for (offset, text) in found {
        let preceded = signatures.iter().any(|&s| s >= previous && s < offset);
        let is_selected = preceded && !selected_seen;
        selected_seen |= is_selected;
        options.push(RadioOption {
            text: text.to_string(),
            is_selected,
        });
        previous = offset;
    }

    Some(RadioGroup {
        title: vocabulary.title.to_string(),
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERMISSIONS: RadioVocabulary = RadioVocabulary {
        title: "Permission",
        options: &["Read and write", "Read only", "None"],
    };

    fn ellipse(selected: bool) -> String {
        if selected {
            r#"<mxCell style="ellipse;fillColor=#0052CC;strokeColor=#0052CC;" vertex="1"/>"#
                .to_string()
        } else {
            r#"<mxCell style="ellipse;fillColor=#FFFFFF;strokeColor=#6B778C;" vertex="1"/>"#
                .to_string()
        }
    }

    fn text(label: &str) -> String {
        format!(r#"<mxCell value="{}" style="text;" vertex="1"/>"#, label)
    }

    #[test]
    fn test_requires_two_ellipses() {
        let markup = format!("{}{}{}", ellipse(false), text("Read only"), text("None"));
        assert!(detect_group(&markup, &PERMISSIONS).is_none());
    }

    #[test]
    fn test_options_in_source_order_with_inferred_selection() {
        let markup = format!(
            "{}{}{}{}{}",
            text("Read only"),
            ellipse(true),
            text("Read and write"),
            ellipse(false),
            text("None"),
        );
        let group = detect_group(&markup, &PERMISSIONS).unwrap();
        let texts: Vec<_> = group.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["Read only", "Read and write", "None"]);
        let selected: Vec<_> = group.options.iter().map(|o| o.is_selected).collect();
        assert_eq!(selected, vec![false, true, false]);
    }

    #[test]
    fn test_defaults_to_unselected() {
        let markup = format!(
            "{}{}{}{}",
            ellipse(false),
            text("Read and write"),
            ellipse(false),
            text("Read only"),
        );
        let group = detect_group(&markup, &PERMISSIONS).unwrap();
        assert!(group.selected().is_none());
    }

    #[test]
    fn test_at_most_one_selected() {
        let markup = format!(
            "{}{}{}{}",
            ellipse(true),
            text("Read and write"),
            ellipse(true),
            text("Read only"),
        );
        let group = detect_group(&markup, &PERMISSIONS).unwrap();
        assert_eq!(group.options.iter().filter(|o| o.is_selected).count(), 1);
        assert!(group.options[0].is_selected);
    }
}
