//! Output formatting for command results
//!
//! Machine-readable JSON for scripting, and short human-readable summaries.

use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::PathBuf;

use crate::config::MockforgeConfig;
use crate::mockup::ScreenDetectionResult;
use crate::pipeline::GeneratedProject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_detection(&self, result: &ScreenDetectionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result)
                .context("Failed to serialize detection result to JSON"),
            OutputFormat::Human => Ok(Self::detection_human(result)),
        }
    }

    /// Summary of a generation run and the files written for it
    pub fn format_project(&self, project: &GeneratedProject, written: &[PathBuf]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "source": project.source,
                    "fallback_reason": project.fallback_reason,
                    "files": project.files.keys().collect::<Vec<_>>(),
                    "written": written,
                });
                serde_json::to_string_pretty(&output)
                    .context("Failed to serialize generation summary to JSON")
            }
            OutputFormat::Human => {
                let mut out = String::new();
                let _ = writeln!(
                    out,
                    "Generated {} file(s) from {}",
                    project.files.len(),
                    project.source
                );
                if let Some(reason) = &project.fallback_reason {
                    let _ = writeln!(out, "Fallback reason: {}", reason);
                }
                for path in written {
                    let _ = writeln!(out, "  {}", path.display());
                }
                Ok(out)
            }
        }
    }

    pub fn format_config(&self, config: &MockforgeConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize configuration to JSON"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn detection_human(result: &ScreenDetectionResult) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Device frames: {}  Screens: {}  Drawer: {}",
            result.phone_count,
            result.screen_sections.len(),
            if result.should_create_drawer { "yes" } else { "no" }
        );

        for section in &result.screen_sections {
            let _ = writeln!(out, "\n{} (/{})", section.title, section.route_name());
            if !section.fields.is_empty() {
                let _ = writeln!(out, "  Fields:  {}", section.fields.join(", "));
            }
            if !section.buttons.is_empty() {
                let _ = writeln!(out, "  Buttons: {}", section.buttons.join(", "));
            }
            for group in &section.radio_groups {
                let options: Vec<String> = group
                    .options
                    .iter()
                    .map(|o| {
                        if o.is_selected {
                            format!("[x] {}", o.text)
                        } else {
                            format!("[ ] {}", o.text)
                        }
                    })
                    .collect();
                let _ = writeln!(out, "  {}: {}", group.title, options.join("  "));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mockup::{RadioGroup, RadioOption, ScreenSection};
    use crate::pipeline::ProjectSource;
    use std::collections::BTreeMap;

    fn detection() -> ScreenDetectionResult {
        ScreenDetectionResult {
            phone_count: 1,
            detected_screens: vec!["SettingsScreen".into()],
            screen_sections: vec![ScreenSection {
                title: "SettingsScreen".into(),
                fields: vec!["Display name".into()],
                radio_groups: vec![RadioGroup {
                    title: "Theme".into(),
                    options: vec![
                        RadioOption {
                            text: "Light".into(),
                            is_selected: true,
                        },
                        RadioOption {
                            text: "Dark".into(),
                            is_selected: false,
                        },
                    ],
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_detection_json() {
        let out = OutputFormatter::new(OutputFormat::Json)
            .format_detection(&detection())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["phoneCount"], 1);
        assert_eq!(value["screenSections"][0]["title"], "SettingsScreen");
    }

    #[test]
    fn test_detection_human() {
        let out = OutputFormatter::new(OutputFormat::Human)
            .format_detection(&detection())
            .unwrap();
        assert!(out.contains("Device frames: 1  Screens: 1  Drawer: no"));
        assert!(out.contains("SettingsScreen (/settings)"));
        assert!(out.contains("Theme: [x] Light  [ ] Dark"));
    }

    #[test]
    fn test_project_summary() {
        let mut files = BTreeMap::new();
        files.insert("lib/main.dart".to_string(), String::new());
        let project = GeneratedProject {
            files,
            source: ProjectSource::LocalTemplate,
            detection: None,
            fallback_reason: Some("No generation service is configured".to_string()),
        };
        let written = vec![PathBuf::from("app/lib/main.dart")];

        let human = OutputFormatter::new(OutputFormat::Human)
            .format_project(&project, &written)
            .unwrap();
        assert!(human.contains("Generated 1 file(s) from local_template"));
        assert!(human.contains("Fallback reason: No generation service"));

        let json = OutputFormatter::new(OutputFormat::Json)
            .format_project(&project, &written)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "local_template");
        assert_eq!(value["files"][0], "lib/main.dart");
    }
}
