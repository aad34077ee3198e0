//! Inputs and outputs of a generation run

use crate::mockup::ScreenDetectionResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// UI framework a project is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    #[default]
    Flutter,
    Angular,
}

impl TargetPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Flutter => "flutter",
            TargetPlatform::Angular => "angular",
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flutter" | "dart" => Ok(TargetPlatform::Flutter),
            "angular" | "ng" => Ok(TargetPlatform::Angular),
            other => Err(format!(
                "Unknown platform '{}'. Supported: flutter, angular",
                other
            )),
        }
    }
}

/// A mockup, a free-text description, or both
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub markup: Option<String>,
    pub prompt: Option<String>,
    pub platform: TargetPlatform,
}

impl GenerationRequest {
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: Some(markup.into()),
            ..Default::default()
        }
    }

    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    pub fn with_platform(mut self, platform: TargetPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Extra instructions sent alongside a mockup
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn markup(&self) -> Option<&str> {
        non_blank(self.markup.as_deref())
    }

    pub fn prompt(&self) -> Option<&str> {
        non_blank(self.prompt.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.markup().is_none() && self.prompt().is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Where the files of a [`GeneratedProject`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSource {
    /// Extracted from a service reply, possibly completed from templates
    Service,
    /// Rendered entirely from local templates
    LocalTemplate,
}

impl fmt::Display for ProjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectSource::Service => write!(f, "service"),
            ProjectSource::LocalTemplate => write!(f, "local_template"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProject {
    /// Relative path to file content, already repaired
    pub files: BTreeMap<String, String>,
    pub source: ProjectSource,
    pub detection: Option<ScreenDetectionResult>,
    /// Why the local templates were used instead of the service
    pub fallback_reason: Option<String>,
}

impl GeneratedProject {
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}
