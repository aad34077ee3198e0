use super::app_root::{AppRootRule, ManifestDependencyRule};
use super::circular::{CircularReferenceRule, SeedReferenceRule};
use super::imports::{MissingImportRule, RelativeImportRule};
use super::renames::DeprecatedApiRule;
use super::router::RouterInstanceRule;
use super::rule::FixRule;
use super::theme::ThemeLookupRule;
use tracing::{debug, trace};

/// Applies an ordered list of [`FixRule`]s to one file
///
/// Order matters: [`SeedReferenceRule`] only finds work after
/// [`CircularReferenceRule`] introduced seed constants, and import insertion
/// runs last so it sees the final set of capabilities used.
pub struct RepairEngine {
    rules: Vec<Box<dyn FixRule>>,
}

impl RepairEngine {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RouterInstanceRule),
                Box::new(RelativeImportRule),
                Box::new(AppRootRule),
                Box::new(ManifestDependencyRule),
                Box::new(DeprecatedApiRule),
                Box::new(CircularReferenceRule),
                Box::new(SeedReferenceRule),
                Box::new(ThemeLookupRule),
                Box::new(MissingImportRule),
            ],
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn FixRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn repair(&self, content: &str, path: &str) -> String {
        let mut current = content.to_string();
        let mut fired = Vec::new();

        for rule in &self.rules {
            if !rule.applies_to(path) {
                continue;
            }
            let next = rule.apply(&current, path);
            if next != current {
                trace!(rule = rule.name(), path = %path, "Fix rule rewrote file");
                fired.push(rule.name());
                current = next;
            }
        }

        if !fired.is_empty() {
            debug!(path = %path, rules = ?fired, "Repaired generated file");
        }
        current
    }
}

impl Default for RepairEngine {
    fn default() -> Self {
        Self::new()
    }
}
