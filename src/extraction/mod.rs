//! Recovery of a project file map from a free-form generative reply
//!
//! The reply format is not under our control, so several strategies are tried in
//! a fixed order and the first one that recovers anything wins. Every recovered
//! file is passed through [`crate::repair`] before it is stored.

pub mod loose;
pub mod marker;
pub mod signature;
pub mod strategy;

pub use loose::LooseBlockStrategy;
pub use marker::MarkerStrategy;
pub use signature::SignatureStrategy;
pub use strategy::{normalize_path, ExtractedFile, ExtractionStrategy, FENCE};

use crate::repair::RepairEngine;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// Name of the strategy that produced the files, `None` when nothing matched
    pub strategy: Option<&'static str>,
    pub files: BTreeMap<String, String>,
}

impl ExtractionOutcome {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub struct CodeExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    repair: RepairEngine,
}

impl CodeExtractor {
    /// Marker, then loose block, then signature
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(MarkerStrategy),
            Box::new(LooseBlockStrategy),
            Box::new(SignatureStrategy),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self {
            strategies,
            repair: RepairEngine::new(),
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, text: &str) -> ExtractionOutcome {
        for strategy in &self.strategies {
            let extracted = strategy.extract(text);
            if extracted.is_empty() {
                debug!(strategy = strategy.name(), "Extraction strategy found no files");
                continue;
            }

            let mut files = BTreeMap::new();
            for file in extracted {
                let content = self.repair.repair(&file.content, &file.path);
                if files.insert(file.path.clone(), content).is_some() {
                    warn!(
                        path = %file.path,
                        strategy = strategy.name(),
                        "Reply declares the same path twice, keeping the later block"
                    );
                }
            }

            debug!(
                strategy = strategy.name(),
                files = files.len(),
                "Extracted files from reply"
            );
            return ExtractionOutcome {
                strategy: Some(strategy.name()),
                files,
            };
        }

        warn!(reply_len = text.len(), "No files could be extracted from reply");
        ExtractionOutcome::default()
    }
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts and repairs files with the default strategy cascade
pub fn extract_files(text: &str) -> BTreeMap<String, String> {
    CodeExtractor::new().extract(text).files
}
