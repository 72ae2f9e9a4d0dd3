//! Validation report

use owlcheck_core::{Context, Diagnostic, DiagnosticKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of validating one data graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Number of subjects examined
    pub subjects: usize,
    /// Diagnostics in ascending line order
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new(subjects: usize, diagnostics: Vec<Diagnostic>) -> Self {
        Self { subjects, diagnostics }
    }

    /// True when nothing was reported
    pub fn conforms(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Diagnostic count per kind, kinds without diagnostics omitted
    pub fn counts(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.kind).or_insert(0) += 1;
        }
        counts
    }

    /// True if any diagnostic has one of `kinds`
    pub fn has_any(&self, kinds: &[DiagnosticKind]) -> bool {
        self.diagnostics.iter().any(|d| kinds.contains(&d.kind))
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// One formatted line per diagnostic, then a summary line
    pub fn to_simple_string(&self, ctx: &Context) -> String {
        let mut output = String::new();
        for diagnostic in &self.diagnostics {
            output.push_str(&diagnostic.format(ctx));
            output.push('\n');
        }
        if self.conforms() {
            output.push_str(&format!("{} subjects, no problems found\n", self.subjects));
        } else {
            let summary: Vec<String> = self
                .counts()
                .into_iter()
                .map(|(kind, count)| format!("{} {}", count, kind.label()))
                .collect();
            output.push_str(&format!("{} subjects, {}\n", self.subjects, summary.join(", ")));
        }
        output
    }
}
