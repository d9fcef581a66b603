//! Output formatting for the final answer
//!
//! Human output mirrors the console layout: the diagram section, a
//! `Threat Analysis (STRIDE)` heading line, then the threat section. JSON
//! output carries the same sections plus the extracted Mermaid source.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::output::{extract_mermaid, split, split_or_whole, ThreatReport};

const HUMAN_HEADING: &str = "Threat Analysis (STRIDE)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain console text
    Human,
    /// Machine-readable JSON
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    diagram: &'a str,
    mermaid: Option<&'a str>,
    threats: &'a str,
}

pub struct OutputFormatter {
    format: OutputFormat,
    lenient: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            lenient: false,
        }
    }

    /// Accept answers without the threat heading instead of failing
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn format(&self, answer: &str) -> Result<String> {
        let report = if self.lenient {
            split_or_whole(answer)
        } else {
            split(answer).context("Model output could not be split into diagram and threats")?
        };

        match self.format {
            OutputFormat::Human => Ok(self.format_human(&report)),
            OutputFormat::Json => self.format_json(&report),
        }
    }

    fn format_human(&self, report: &ThreatReport<'_>) -> String {
        format!("{}\n{}\n{}\n", report.diagram, HUMAN_HEADING, report.threats)
    }

    fn format_json(&self, report: &ThreatReport<'_>) -> Result<String> {
        let json = JsonReport {
            diagram: report.diagram.trim(),
            mermaid: extract_mermaid(report.diagram),
            threats: report.threats.trim(),
        };
        serde_json::to_string_pretty(&json).context("Failed to serialize report to JSON")
    }
}
