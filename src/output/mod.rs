//! Post-processing of the model's final answer

pub mod split;

pub use split::{extract_mermaid, split, split_or_whole, OutputShapeError, ThreatReport, THREAT_HEADING};
