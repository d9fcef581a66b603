use thiserror::Error;

/// Heading the model is asked to put before the threat table
pub const THREAT_HEADING: &str = "### Threat Analysis (STRIDE)";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputShapeError {
    #[error("Model output does not contain the '{}' heading", THREAT_HEADING)]
    MissingDelimiter,
}

/// Diagram and threat-analysis halves of a model answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatReport<'a> {
    pub diagram: &'a str,
    pub threats: &'a str,
}

/// Splits `text` around the first threat heading.
///
/// `"A\n### Threat Analysis (STRIDE)\nB"` yields `("A\n", "\nB")`. Text after
/// a repeated heading stays in the threat section.
pub fn split(text: &str) -> Result<ThreatReport<'_>, OutputShapeError> {
    text.split_once(THREAT_HEADING)
        .map(|(diagram, threats)| ThreatReport { diagram, threats })
        .ok_or(OutputShapeError::MissingDelimiter)
}

/// Like [`split`], but a missing heading returns the whole text as the diagram
pub fn split_or_whole(text: &str) -> ThreatReport<'_> {
    split(text).unwrap_or(ThreatReport {
        diagram: text,
        threats: "",
    })
}

/// Body of the first ```` ```mermaid ```` fence, trimmed
pub fn extract_mermaid(text: &str) -> Option<&str> {
    let start = text.find("```mermaid")?;
    let after_fence = &text[start + "```mermaid".len()..];
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}
