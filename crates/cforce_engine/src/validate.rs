use cforce_core::report::{IpTraceReport, OsintReport, ScanReport};
use cforce_core::{PipelineKind, PipelineResult};
use serde::de::DeserializeOwned;

use crate::ParseError;

/// Number of characters of raw output kept on a [`ParseError`].
pub const EXCERPT_LEN: usize = 120;

/// Decode raw model output into the result schema for `kind`.
///
/// The text must hold a single JSON object, optionally wrapped in a
/// markdown code fence. Missing members are tolerated, unknown ones ignored.
pub fn parse(kind: PipelineKind, raw: &str) -> Result<PipelineResult, ParseError> {
    let body = strip_code_fence(raw.trim());
    if !body.starts_with('{') {
        return Err(parse_error(kind, raw));
    }
    match kind {
        PipelineKind::Scan => decode::<ScanReport>(kind, body, raw).map(PipelineResult::Scan),
        PipelineKind::Osint => decode::<OsintReport>(kind, body, raw).map(PipelineResult::Osint),
        PipelineKind::IpTrace => {
            decode::<IpTraceReport>(kind, body, raw).map(PipelineResult::IpTrace)
        }
    }
}

fn decode<T: DeserializeOwned>(kind: PipelineKind, body: &str, raw: &str) -> Result<T, ParseError> {
    serde_json::from_str(body).map_err(|_| parse_error(kind, raw))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_error(kind: PipelineKind, raw: &str) -> ParseError {
    ParseError {
        kind,
        excerpt: raw.chars().take(EXCERPT_LEN).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforce_core::report::display;

    #[test]
    fn fenced_output_is_accepted() {
        let raw = "```json\n{\"target\":\"example.com\",\"status\":\"STABLE\"}\n```";
        let result = parse(PipelineKind::Scan, raw).unwrap();
        match result {
            PipelineResult::Scan(report) => assert_eq!(display(report.status.as_ref()), "STABLE"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn prose_and_arrays_are_rejected() {
        assert!(parse(PipelineKind::Osint, "Sure! Here is the report").is_err());
        assert!(parse(PipelineKind::Osint, "[{\"target\":\"x\"}]").is_err());
        assert!(parse(PipelineKind::Osint, "").is_err());
    }

    #[test]
    fn excerpt_is_bounded_on_char_boundary() {
        let raw = "é".repeat(EXCERPT_LEN * 2);
        let err = parse(PipelineKind::IpTrace, &raw).unwrap_err();
        assert_eq!(err.excerpt.chars().count(), EXCERPT_LEN);
        assert_eq!(err.kind, PipelineKind::IpTrace);
    }
}
