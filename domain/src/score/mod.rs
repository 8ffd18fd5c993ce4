//! Judge verdicts and score aggregation
//!
//! A completed session is scored by several independent judge queries; each
//! free-text response is reduced to a [`JudgeVerdict`] and the verdicts are
//! aggregated into one scalar. Sessions that never produced a diagnosis are
//! recorded as [`SCORE_UNFINISHED`] without consulting the judge.

/// Sentinel recorded when the simulation never reached a diagnosis.
pub const SCORE_UNFINISHED: f64 = -2.0;

/// Outcome of a single judge query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeVerdict {
    /// Judge affirmed a match at this 1-based position in the diagnosis list
    Position(i64),
    /// Judge explicitly answered NO
    NotPresent,
    /// No integer could be parsed after the `Position:` prefix
    ParseFailure,
    /// Parseable position but no YES/NO judgment in the response
    Malformed,
}

impl JudgeVerdict {
    /// Integer encoding used in persisted results and in the composite
    /// failure fingerprint.
    pub fn code(&self) -> i64 {
        match self {
            JudgeVerdict::Position(position) => *position,
            JudgeVerdict::NotPresent => -1,
            JudgeVerdict::ParseFailure => -3,
            JudgeVerdict::Malformed => -4,
        }
    }
}

/// Reduce a judge's free-text response to a verdict.
///
/// The response is expected to contain `Position: <number>`, with the number
/// optionally wrapped in brackets, plus a YES/NO judgment line.
pub fn parse_verdict(response: &str) -> JudgeVerdict {
    let Some(position) = parse_position(response) else {
        return JudgeVerdict::ParseFailure;
    };
    if response.contains("YES") {
        JudgeVerdict::Position(position)
    } else if response.contains("NO") {
        JudgeVerdict::NotPresent
    } else {
        JudgeVerdict::Malformed
    }
}

/// Extract the integer following the first `Position:` prefix.
fn parse_position(response: &str) -> Option<i64> {
    let (_, after) = response.split_once("Position:")?;
    let after = after.trim_start().trim_start_matches('[').trim_start();

    let mut end = 0;
    let bytes = after.as_bytes();
    if end < bytes.len() && bytes[end] == b'-' {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    after[..end].parse().ok()
}

/// Aggregate independent judge verdicts into one scalar score.
///
/// If any verdict reports a positive position, the score is the mean of the
/// positive positions rounded to one decimal place. Otherwise the score is a
/// composite failure fingerprint: the decimal digits of the absolute verdict
/// codes concatenated and negated (`[-1, -1, -1]` becomes `-111`).
pub fn aggregate_verdicts(verdicts: &[JudgeVerdict]) -> f64 {
    assert!(!verdicts.is_empty(), "cannot aggregate zero verdicts");

    let positives: Vec<i64> = verdicts
        .iter()
        .map(JudgeVerdict::code)
        .filter(|&code| code > 0)
        .collect();

    if !positives.is_empty() {
        let mean = positives.iter().sum::<i64>() as f64 / positives.len() as f64;
        return (mean * 10.0).round() / 10.0;
    }

    let combined: String = verdicts
        .iter()
        .map(|v| v.code().abs().to_string())
        .collect();
    // The concatenation stays well inside i64 range for any sane judge count.
    -combined.parse::<f64>().unwrap_or(0.0)
}
