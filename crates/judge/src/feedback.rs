//! Turns a job's raw stdout into a typed [`Feedback`]. A `Feedback` that
//! itself carries `error: internal_server_error` is re-raised as a crate
//! [`Error`] here, so callers only ever see a bare `Feedback` for the two
//! outcomes that are genuinely request successes (`compilation`,
//! `fail_tests`) — matching the HTTP-layer status code split in §7.

use crate::error::Error;
use crate::problem::{ErrorKind, Feedback, FeedbackStatus};

pub struct VerdictParser;

impl VerdictParser {
  /// `max_log_bytes` bounds the raw log buffer; an over-limit buffer is
  /// treated as `internal_server_error` rather than silently truncated and
  /// parsed.
  pub fn parse(raw_logs: &str, max_log_bytes: usize) -> Result<Feedback, Error> {
    if raw_logs.len() > max_log_bytes {
      return Err(Error::VerdictParse(format!(
        "log buffer of {} bytes exceeds the {} byte limit",
        raw_logs.len(),
        max_log_bytes
      )));
    }

    let feedback: Feedback = serde_json::from_str(raw_logs.trim())
      .map_err(|e| Error::VerdictParse(e.to_string()))?;

    if feedback.status == FeedbackStatus::Fail
      && feedback.error == Some(ErrorKind::InternalServerError)
    {
      return Err(Error::VerdictParse(
        feedback
          .details
          .unwrap_or_else(|| "internal_server_error with no details".to_string()),
      ));
    }

    return Ok(feedback);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::problem::{CaseResult, CaseStatus};

  #[test]
  fn parses_a_successful_feedback_document() {
    let raw = r#"{"status":"success","results":[{"status":"pass","parameters":["1","2"],"expected_output":3,"actual_output":3}]}"#;
    let feedback = VerdictParser::parse(raw, 1024 * 1024).unwrap();
    assert_eq!(feedback.status, FeedbackStatus::Success);
  }

  #[test]
  fn passes_through_fail_tests_as_ok() {
    let feedback = Feedback::failed_tests(vec![CaseResult {
      status: CaseStatus::Fail,
      parameters: vec!["1".to_string()],
      expected_output: serde_json::json!(1),
      actual_output: serde_json::json!(2),
    }]);
    let raw = serde_json::to_string(&feedback).unwrap();
    let parsed = VerdictParser::parse(&raw, 1024 * 1024).unwrap();
    assert_eq!(parsed.error, Some(ErrorKind::FailTests));
  }

  #[test]
  fn re_raises_internal_server_error_as_an_error() {
    let feedback = Feedback::internal_error("boom");
    let raw = serde_json::to_string(&feedback).unwrap();
    assert!(VerdictParser::parse(&raw, 1024 * 1024).is_err());
  }

  #[test]
  fn malformed_json_is_a_parse_error() {
    assert!(VerdictParser::parse("not json", 1024 * 1024).is_err());
  }

  #[test]
  fn oversized_logs_are_rejected_before_parsing() {
    let huge = "x".repeat(100);
    assert!(VerdictParser::parse(&huge, 10).is_err());
  }
}
