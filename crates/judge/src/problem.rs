//! The request/response data model shared by every component: the problem
//! definition, a submission, and the `Feedback` verdict returned to callers.

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::identifier::Identifier;
use crate::lang::Language;
use crate::types::AbstractType;

/// One named, typed parameter of a [`FunctionSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
  #[serde(with = "identifier_serde")]
  pub name: Identifier,
  #[serde(rename = "param_type")]
  pub ty: AbstractType,
}

/// The function signature a problem asks the submission to implement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
  #[serde(with = "identifier_serde")]
  pub name: Identifier,
  pub parameters: Vec<Parameter>,
  pub return_type: AbstractType,
}

mod identifier_serde {
  use super::Identifier;
  use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(id: &Identifier, s: S) -> Result<S::Ok, S::Error> {
    return s.serialize_str(id.as_str());
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Identifier, D::Error> {
    let raw = String::deserialize(d)?;
    return Identifier::parse(&raw).map_err(D::Error::custom);
  }
}

/// One test case or example: literal parameter encodings and a literal
/// expected-output encoding (see `TypeCodec`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestVector {
  pub parameters: Vec<String>,
  pub expected_output: String,
}

/// Difficulty rating of a [`Problem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SerializeDisplay, DeserializeFromStr, strum::Display, strum::EnumString, strum::EnumIter)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

/// The predefined set of problem categories offered to a client populating a
/// dropdown. `Problem::category` itself stays a plain `String` (matching how
/// problems are authored), so this enum exists only to enumerate the
/// recommended values — it is not load-bearing for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
pub enum Category {
  Array,
  Graph,
  String,
  Tree,
  DynamicProgramming,
  LinkedList,
  Matrix,
}

/// A persisted coding challenge. Owned by the persistence layer; the
/// evaluation pipeline only ever holds a read-only snapshot for the
/// duration of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
  pub id: String,
  pub title: String,
  pub description: String,
  pub difficulty: Difficulty,
  pub category: String,
  #[serde(default)]
  pub stats: u64,
  pub examples: Vec<TestVector>,
  pub test_cases: Vec<TestVector>,
  pub function_spec: FunctionSpec,
  pub languages: Vec<Language>,
}

/// A user-submitted solution for one problem, in one language. Exists only
/// for the duration of one evaluation request; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
  pub language: Language,
  pub code: String,
}

/// The stable taxonomy of ways an evaluation can conclude without having
/// succeeded outright. `Compilation` and `FailTests` are carried inside a
/// 200 response (the request itself succeeded); `InternalServerError`
/// is re-raised as an HTTP 500 by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  Compilation,
  FailTests,
  InternalServerError,
}

/// The per-case verdict of one test vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
  pub status: CaseStatus,
  pub parameters: Vec<String>,
  pub expected_output: serde_json::Value,
  pub actual_output: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
  Pass,
  Fail,
}

/// Overall status of a [`Feedback`] document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
  Success,
  Fail,
}

/// The typed verdict returned for one evaluation — the harness's JSON
/// output, decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
  pub status: FeedbackStatus,
  #[serde(default)]
  pub results: Vec<CaseResult>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<ErrorKind>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
}

impl Feedback {
  pub fn success(results: Vec<CaseResult>) -> Self {
    return Self {
      status: FeedbackStatus::Success,
      results,
      error: None,
      details: None,
    };
  }

  pub fn failed_tests(results: Vec<CaseResult>) -> Self {
    return Self {
      status: FeedbackStatus::Fail,
      results,
      error: Some(ErrorKind::FailTests),
      details: None,
    };
  }

  pub fn compilation_error(details: impl Into<String>) -> Self {
    return Self {
      status: FeedbackStatus::Fail,
      results: Vec::new(),
      error: Some(ErrorKind::Compilation),
      details: Some(details.into()),
    };
  }

  pub fn internal_error(details: impl Into<String>) -> Self {
    return Self {
      status: FeedbackStatus::Fail,
      results: Vec::new(),
      error: Some(ErrorKind::InternalServerError),
      details: Some(details.into()),
    };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn feedback_success_round_trips_through_json() {
    let feedback = Feedback::success(vec![CaseResult {
      status: CaseStatus::Pass,
      parameters: vec!["1".to_string(), "2".to_string()],
      expected_output: serde_json::json!(3),
      actual_output: serde_json::json!(3),
    }]);
    let encoded = serde_json::to_string(&feedback).unwrap();
    let decoded: Feedback = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, feedback);
  }

  #[test]
  fn function_spec_rejects_invalid_identifier_on_deserialize() {
    let raw = r#"{"name":"1bad","parameters":[],"return_type":{"type":"Integer"}}"#;
    let result: Result<FunctionSpec, _> = serde_json::from_str(raw);
    assert!(result.is_err());
  }
}
