//! Rejects malformed problems before they reach the evaluation pipeline:
//! bad identifiers, duplicate parameter names, and examples/test cases that
//! do not validate against the declared types.

use std::collections::HashSet;

use thiserror::Error;

use crate::problem::{FunctionSpec, Problem, TestVector};
use crate::types::{TypeCodec, TypeError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("function configuration parameters cannot be null")]
  MissingParameters,

  #[error("function configuration return type cannot be null")]
  MissingReturnType,

  #[error("duplicate parameter name: {name}")]
  DuplicateParameterName { name: String },

  #[error("test case {index}, parameter '{parameter}': {source}")]
  TestCaseParameter {
    index: usize,
    parameter: String,
    #[source]
    source: TypeError,
  },

  #[error("test case {index}, expected output: {source}")]
  TestCaseExpectedOutput {
    index: usize,
    #[source]
    source: TypeError,
  },

  #[error("test case {index}: expected {expected} parameters, got {actual}")]
  Arity {
    index: usize,
    expected: usize,
    actual: usize,
  },
}

/// Validates a [`Problem`] before it would be persisted. Returns the first
/// violation found; never partially accepts.
pub struct ProblemValidator;

impl ProblemValidator {
  pub fn validate(problem: &Problem) -> Result<(), ValidationError> {
    Self::validate_function_spec(&problem.function_spec)?;

    for (i, vector) in problem.examples.iter().enumerate() {
      Self::validate_vector(vector, &problem.function_spec, i)?;
    }
    for (i, vector) in problem.test_cases.iter().enumerate() {
      Self::validate_vector(vector, &problem.function_spec, i)?;
    }
    return Ok(());
  }

  fn validate_function_spec(spec: &FunctionSpec) -> Result<(), ValidationError> {
    if spec.parameters.is_empty() {
      return Err(ValidationError::MissingParameters);
    }

    let mut seen = HashSet::new();
    for param in &spec.parameters {
      if !seen.insert(param.name.as_str()) {
        return Err(ValidationError::DuplicateParameterName {
          name: param.name.as_str().to_string(),
        });
      }
    }

    return Ok(());
  }

  fn validate_vector(
    vector: &TestVector,
    spec: &FunctionSpec,
    index: usize,
  ) -> Result<(), ValidationError> {
    if vector.parameters.len() != spec.parameters.len() {
      return Err(ValidationError::Arity {
        index,
        expected: spec.parameters.len(),
        actual: vector.parameters.len(),
      });
    }

    for (literal, param) in vector.parameters.iter().zip(&spec.parameters) {
      TypeCodec::validate(literal, &param.ty).map_err(|source| {
        ValidationError::TestCaseParameter {
          index,
          parameter: param.name.as_str().to_string(),
          source,
        }
      })?;
    }

    TypeCodec::validate(&vector.expected_output, &spec.return_type)
      .map_err(|source| ValidationError::TestCaseExpectedOutput { index, source })?;

    return Ok(());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::identifier::Identifier;
  use crate::lang::Language;
  use crate::problem::{Difficulty, Parameter};
  use crate::types::AbstractType;

  fn sample_problem() -> Problem {
    return Problem {
      id: "1".to_string(),
      title: "Binary Search".to_string(),
      description: "find target in sorted array".to_string(),
      difficulty: Difficulty::Easy,
      category: "Array".to_string(),
      stats: 0,
      examples: vec![],
      test_cases: vec![TestVector {
        parameters: vec!["[1,2,3,4,5]".to_string(), "3".to_string()],
        expected_output: "2".to_string(),
      }],
      function_spec: FunctionSpec {
        name: Identifier::parse("binary_search").unwrap(),
        parameters: vec![
          Parameter {
            name: Identifier::parse("nums").unwrap(),
            ty: AbstractType::array(AbstractType::integer()),
          },
          Parameter {
            name: Identifier::parse("target").unwrap(),
            ty: AbstractType::integer(),
          },
        ],
        return_type: AbstractType::integer(),
      },
      languages: vec![Language::Python],
    };
  }

  #[test]
  fn accepts_well_formed_problem() {
    assert!(ProblemValidator::validate(&sample_problem()).is_ok());
  }

  #[test]
  fn rejects_empty_parameters() {
    let mut problem = sample_problem();
    problem.function_spec.parameters = vec![];
    assert_eq!(
      ProblemValidator::validate(&problem).unwrap_err(),
      ValidationError::MissingParameters
    );
  }

  #[test]
  fn rejects_duplicate_parameter_names() {
    let mut problem = sample_problem();
    problem.function_spec.parameters[1].name = problem.function_spec.parameters[0].name.clone();
    assert!(matches!(
      ProblemValidator::validate(&problem).unwrap_err(),
      ValidationError::DuplicateParameterName { .. }
    ));
  }

  #[test]
  fn rejects_arity_mismatch() {
    let mut problem = sample_problem();
    problem.test_cases[0].parameters.pop();
    assert!(matches!(
      ProblemValidator::validate(&problem).unwrap_err(),
      ValidationError::Arity { .. }
    ));
  }

  #[test]
  fn rejects_inconsistent_matrix_dimensions() {
    let mut problem = sample_problem();
    problem.function_spec.parameters[0].ty = AbstractType::matrix(AbstractType::integer());
    problem.test_cases[0].parameters[0] = "[[1,2],[3]]".to_string();
    let err = ProblemValidator::validate(&problem).unwrap_err();
    assert!(err.to_string().contains("inconsistent lengths"));
  }

  #[test]
  fn first_violation_wins_over_later_ones() {
    let mut problem = sample_problem();
    problem.function_spec.parameters = vec![];
    problem.test_cases[0].parameters = vec![];
    assert_eq!(
      ProblemValidator::validate(&problem).unwrap_err(),
      ValidationError::MissingParameters
    );
  }
}
