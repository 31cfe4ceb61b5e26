//! A minimal in-memory stand-in for problem persistence, so the service is
//! runnable and testable end-to-end. The real persistence layer (a document
//! store keyed by problem ID) is an external collaborator out of scope
//! here; this type exists only to satisfy `skillcode_judge::ProblemStore`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use skillcode_judge::validator::{ProblemValidator, ValidationError};
use skillcode_judge::{Problem, ProblemStore};

#[derive(Default)]
pub struct InMemoryProblemStore {
  problems: RwLock<HashMap<String, Problem>>,
}

impl InMemoryProblemStore {
  pub fn new() -> Self {
    return Self::default();
  }

  /// Validate then insert `problem`, replacing any existing problem with
  /// the same ID. Returns the first validation violation, if any; never
  /// partially accepts.
  pub fn put(&self, problem: Problem) -> Result<(), ValidationError> {
    ProblemValidator::validate(&problem)?;
    self
      .problems
      .write()
      .unwrap()
      .insert(problem.id.clone(), problem);
    return Ok(());
  }

  pub fn list(&self) -> Vec<Problem> {
    return self.problems.read().unwrap().values().cloned().collect();
  }

  /// Convenience for handlers: look up `problem_id`, or a
  /// [`skillcode_judge::Error::ProblemNotFound`] ready to convert to a 404.
  pub async fn get_or_not_found(
    &self,
    problem_id: &str,
  ) -> Result<Problem, skillcode_judge::Error> {
    return self
      .get(problem_id)
      .await
      .ok_or_else(|| skillcode_judge::Error::ProblemNotFound(problem_id.to_string()));
  }
}

#[async_trait]
impl ProblemStore for InMemoryProblemStore {
  async fn get(&self, problem_id: &str) -> Option<Problem> {
    return self.problems.read().unwrap().get(problem_id).cloned();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use skillcode_judge::identifier::Identifier;
  use skillcode_judge::lang::Language;
  use skillcode_judge::problem::{Difficulty, FunctionSpec, Parameter};
  use skillcode_judge::types::AbstractType;

  fn sample_problem() -> Problem {
    return Problem {
      id: "1".to_string(),
      title: "Binary Search".to_string(),
      description: "find target".to_string(),
      difficulty: Difficulty::Easy,
      category: "Array".to_string(),
      stats: 0,
      examples: vec![],
      test_cases: vec![],
      function_spec: FunctionSpec {
        name: Identifier::parse("binary_search").unwrap(),
        parameters: vec![Parameter {
          name: Identifier::parse("nums").unwrap(),
          ty: AbstractType::array(AbstractType::integer()),
        }],
        return_type: AbstractType::integer(),
      },
      languages: vec![Language::Python],
    };
  }

  #[tokio::test]
  async fn put_then_get_round_trips() {
    let store = InMemoryProblemStore::new();
    store.put(sample_problem()).unwrap();
    let fetched = store.get("1").await.unwrap();
    assert_eq!(fetched.title, "Binary Search");
  }

  #[tokio::test]
  async fn get_returns_none_for_unknown_id() {
    let store = InMemoryProblemStore::new();
    assert!(store.get("missing").await.is_none());
  }

  #[test]
  fn put_rejects_invalid_problems() {
    let store = InMemoryProblemStore::new();
    let mut problem = sample_problem();
    problem.function_spec.parameters = vec![];
    assert!(store.put(problem).is_err());
  }
}
