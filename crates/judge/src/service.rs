//! The sole holder of a request-scoped [`JobRunner`]; orchestrates the
//! pipeline described in the component design: look up the problem, build
//! the harness, run it, parse the verdict.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::cluster::SharedExecutor;
use crate::error::Error;
use crate::etc::Cfg;
use crate::feedback::VerdictParser;
use crate::harness::HarnessBuilder;
use crate::job::JobRunner;
use crate::problem::{Feedback, Problem, Submission};

/// The read-only view this crate needs of problem persistence; the document
/// store itself is an external collaborator out of scope here.
#[async_trait]
pub trait ProblemStore: Send + Sync {
  async fn get(&self, problem_id: &str) -> Option<Problem>;
}

pub struct EvaluationService {
  cfg: Cfg,
  shared: Option<SharedExecutor>,
  problem_store: Arc<dyn ProblemStore>,
}

impl EvaluationService {
  pub fn new(cfg: Cfg, shared: Option<SharedExecutor>, problem_store: Arc<dyn ProblemStore>) -> Self {
    return Self {
      cfg,
      shared,
      problem_store,
    };
  }

  /// Look up `problem_id`, synthesize and run a harness for `submission`,
  /// and return its verdict. A fresh request ID is minted per call, so
  /// payload/job names never collide across concurrently in-flight
  /// evaluations.
  pub async fn evaluate(&self, problem_id: &str, submission: Submission) -> Result<Feedback, Error> {
    let problem = self
      .problem_store
      .get(problem_id)
      .await
      .ok_or_else(|| Error::ProblemNotFound(problem_id.to_string()))?;

    let harness = HarnessBuilder::build(&problem, &submission, &self.cfg)?;

    let request_id = Uuid::new_v4().to_string();
    let profile = submission.language.profile();
    let runner = JobRunner::new(self.shared.as_ref(), &self.cfg, profile, request_id);

    let raw_logs = runner.execute(harness).await?;
    let feedback = VerdictParser::parse(&raw_logs, self.cfg.max_log_bytes)?;
    return Ok(feedback);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct EmptyStore;

  #[async_trait]
  impl ProblemStore for EmptyStore {
    async fn get(&self, _problem_id: &str) -> Option<Problem> {
      return None;
    }
  }

  #[tokio::test]
  async fn evaluate_returns_not_found_for_unknown_problem() {
    let service = EvaluationService::new(Cfg::default(), None, Arc::new(EmptyStore));
    let submission = Submission {
      language: crate::lang::Language::Python,
      code: "def f(): pass".to_string(),
    };
    let result = service.evaluate("missing", submission).await;
    assert!(matches!(result, Err(Error::ProblemNotFound(_))));
  }
}
