//! The composed, crate-wide error type. Maps 1:1 onto the taxonomy every
//! component's own error enum belongs to: client-caused, execution (carried
//! inside a `Feedback`, never raised as an `Error`), and infrastructure.

use thiserror::Error;

use crate::cluster::{BootstrapError, ClusterError};
use crate::harness::HarnessError;
use crate::identifier::IdentifierError;
use crate::job::spec::JobSpecError;
use crate::lang::UnsupportedLanguageError;
use crate::signature::SignatureError;
use crate::validator::ValidationError;

/// A request never reaches evaluation, or evaluation cannot complete for a
/// reason that is not itself part of the `Feedback` the caller asked for.
#[derive(Error, Debug)]
pub enum Error {
  #[error("problem not found: {0}")]
  ProblemNotFound(String),

  #[error(transparent)]
  UnsupportedLanguage(#[from] UnsupportedLanguageError),

  #[error(transparent)]
  InvalidIdentifier(#[from] IdentifierError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Signature(#[from] SignatureError),

  #[error(transparent)]
  Harness(#[from] HarnessError),

  #[error(transparent)]
  JobSpec(#[from] JobSpecError),

  #[error(transparent)]
  Cluster(#[from] ClusterError),

  #[error(transparent)]
  Bootstrap(#[from] BootstrapError),

  #[error("failed to parse feedback logs: {0}")]
  VerdictParse(String),

  #[error("timeout waiting for job '{job_name}' to complete")]
  Timeout { job_name: String },

  #[error("local execution failed: {0}")]
  LocalExecution(String),
}

impl Error {
  /// Whether the requested problem itself does not exist, distinct from
  /// every other client-caused error — callers map this to HTTP 404.
  pub fn is_not_found(&self) -> bool {
    return matches!(self, Error::ProblemNotFound(_));
  }

  /// Whether this error should be surfaced as a 4xx (the request itself was
  /// malformed) rather than a 5xx (infrastructure failed to serve a
  /// well-formed request). `ProblemNotFound` is excluded here since it maps
  /// to 404, not 400 — check [`Self::is_not_found`] first.
  pub fn is_client_error(&self) -> bool {
    return matches!(
      self,
      Error::UnsupportedLanguage(_) | Error::InvalidIdentifier(_) | Error::Validation(_)
    );
  }
}
