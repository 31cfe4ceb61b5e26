//! axum handlers for the public HTTP surface. Thin: every handler decodes
//! its input, delegates to `skillcode_judge`, and maps the result onto a
//! JSON response or an [`ApiError`].

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use skillcode_judge::harness::HarnessBuilder;
use skillcode_judge::lang::Language;
use skillcode_judge::problem::{Category, Difficulty, Submission};
use skillcode_judge::signature::SignatureRenderer;
use skillcode_judge::types::{AbstractType, Atomic, Container, TypeCodec};
use skillcode_judge::{EvaluationService, Feedback};

use crate::error::ApiError;
use crate::problem_store::InMemoryProblemStore;

pub struct AppState {
  pub service: Arc<EvaluationService>,
  pub problem_store: Arc<InMemoryProblemStore>,
  pub judge_cfg: skillcode_judge::Cfg,
}

#[derive(Deserialize)]
pub struct TestSubmissionBody {
  pub language: String,
  pub code: String,
}

/// `POST /questions/:id/test`
pub async fn test_submission(
  State(state): State<Arc<AppState>>,
  Path(problem_id): Path<String>,
  Json(body): Json<TestSubmissionBody>,
) -> Result<Json<Feedback>, ApiError> {
  let language = Language::from_token(&body.language).map_err(skillcode_judge::Error::from)?;
  let submission = Submission {
    language,
    code: body.code,
  };
  let feedback = state.service.evaluate(&problem_id, submission).await?;
  return Ok(Json(feedback));
}

#[derive(Deserialize)]
pub struct LanguageQuery {
  pub language: String,
}

#[derive(Serialize)]
pub struct SignatureResponse {
  pub function_signature: String,
}

/// `GET /questions/:id/signature?language=<name>`
pub async fn question_signature(
  State(state): State<Arc<AppState>>,
  Path(problem_id): Path<String>,
  Query(query): Query<LanguageQuery>,
) -> Result<Json<SignatureResponse>, ApiError> {
  let language = Language::from_token(&query.language).map_err(skillcode_judge::Error::from)?;
  let problem = state
    .problem_store
    .get_or_not_found(&problem_id)
    .await?;
  let function_signature = SignatureRenderer::render(&problem.function_spec, language)
    .map_err(skillcode_judge::Error::from)?;
  return Ok(Json(SignatureResponse { function_signature }));
}

/// `GET /ds_utils?language=<name>`
pub async fn ds_utils(
  State(state): State<Arc<AppState>>,
  Query(query): Query<LanguageQuery>,
) -> Result<String, ApiError> {
  let language = Language::from_token(&query.language).map_err(skillcode_judge::Error::from)?;
  let source =
    HarnessBuilder::ds_utils(language, &state.judge_cfg).map_err(skillcode_judge::Error::from)?;
  return Ok(source);
}

#[derive(Serialize)]
pub struct ExampleResponse {
  pub example: String,
}

/// `POST /ds_utils/examples`
pub async fn ds_utils_example(Json(ty): Json<AbstractType>) -> Json<ExampleResponse> {
  return Json(ExampleResponse {
    example: TypeCodec::sample(&ty),
  });
}

#[derive(Serialize)]
pub struct Configs {
  pub atomic_types: Vec<String>,
  pub composite_types: Vec<String>,
  pub difficulties: Vec<String>,
  pub categories: Vec<String>,
  pub languages: Vec<String>,
}

/// `GET /configs`
pub async fn configs() -> Json<Configs> {
  return Json(Configs {
    atomic_types: Atomic::iter().map(|a| a.to_string()).collect(),
    composite_types: Container::iter().map(|c| c.to_string()).collect(),
    difficulties: Difficulty::iter().map(|d| d.to_string()).collect(),
    categories: Category::iter().map(|c| c.to_string()).collect(),
    languages: Language::iter().map(|l| l.to_string()).collect(),
  });
}
