//! Wires the handlers in [`crate::handlers`] into an [`axum::Router`], with
//! a CORS layer restricted to the configured frontend origins.

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::handlers::{
  configs, ds_utils, ds_utils_example, question_signature, test_submission, AppState,
};

pub fn build(state: Arc<AppState>, frontend_urls: &[String]) -> Router {
  let origins: Vec<_> = frontend_urls
    .iter()
    .filter_map(|url| url.parse().ok())
    .collect();

  let cors = CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins))
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(tower_http::cors::Any);

  return Router::new()
    .route("/questions/:id/test", post(test_submission))
    .route("/questions/:id/signature", get(question_signature))
    .route("/ds_utils", get(ds_utils))
    .route("/ds_utils/examples", post(ds_utils_example))
    .route("/configs", get(configs))
    .layer(cors)
    .with_state(state);
}
