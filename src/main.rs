pub mod args;
pub mod config;
pub mod error;
pub mod handlers;
pub mod problem_store;
pub mod routes;

mod logging;

#[cfg(test)]
mod test;

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use skillcode_judge::cluster::ClusterBootstrapper;
use skillcode_judge::EvaluationService;

use handlers::AppState;
use problem_store::InMemoryProblemStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  logging::init();

  let args = args::Args::parse();
  let cfg = config::Cfg::load(&args.config_search_path)?;
  let judge_cfg = cfg.to_judge_cfg();

  let bootstrapper = ClusterBootstrapper::new(format!("{}-cluster", judge_cfg.namespace));
  let shared = bootstrapper.bootstrap(&judge_cfg).await?;

  let problem_store = Arc::new(InMemoryProblemStore::new());
  let service = Arc::new(EvaluationService::new(
    judge_cfg.clone(),
    shared,
    problem_store.clone(),
  ));
  let state = Arc::new(AppState {
    service,
    problem_store,
    judge_cfg,
  });

  let app = routes::build(state, &cfg.frontend_urls);

  let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port)).await?;
  log::info!("listening on {}", listener.local_addr()?);
  axum::serve(listener, app).await?;

  return Ok(());
}
