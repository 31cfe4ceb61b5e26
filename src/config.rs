use std::time;

use serde::{Deserialize, Serialize};
use skillcode_judge::etc::Mode;

/// SkillCode server config. Loaded once in `main` into a single immutable
/// value and threaded through every constructor that needs it; nothing in
/// this binary reaches for a global config table.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Cfg {
  /// The address for the HTTP server to listen on.
  pub port: u16,

  /// Comma-separated in the environment; the CORS layer allows exactly
  /// these origins.
  pub frontend_urls: Vec<String>,

  /// `development` skips cluster bootstrap and runs harnesses locally;
  /// `production` schedules Kubernetes Jobs.
  pub mode_env: Mode,

  /// Problem persistence connection string. Consumed only by the
  /// in-memory `ProblemStore` stand-in in this build; present so the
  /// config surface matches a real deployment's.
  pub mongo_uri: String,
  pub mongo_db: String,

  pub namespace: String,
  pub kubeconfig: Option<String>,

  /// Fatal if unset in code paths that resolve template or scratch
  /// directories relative to it.
  pub project_root: String,

  pub job_timeout: time::Duration,
  pub job_poll_interval: time::Duration,
  pub max_log_bytes: usize,
}

impl Default for Cfg {
  fn default() -> Self {
    return Self {
      port: 8080,
      frontend_urls: vec!["http://localhost:3000".to_string()],
      mode_env: Mode::Development,
      mongo_uri: "mongodb://localhost:27017".to_string(),
      mongo_db: "skillcode".to_string(),
      namespace: "skillcode-judge".to_string(),
      kubeconfig: None,
      project_root: ".".to_string(),
      job_timeout: time::Duration::from_secs(30),
      job_poll_interval: time::Duration::from_secs(1),
      max_log_bytes: 1024 * 1024,
    };
  }
}

impl Cfg {
  /// Load config layered over defaults: an optional file per
  /// `search_paths`, then environment variables prefixed `SKILLCODE`.
  pub fn load(search_paths: &[String]) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder()
      .add_source(config::File::with_name("/etc/skillcode/config").required(false));

    for p in search_paths {
      builder = builder.add_source(config::File::with_name(p.as_str()).required(false));
    }

    builder = builder.add_source(config::Environment::with_prefix("SKILLCODE"));

    return builder.build()?.try_deserialize::<Self>();
  }

  /// Project this server config down to the judge crate's own `Cfg`.
  pub fn to_judge_cfg(&self) -> skillcode_judge::Cfg {
    return skillcode_judge::Cfg {
      mode: self.mode_env,
      namespace: self.namespace.clone(),
      kubeconfig: self.kubeconfig.clone(),
      project_root: self.project_root.clone(),
      job_timeout: self.job_timeout,
      job_poll_interval: self.job_poll_interval,
      max_log_bytes: self.max_log_bytes,
    };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_round_trip_into_a_judge_cfg() {
    let cfg = Cfg::default();
    let judge_cfg = cfg.to_judge_cfg();
    assert_eq!(judge_cfg.namespace, cfg.namespace);
  }
}
