use std::time;

use serde::{Deserialize, Serialize};

/// Judge crate config. Built once by the caller (typically in `main`) and
/// threaded through every constructor that needs it; nothing in this crate
/// reaches for a global. See [`Cfg::load`].
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Cfg {
  /// `development` skips cluster bootstrap and runs harnesses as local
  /// child processes; `production` schedules Kubernetes Jobs.
  pub mode: Mode,

  /// Namespace the cluster client operates in.
  pub namespace: String,

  /// Path to a kubeconfig file. `None` uses in-cluster config.
  pub kubeconfig: Option<String>,

  /// Root directory template assets and, in development mode, per-request
  /// scratch directories are resolved under.
  pub project_root: String,

  /// Wall-clock budget for one evaluation, from job submission to terminal
  /// state.
  pub job_timeout: time::Duration,

  /// Interval between job-status polls.
  pub job_poll_interval: time::Duration,

  /// Logs larger than this are treated as `internal_server_error` rather
  /// than parsed.
  pub max_log_bytes: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
  Development,
  Production,
}

impl Default for Cfg {
  fn default() -> Self {
    return Self {
      mode: Mode::Development,
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
  /// Load config layered over defaults: an optional file per `search_paths`,
  /// then environment variables prefixed `SKILLCODE_JUDGE`.
  pub fn load(search_paths: &[String]) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder()
      .add_source(config::File::with_name("/etc/skillcode/judge").required(false));

    for p in search_paths {
      builder = builder.add_source(config::File::with_name(p.as_str()).required(false));
    }

    builder = builder.add_source(config::Environment::with_prefix("SKILLCODE_JUDGE"));

    return builder.build()?.try_deserialize::<Self>();
  }

  /// In development mode, prefer a `template-assets/<relative>` file on disk
  /// under `project_root` over the copy baked into the binary, so template
  /// edits take effect without a rebuild. Returns `None` (fall back to the
  /// embedded asset) in production, or whenever no such file exists.
  pub fn dev_template_override(&self, relative: &str) -> Option<String> {
    if self.mode != Mode::Development {
      return None;
    }
    let path = std::path::Path::new(&self.project_root)
      .join("template-assets")
      .join(relative);
    return std::fs::read_to_string(path).ok();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_development_mode() {
    assert_eq!(Cfg::default().mode, Mode::Development);
  }

  #[test]
  fn load_with_no_sources_falls_back_to_defaults() {
    let cfg = Cfg::load(&[]).unwrap();
    assert_eq!(cfg.namespace, "skillcode-judge");
  }
}
