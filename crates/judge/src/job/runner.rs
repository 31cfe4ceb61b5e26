//! The request-scoped object that takes a rendered harness source and
//! returns its raw stdout: either by scheduling a Kubernetes Job
//! (production) or by running the language runtime as a local child
//! process (development). Both paths share the same input/output contract.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{interval, timeout};

use crate::cluster::SharedExecutor;
use crate::error::Error;
use crate::etc::Cfg;
use crate::job::spec::{self, JobSpecParams};
use crate::lang::LanguageProfile;

/// Owned exclusively by the request task that creates it; names embed the
/// request ID so concurrent evaluations never collide.
pub struct JobRunner<'a> {
  shared: Option<&'a SharedExecutor>,
  cfg: &'a Cfg,
  profile: &'static LanguageProfile,
  request_id: String,
  job_name: String,
  payload_name: String,
}

impl<'a> JobRunner<'a> {
  pub fn new(
    shared: Option<&'a SharedExecutor>,
    cfg: &'a Cfg,
    profile: &'static LanguageProfile,
    request_id: impl Into<String>,
  ) -> Self {
    let request_id = request_id.into();
    return Self {
      shared,
      cfg,
      profile,
      job_name: format!("job-{}", request_id),
      payload_name: format!("payload-{}", request_id),
      request_id,
    };
  }

  /// Run `harness` to completion and return its raw stdout. Cleans up any
  /// cluster resource it created on every exit path, including early
  /// returns on error.
  pub async fn execute(&self, harness: String) -> Result<String, Error> {
    return match self.shared {
      Some(shared) => self.execute_on_cluster(shared, harness).await,
      None => self.execute_locally(harness).await,
    };
  }

  async fn execute_on_cluster(
    &self,
    shared: &SharedExecutor,
    harness: String,
  ) -> Result<String, Error> {
    let result = self.run_on_cluster(shared, harness).await;

    if let Err(e) = shared.delete_config_map(&self.payload_name).await {
      log::warn!(
        "cleanup: failed to delete payload '{}': {}",
        self.payload_name,
        e
      );
    }
    if let Err(e) = shared.delete_job(&self.job_name).await {
      log::warn!("cleanup: failed to delete job '{}': {}", self.job_name, e);
    }

    return result;
  }

  async fn run_on_cluster(&self, shared: &SharedExecutor, harness: String) -> Result<String, Error> {
    log::info!(
      "request {}: publishing payload '{}'",
      self.request_id,
      self.payload_name
    );
    shared
      .create_config_map(&self.payload_name, "runner", &harness)
      .await?;

    let job = spec::render(
      &JobSpecParams {
        job_name: &self.job_name,
        request_id: &self.request_id,
        image: self.profile.image_tag,
        runtime: self.profile.runtime_cmd[0],
        file_ext: self.profile.extension,
      },
      self.cfg,
    )?;

    log::info!("request {}: submitting job '{}'", self.request_id, self.job_name);
    shared.create_job(job).await?;

    let deadline = self.cfg.job_timeout;
    let poll = self.cfg.job_poll_interval;

    let outcome = timeout(deadline, self.poll_until_terminal(shared, poll)).await;

    let terminal = match outcome {
      Ok(terminal) => terminal?,
      Err(_) => {
        return Err(Error::Timeout {
          job_name: self.job_name.clone(),
        });
      }
    };

    return match terminal {
      Terminal::Succeeded => {
        log::info!("request {}: job succeeded, fetching logs", self.request_id);
        Ok(shared.fetch_job_logs(&self.job_name).await?)
      }
      Terminal::Failed => {
        log::error!("request {}: job failed", self.request_id);
        let logs = shared
          .fetch_job_logs(&self.job_name)
          .await
          .unwrap_or_else(|e| format!("(failed to fetch logs: {})", e));
        Err(Error::LocalExecution(format!(
          "job '{}' failed. logs:\n{}",
          self.job_name, logs
        )))
      }
    };
  }

  async fn poll_until_terminal(
    &self,
    shared: &SharedExecutor,
    poll_interval: std::time::Duration,
  ) -> Result<Terminal, Error> {
    let mut ticker = interval(poll_interval);
    loop {
      ticker.tick().await;
      let (succeeded, failed) = shared.job_status(&self.job_name).await?;
      if succeeded > 0 {
        return Ok(Terminal::Succeeded);
      }
      if failed > 0 {
        return Ok(Terminal::Failed);
      }
      log::debug!("request {}: job '{}' still running", self.request_id, self.job_name);
    }
  }

  /// Write the harness to a temp file under a per-request scratch
  /// directory, invoke the language runtime directly, capture stdout. The
  /// scratch directory is removed on exit regardless of outcome.
  async fn execute_locally(&self, harness: String) -> Result<String, Error> {
    let scratch_dir = PathBuf::from(&self.cfg.project_root)
      .join("unique-assets")
      .join(&self.request_id);
    tokio::fs::create_dir_all(&scratch_dir)
      .await
      .map_err(|e| Error::LocalExecution(e.to_string()))?;

    let result = self.run_locally(&scratch_dir, harness).await;

    if let Err(e) = tokio::fs::remove_dir_all(&scratch_dir).await {
      log::warn!(
        "cleanup: failed to remove scratch directory '{}': {}",
        scratch_dir.display(),
        e
      );
    }

    return result;
  }

  async fn run_locally(&self, scratch_dir: &PathBuf, harness: String) -> Result<String, Error> {
    let harness_path = scratch_dir.join(format!("runner.{}", self.profile.extension));
    let mut file = tokio::fs::File::create(&harness_path)
      .await
      .map_err(|e| Error::LocalExecution(e.to_string()))?;
    file
      .write_all(harness.as_bytes())
      .await
      .map_err(|e| Error::LocalExecution(e.to_string()))?;
    file.flush().await.map_err(|e| Error::LocalExecution(e.to_string()))?;

    let mut command = Command::new(self.profile.runtime_cmd[0]);
    for extra_arg in &self.profile.runtime_cmd[1..] {
      command.arg(extra_arg);
    }
    command.arg(&harness_path);

    log::info!(
      "request {}: running harness locally via {:?}",
      self.request_id,
      self.profile.runtime_cmd
    );
    let output = command
      .output()
      .await
      .map_err(|e| Error::LocalExecution(e.to_string()))?;

    if !output.status.success() {
      return Err(Error::LocalExecution(format!(
        "{} exited with {}: {}",
        self.profile.runtime_cmd[0],
        output.status,
        String::from_utf8_lossy(&output.stderr)
      )));
    }

    return Ok(String::from_utf8_lossy(&output.stdout).to_string());
  }
}

enum Terminal {
  Succeeded,
  Failed,
}
