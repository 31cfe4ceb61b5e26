//! Startup-time, idempotent cluster preparation: verify the toolchain,
//! ensure the target cluster exists, build and load each language's runner
//! image, then hand back a [`SharedExecutor`]. Skipped entirely in
//! development mode, where evaluation runs harnesses as local processes
//! instead (see [`crate::job::runner`]).

use std::path::Path;

use thiserror::Error;
use tokio::process::Command;

use crate::cluster::executor::{ClusterError, SharedExecutor};
use crate::etc::{Cfg, Mode};
use crate::lang::registry;

#[derive(Error, Debug)]
pub enum BootstrapError {
  #[error("required tool '{tool}' is not available: {reason}")]
  ToolMissing { tool: String, reason: String },

  #[error("failed to ensure cluster '{name}' exists: {reason}")]
  ClusterCreate { name: String, reason: String },

  #[error("failed to build image '{tag}': {reason}")]
  ImageBuild { tag: String, reason: String },

  #[error("failed to load image '{tag}' into cluster: {reason}")]
  ImageLoad { tag: String, reason: String },

  #[error(transparent)]
  Connect(#[from] ClusterError),
}

/// Names of the external binaries this bootstrapper shells out to. All
/// three are expected on `PATH`; there is no vendored fallback.
pub struct ToolNames {
  pub docker: &'static str,
  pub kind: &'static str,
  pub kubectl: &'static str,
}

impl Default for ToolNames {
  fn default() -> Self {
    return Self {
      docker: "docker",
      kind: "kind",
      kubectl: "kubectl",
    };
  }
}

pub struct ClusterBootstrapper {
  tools: ToolNames,
  cluster_name: String,
}

impl ClusterBootstrapper {
  pub fn new(cluster_name: impl Into<String>) -> Self {
    return Self {
      tools: ToolNames::default(),
      cluster_name: cluster_name.into(),
    };
  }

  /// Run every bootstrap step and return a ready-to-use `SharedExecutor`.
  /// In development mode, returns `Ok(None)` without touching the cluster
  /// or the toolchain at all.
  pub async fn bootstrap(
    &self,
    cfg: &Cfg,
  ) -> Result<Option<SharedExecutor>, BootstrapError> {
    if cfg.mode == Mode::Development {
      log::info!("development mode: skipping cluster bootstrap");
      return Ok(None);
    }

    self.verify_tool(self.tools.docker).await?;
    self.verify_tool(self.tools.kind).await?;
    self.verify_tool(self.tools.kubectl).await?;

    self.ensure_cluster_exists().await?;

    for profile in registry() {
      let context = Path::new(&cfg.project_root)
        .join("template-assets")
        .join(profile.template_dir);
      self.build_image(profile.image_tag, &context).await?;
      self.load_image(profile.image_tag).await?;
    }

    let executor = SharedExecutor::connect(cfg).await?;
    return Ok(Some(executor));
  }

  async fn verify_tool(&self, tool: &str) -> Result<(), BootstrapError> {
    let output = Command::new(tool)
      .arg("version")
      .output()
      .await
      .map_err(|e| BootstrapError::ToolMissing {
        tool: tool.to_string(),
        reason: e.to_string(),
      })?;
    if !output.status.success() {
      return Err(BootstrapError::ToolMissing {
        tool: tool.to_string(),
        reason: String::from_utf8_lossy(&output.stderr).to_string(),
      });
    }
    log::info!("verified tool: {}", tool);
    return Ok(());
  }

  async fn ensure_cluster_exists(&self) -> Result<(), BootstrapError> {
    let list = Command::new(self.tools.kind)
      .args(["get", "clusters"])
      .output()
      .await
      .map_err(|e| BootstrapError::ClusterCreate {
        name: self.cluster_name.clone(),
        reason: e.to_string(),
      })?;
    let existing = String::from_utf8_lossy(&list.stdout);
    if existing.lines().any(|l| l == self.cluster_name) {
      log::info!("cluster '{}' already exists", self.cluster_name);
      return Ok(());
    }

    log::info!("creating cluster '{}'", self.cluster_name);
    let status = Command::new(self.tools.kind)
      .args(["create", "cluster", "--name", &self.cluster_name])
      .status()
      .await
      .map_err(|e| BootstrapError::ClusterCreate {
        name: self.cluster_name.clone(),
        reason: e.to_string(),
      })?;
    if !status.success() {
      return Err(BootstrapError::ClusterCreate {
        name: self.cluster_name.clone(),
        reason: format!("kind create cluster exited with {}", status),
      });
    }
    return Ok(());
  }

  async fn build_image(&self, tag: &str, context: &Path) -> Result<(), BootstrapError> {
    log::info!("building image '{}' from {}", tag, context.display());
    let status = Command::new(self.tools.docker)
      .args(["build", "-t", tag, "."])
      .current_dir(context)
      .status()
      .await
      .map_err(|e| BootstrapError::ImageBuild {
        tag: tag.to_string(),
        reason: e.to_string(),
      })?;
    if !status.success() {
      return Err(BootstrapError::ImageBuild {
        tag: tag.to_string(),
        reason: format!("docker build exited with {}", status),
      });
    }
    return Ok(());
  }

  async fn load_image(&self, tag: &str) -> Result<(), BootstrapError> {
    log::info!("loading image '{}' into cluster '{}'", tag, self.cluster_name);
    let status = Command::new(self.tools.kind)
      .args(["load", "docker-image", tag, "--name", &self.cluster_name])
      .status()
      .await
      .map_err(|e| BootstrapError::ImageLoad {
        tag: tag.to_string(),
        reason: e.to_string(),
      })?;
    if !status.success() {
      return Err(BootstrapError::ImageLoad {
        tag: tag.to_string(),
        reason: format!("kind load docker-image exited with {}", status),
      });
    }
    return Ok(());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn development_mode_skips_bootstrap() {
    let cfg = Cfg {
      mode: Mode::Development,
      ..Cfg::default()
    };
    let bootstrapper = ClusterBootstrapper::new("skillcode-test");
    let result = bootstrapper.bootstrap(&cfg).await.unwrap();
    assert!(result.is_none());
  }
}
