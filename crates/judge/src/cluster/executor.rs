//! The process-wide, immutable cluster handle every [`crate::job::JobRunner`]
//! borrows from: one client bound to one namespace.

use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{ConfigMap, Pod};
use kube::api::{Api, DeleteParams, ListParams, LogParams, ObjectMeta, PostParams};
use thiserror::Error;

use crate::etc::Cfg;

#[derive(Error, Debug)]
pub enum ClusterError {
  #[error("failed to build cluster client: {0}")]
  Connect(String),

  #[error("failed to create ConfigMap '{name}': {reason}")]
  CreateConfigMap { name: String, reason: String },

  #[error("failed to delete ConfigMap '{name}': {reason}")]
  DeleteConfigMap { name: String, reason: String },

  #[error("failed to create Job '{name}': {reason}")]
  CreateJob { name: String, reason: String },

  #[error("failed to get Job '{name}' status: {reason}")]
  GetJob { name: String, reason: String },

  #[error("failed to delete Job '{name}': {reason}")]
  DeleteJob { name: String, reason: String },

  #[error("failed to list Pods for Job '{job_name}': {reason}")]
  ListPods { job_name: String, reason: String },

  #[error("no Pods found for Job '{job_name}'")]
  NoPodsForJob { job_name: String },

  #[error("failed to get logs for Pod '{pod_name}': {reason}")]
  FetchLogs { pod_name: String, reason: String },
}

/// Cheaply cloneable: `kube::Client` is internally reference-counted and
/// synchronized, so sharing a `SharedExecutor` across concurrently in-flight
/// evaluations needs no additional locking.
#[derive(Clone)]
pub struct SharedExecutor {
  client: kube::Client,
  namespace: String,
}

impl SharedExecutor {
  /// Build a client from `cfg.kubeconfig`, or in-cluster/default-context
  /// config when unset.
  pub async fn connect(cfg: &Cfg) -> Result<Self, ClusterError> {
    let client = match &cfg.kubeconfig {
      Some(path) => {
        let kubeconfig = kube::config::Kubeconfig::read_from(path)
          .map_err(|e| ClusterError::Connect(e.to_string()))?;
        let config = kube::Config::from_custom_kubeconfig(
          kubeconfig,
          &kube::config::KubeConfigOptions::default(),
        )
        .await
        .map_err(|e| ClusterError::Connect(e.to_string()))?;
        kube::Client::try_from(config).map_err(|e| ClusterError::Connect(e.to_string()))?
      }
      None => kube::Client::try_default()
        .await
        .map_err(|e| ClusterError::Connect(e.to_string()))?,
    };

    return Ok(Self {
      client,
      namespace: cfg.namespace.clone(),
    });
  }

  fn config_maps(&self) -> Api<ConfigMap> {
    return Api::namespaced(self.client.clone(), &self.namespace);
  }

  fn jobs(&self) -> Api<Job> {
    return Api::namespaced(self.client.clone(), &self.namespace);
  }

  fn pods(&self) -> Api<Pod> {
    return Api::namespaced(self.client.clone(), &self.namespace);
  }

  /// Create a ConfigMap named `name` with a single key `data_key` holding
  /// `content`.
  pub async fn create_config_map(
    &self,
    name: &str,
    data_key: &str,
    content: &str,
  ) -> Result<(), ClusterError> {
    let mut data = BTreeMap::new();
    data.insert(data_key.to_string(), content.to_string());

    let config_map = ConfigMap {
      metadata: ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(self.namespace.clone()),
        ..Default::default()
      },
      data: Some(data),
      ..Default::default()
    };

    self
      .config_maps()
      .create(&PostParams::default(), &config_map)
      .await
      .map_err(|e| ClusterError::CreateConfigMap {
        name: name.to_string(),
        reason: e.to_string(),
      })?;
    return Ok(());
  }

  pub async fn delete_config_map(&self, name: &str) -> Result<(), ClusterError> {
    self
      .config_maps()
      .delete(name, &DeleteParams::default())
      .await
      .map_err(|e| ClusterError::DeleteConfigMap {
        name: name.to_string(),
        reason: e.to_string(),
      })?;
    return Ok(());
  }

  pub async fn create_job(&self, job: Job) -> Result<(), ClusterError> {
    let name = job
      .metadata
      .name
      .clone()
      .unwrap_or_else(|| "<unnamed>".to_string());
    self
      .jobs()
      .create(&PostParams::default(), &job)
      .await
      .map_err(|e| ClusterError::CreateJob {
        name,
        reason: e.to_string(),
      })?;
    return Ok(());
  }

  /// `(succeeded, failed)` counts from the Job's status.
  pub async fn job_status(&self, name: &str) -> Result<(i32, i32), ClusterError> {
    let job = self
      .jobs()
      .get(name)
      .await
      .map_err(|e| ClusterError::GetJob {
        name: name.to_string(),
        reason: e.to_string(),
      })?;
    let status = job.status.unwrap_or_default();
    return Ok((status.succeeded.unwrap_or(0), status.failed.unwrap_or(0)));
  }

  pub async fn delete_job(&self, name: &str) -> Result<(), ClusterError> {
    let dp = DeleteParams::default().with_propagation_policy(kube::api::PropagationPolicy::Background);
    self
      .jobs()
      .delete(name, &dp)
      .await
      .map_err(|e| ClusterError::DeleteJob {
        name: name.to_string(),
        reason: e.to_string(),
      })?;
    return Ok(());
  }

  /// Logs of the first Pod labeled `job-name=<job_name>`, matching how the
  /// Job controller labels the Pods it creates.
  pub async fn fetch_job_logs(&self, job_name: &str) -> Result<String, ClusterError> {
    let lp = ListParams::default().labels(&format!("job-name={}", job_name));
    let pods = self
      .pods()
      .list(&lp)
      .await
      .map_err(|e| ClusterError::ListPods {
        job_name: job_name.to_string(),
        reason: e.to_string(),
      })?;

    let pod_name = pods
      .items
      .first()
      .and_then(|p| p.metadata.name.clone())
      .ok_or_else(|| ClusterError::NoPodsForJob {
        job_name: job_name.to_string(),
      })?;

    let logs = self
      .pods()
      .logs(&pod_name, &LogParams::default())
      .await
      .map_err(|e| ClusterError::FetchLogs {
        pod_name: pod_name.clone(),
        reason: e.to_string(),
      })?;
    return Ok(logs);
  }
}
