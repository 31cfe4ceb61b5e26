//! Renders the embedded job template into a concrete [`Job`] value. The
//! template only ever substitutes job metadata; user code never touches the
//! YAML, it lives exclusively in the mounted payload ConfigMap.

use k8s_openapi::api::batch::v1::Job;
use rust_embed::Embed;
use thiserror::Error;

use crate::etc::Cfg;

#[derive(Embed)]
#[folder = "template-assets/"]
#[include = "job-template.yaml"]
struct JobTemplateAsset;

#[derive(Error, Debug)]
pub enum JobSpecError {
  #[error("job template asset not found")]
  TemplateNotFound,

  #[error("job template is not valid UTF-8")]
  TemplateNotUtf8,

  #[error("failed to render job template: {0}")]
  Render(String),

  #[error("rendered job template is not valid YAML: {0}")]
  InvalidYaml(#[from] serde_yaml::Error),
}

pub struct JobSpecParams<'a> {
  pub job_name: &'a str,
  pub request_id: &'a str,
  pub image: &'a str,
  pub runtime: &'a str,
  pub file_ext: &'a str,
}

/// Renders `template-assets/job-template.yaml` into a [`Job`] ready to be
/// submitted to the cluster. In development mode, a copy of the template on
/// disk under `cfg.project_root` takes precedence over the embedded one.
pub fn render(params: &JobSpecParams, cfg: &Cfg) -> Result<Job, JobSpecError> {
  let template_source = match cfg.dev_template_override("job-template.yaml") {
    Some(source) => source,
    None => {
      let asset =
        JobTemplateAsset::get("job-template.yaml").ok_or(JobSpecError::TemplateNotFound)?;
      std::str::from_utf8(asset.data.as_ref())
        .map_err(|_| JobSpecError::TemplateNotUtf8)?
        .to_string()
    }
  };

  let mut env = minijinja::Environment::new();
  env
    .add_template("job", &template_source)
    .map_err(|e| JobSpecError::Render(e.to_string()))?;
  let tmpl = env.get_template("job").unwrap();

  let rendered = tmpl
    .render(minijinja::context! {
      job_name => params.job_name,
      request_id => params.request_id,
      image => params.image,
      runtime => params.runtime,
      file_ext => params.file_ext,
    })
    .map_err(|e| JobSpecError::Render(e.to_string()))?;

  let job: Job = serde_yaml::from_str(&rendered)?;
  return Ok(job);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn render_produces_a_named_job_with_mounted_payload() {
    let params = JobSpecParams {
      job_name: "job-abc123",
      request_id: "abc123",
      image: "python-runner:latest",
      runtime: "python3",
      file_ext: "py",
    };
    let job = render(&params, &Cfg::default()).unwrap();
    assert_eq!(job.metadata.name.as_deref(), Some("job-abc123"));

    let pod_spec = job
      .spec
      .unwrap()
      .template
      .spec
      .expect("pod spec is present");
    let container = &pod_spec.containers[0];
    assert_eq!(container.image.as_deref(), Some("python-runner:latest"));
    assert_eq!(
      container.command.as_deref(),
      Some(&["python3".to_string(), "/payload/runner.py".to_string()][..])
    );
  }
}
