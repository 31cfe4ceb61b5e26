//! Synthesizes the full source of the runner program a submission is
//! executed inside: the per-language template, with the user's code, the
//! test cases, and the function name substituted in.

use rust_embed::Embed;
use thiserror::Error;

use crate::etc::Cfg;
use crate::lang::Language;
use crate::problem::{FunctionSpec, Problem, Submission};

#[derive(Embed)]
#[folder = "template-assets/"]
#[include = "*/main.tmpl"]
#[include = "*/ds_utils.*"]
struct TemplateAssets;

#[derive(Error, Debug)]
pub enum HarnessError {
  #[error("no harness template found for {template_dir}/main.tmpl")]
  TemplateNotFound { template_dir: String },

  #[error("harness template for {template_dir}/main.tmpl is not valid UTF-8")]
  TemplateNotUtf8 { template_dir: String },

  #[error("failed to render harness template for {template_dir}/main.tmpl: {reason}")]
  Render { template_dir: String, reason: String },

  #[error("failed to serialize test cases: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("no ds_utils helper file found for {template_dir}")]
  DsUtilsNotFound { template_dir: String },

  #[error("ds_utils helper file for {template_dir} is not valid UTF-8")]
  DsUtilsNotUtf8 { template_dir: String },
}

/// Stateless; every call resolves its template fresh from the embedded
/// asset bundle baked into the binary.
pub struct HarnessBuilder;

impl HarnessBuilder {
  /// Render the full harness source for `submission` against `problem`.
  /// Deterministic: identical inputs produce byte-identical output (the
  /// `cfg.dev_template_override` path aside, which is a development-only
  /// escape hatch for iterating on a template without a rebuild).
  pub fn build(problem: &Problem, submission: &Submission, cfg: &Cfg) -> Result<String, HarnessError> {
    let profile = submission.language.profile();
    let template_path = format!("{}/main.tmpl", profile.template_dir);
    let template_source = Self::resolve(cfg, &template_path, profile.template_dir)?;

    let test_cases_json = serde_json::to_string(&problem.test_cases)?;
    let function_name = Self::function_name(&problem.function_spec, submission.language);

    let mut env = minijinja::Environment::new();
    env
      .add_template("harness", &template_source)
      .map_err(|e| HarnessError::Render {
        template_dir: profile.template_dir.to_string(),
        reason: e.to_string(),
      })?;
    let tmpl = env.get_template("harness").unwrap();

    let rendered = tmpl
      .render(minijinja::context! {
        user_code => submission.code,
        test_cases => test_cases_json,
        function_name => function_name,
      })
      .map_err(|e| HarnessError::Render {
        template_dir: profile.template_dir.to_string(),
        reason: e.to_string(),
      })?;

    return Ok(rendered);
  }

  fn function_name(spec: &FunctionSpec, language: Language) -> String {
    return spec.name.to_case(language.profile().case);
  }

  /// The source of the helper data-structure library (`ListNode`,
  /// `TreeNode`, `Graph`, ...) bundled with `language`'s runner image.
  pub fn ds_utils(language: Language, cfg: &Cfg) -> Result<String, HarnessError> {
    let profile = language.profile();
    let path = format!("{}/ds_utils.{}", profile.template_dir, profile.extension);
    return Self::resolve_with(
      cfg,
      &path,
      profile.template_dir,
      HarnessError::DsUtilsNotFound {
        template_dir: profile.template_dir.to_string(),
      },
      HarnessError::DsUtilsNotUtf8 {
        template_dir: profile.template_dir.to_string(),
      },
    );
  }

  /// Resolve `template-assets/<relative_path>`: a `cfg.dev_template_override`
  /// hit wins, otherwise fall back to the asset baked into the binary.
  fn resolve(cfg: &Cfg, relative_path: &str, template_dir: &str) -> Result<String, HarnessError> {
    return Self::resolve_with(
      cfg,
      relative_path,
      template_dir,
      HarnessError::TemplateNotFound {
        template_dir: template_dir.to_string(),
      },
      HarnessError::TemplateNotUtf8 {
        template_dir: template_dir.to_string(),
      },
    );
  }

  fn resolve_with(
    cfg: &Cfg,
    relative_path: &str,
    _template_dir: &str,
    not_found: HarnessError,
    not_utf8: HarnessError,
  ) -> Result<String, HarnessError> {
    if let Some(source) = cfg.dev_template_override(relative_path) {
      return Ok(source);
    }
    let asset = TemplateAssets::get(relative_path).ok_or(not_found)?;
    let source = std::str::from_utf8(asset.data.as_ref()).map_err(|_| not_utf8)?;
    return Ok(source.to_string());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::identifier::Identifier;
  use crate::problem::{Difficulty, Parameter, TestVector};
  use crate::types::AbstractType;

  fn sample_problem() -> Problem {
    return Problem {
      id: "1".to_string(),
      title: "Binary Search".to_string(),
      description: "find target".to_string(),
      difficulty: Difficulty::Easy,
      category: "Array".to_string(),
      stats: 0,
      examples: vec![],
      test_cases: vec![TestVector {
        parameters: vec!["[1,2,3]".to_string(), "2".to_string()],
        expected_output: "1".to_string(),
      }],
      function_spec: FunctionSpec {
        name: Identifier::parse("binary_search").unwrap(),
        parameters: vec![
          Parameter {
            name: Identifier::parse("nums").unwrap(),
            ty: AbstractType::array(AbstractType::integer()),
          },
          Parameter {
            name: Identifier::parse("target").unwrap(),
            ty: AbstractType::integer(),
          },
        ],
        return_type: AbstractType::integer(),
      },
      languages: vec![Language::Python],
    };
  }

  #[test]
  fn build_is_deterministic() {
    let problem = sample_problem();
    let submission = Submission {
      language: Language::Python,
      code: "def binary_search(nums, target):\n    return nums.index(target)".to_string(),
    };
    let cfg = Cfg::default();
    let first = HarnessBuilder::build(&problem, &submission, &cfg).unwrap();
    let second = HarnessBuilder::build(&problem, &submission, &cfg).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn build_substitutes_function_name_and_code() {
    let problem = sample_problem();
    let submission = Submission {
      language: Language::Python,
      code: "def binary_search(nums, target):\n    return nums.index(target)".to_string(),
    };
    let rendered = HarnessBuilder::build(&problem, &submission, &Cfg::default()).unwrap();
    assert!(rendered.contains("binary_search"));
    assert!(rendered.contains("nums.index(target)"));
  }

  #[test]
  fn ds_utils_is_available_for_every_registered_language() {
    for profile in crate::lang::registry() {
      let source = HarnessBuilder::ds_utils(profile.language, &Cfg::default()).unwrap();
      assert!(source.contains("ListNode"));
    }
  }
}
