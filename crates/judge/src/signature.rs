//! Produces a per-language function stub from a `FunctionSpec`, using each
//! language's `TypeMapping` table (see [`crate::lang`]).

use thiserror::Error;

use crate::lang::{Language, TypeMapping, UnsupportedLanguageError};
use crate::problem::FunctionSpec;
use crate::types::{AbstractType, Atomic, Container};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
  #[error(transparent)]
  UnsupportedLanguage(#[from] UnsupportedLanguageError),
}

/// Pure, total over the registered language set: `render` never performs
/// I/O and always succeeds for a supported language.
pub struct SignatureRenderer;

impl SignatureRenderer {
  /// Render a stub the user edits: correctly-cased function name, typed
  /// parameter list, return annotation.
  pub fn render(spec: &FunctionSpec, language: Language) -> Result<String, SignatureError> {
    let profile = language.profile();
    let mapping = &profile.type_mapping;

    let function_name = spec.name.to_case(profile.case);
    let params = spec
      .parameters
      .iter()
      .map(|p| {
        format!(
          "{}: {}",
          p.name.to_case(profile.case),
          Self::render_type(&p.ty, mapping)
        )
      })
      .collect::<Vec<_>>()
      .join(", ");
    let return_type = Self::render_type(&spec.return_type, mapping);

    return Ok(Self::render_template(
      language,
      &function_name,
      &params,
      &return_type,
    ));
  }

  fn render_type(ty: &AbstractType, mapping: &TypeMapping) -> String {
    return match ty {
      AbstractType::Atomic(Atomic::Integer) => mapping.integer.to_string(),
      AbstractType::Atomic(Atomic::Double) => mapping.double.to_string(),
      AbstractType::Atomic(Atomic::String) => mapping.string.to_string(),
      AbstractType::Atomic(Atomic::Boolean) => mapping.boolean.to_string(),
      AbstractType::Container(Container::Array, child) => mapping
        .array_fmt
        .replacen("{}", &Self::render_type(child, mapping), 1),
      AbstractType::Container(Container::Matrix, child) => mapping
        .matrix_fmt
        .replacen("{}", &Self::render_type(child, mapping), 1),
      AbstractType::Container(Container::ListNode, _) => mapping.list_node.to_string(),
      AbstractType::Container(Container::TreeNode, _) => mapping.tree_node.to_string(),
      AbstractType::Container(Container::Graph, _) => mapping.graph.to_string(),
    };
  }

  fn render_template(
    language: Language,
    function_name: &str,
    params: &str,
    return_type: &str,
  ) -> String {
    return match language {
      Language::Python => format!("def {}({}) -> {}:", function_name, params, return_type),
      Language::JavaScript => {
        let doc_lines: Vec<String> = params
          .split(", ")
          .filter(|p| !p.is_empty())
          .map(|p| {
            let (name, ty) = p.split_once(": ").unwrap_or((p, "any"));
            format!(" * @param {{{}}} {}", ty, name)
          })
          .collect();
        let params_only = params
          .split(", ")
          .filter(|p| !p.is_empty())
          .map(|p| p.split_once(": ").map(|(n, _)| n).unwrap_or(p))
          .collect::<Vec<_>>()
          .join(", ");
        format!(
          "/**\n{}\n * @returns {{{}}}\n */\nfunction {}({}) {{\n}}",
          doc_lines.join("\n"),
          return_type,
          function_name,
          params_only
        )
      }
      Language::Java => format!(
        "public {} {}({}) {{\n    // TODO\n}}",
        return_type, function_name, params
      ),
    };
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::identifier::Identifier;
  use crate::problem::Parameter;

  fn binary_search_spec() -> FunctionSpec {
    return FunctionSpec {
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
    };
  }

  #[test]
  fn renders_python_signature() {
    let rendered = SignatureRenderer::render(&binary_search_spec(), Language::Python).unwrap();
    assert_eq!(rendered, "def binary_search(nums: list[int], target: int) -> int:");
  }

  #[test]
  fn renders_java_signature_with_camel_case_params() {
    let rendered = SignatureRenderer::render(&binary_search_spec(), Language::Java).unwrap();
    assert_eq!(
      rendered,
      "public Integer binarySearch(List<Integer> nums, Integer target) {\n    // TODO\n}"
    );
  }

  #[test]
  fn renders_javascript_jsdoc_stub() {
    let rendered =
      SignatureRenderer::render(&binary_search_spec(), Language::JavaScript).unwrap();
    assert!(rendered.contains("function binarySearch(nums, target)"));
    assert!(rendered.contains("@param {Array<number>} nums"));
    assert!(rendered.contains("@returns {number}"));
  }

  #[test]
  fn total_over_every_registered_language() {
    for profile in crate::lang::registry() {
      assert!(SignatureRenderer::render(&binary_search_spec(), profile.language).is_ok());
    }
  }

  #[test]
  fn renders_non_composing_container_types() {
    let spec = FunctionSpec {
      name: Identifier::parse("insert").unwrap(),
      parameters: vec![Parameter {
        name: Identifier::parse("head").unwrap(),
        ty: AbstractType::list_node(AbstractType::integer()),
      }],
      return_type: AbstractType::list_node(AbstractType::integer()),
    };
    let rendered = SignatureRenderer::render(&spec, Language::Python).unwrap();
    assert_eq!(rendered, "def insert(head: utils.ListNode) -> utils.ListNode:");
  }
}
