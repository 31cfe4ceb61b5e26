//! The closed enumeration of supported runtimes, and the per-language value
//! object (`LanguageProfile`) that `SignatureRenderer`, `HarnessBuilder`, and
//! `JobRunner` are all parameterized over.
//!
//! Adding a language means registering one more `LanguageProfile` in
//! [`registry`]; nothing else in the crate branches on language by name.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::identifier::Case;

/// A supported runtime. The `strum` lowercase serialization is the single
/// canonical token used by every route and internal call site that accepts
/// a language name — this resolves the split between "language decoders"
/// that other revisions of this kind of system tend to grow.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
  Python,
  JavaScript,
  Java,
}

/// Error returned when a language token does not match any registered
/// [`Language`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported language: {token}")]
pub struct UnsupportedLanguageError {
  pub token: String,
}

impl Language {
  /// Decode a language from a free-form token: lowercase it, then look it up
  /// in the closed enumeration. Used uniformly by every entry point that
  /// accepts a language name from a client.
  pub fn from_token(token: &str) -> Result<Self, UnsupportedLanguageError> {
    return Self::from_str(&token.to_lowercase()).map_err(|_| UnsupportedLanguageError {
      token: token.to_string(),
    });
  }

  pub fn profile(&self) -> &'static LanguageProfile {
    return registry()
      .iter()
      .find(|p| p.language == *self)
      .expect("every Language variant has a registered profile");
  }
}

/// The per-language type-mapping table used by `SignatureRenderer`.
///
/// `Array`/`Matrix` are the only composing entries (they wrap a rendered
/// child type); `ListNode`/`TreeNode`/`Graph` are rendered as a fixed name
/// regardless of child, matching how every one of these languages expresses
/// "a node in a user-facing helper structure" as a single opaque type.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapping {
  pub integer: &'static str,
  pub double: &'static str,
  pub string: &'static str,
  pub boolean: &'static str,
  /// `{}` is replaced with the rendered child type.
  pub array_fmt: &'static str,
  /// `{}` is replaced with the rendered child type.
  pub matrix_fmt: &'static str,
  pub list_node: &'static str,
  pub tree_node: &'static str,
  pub graph: &'static str,
}

/// Everything `SignatureRenderer`, `HarnessBuilder`, and `JobRunner` need to
/// know about one language. Immutable, constructed once in [`registry`].
#[derive(Debug, Clone, Copy)]
pub struct LanguageProfile {
  pub language: Language,
  /// Source file extension, without the leading dot.
  pub extension: &'static str,
  /// Identifier casing convention for function and parameter names.
  pub case: Case,
  /// Command used to invoke the harness source file inside the runner
  /// container, e.g. `["python3"]` — the harness file path is appended.
  pub runtime_cmd: &'static [&'static str],
  /// Container image tag the runner job uses for this language.
  pub image_tag: &'static str,
  /// Directory name under `template-assets/` holding this language's
  /// `Dockerfile`, `main.tmpl`, and `ds_utils.<ext>`.
  pub template_dir: &'static str,
  pub type_mapping: TypeMapping,
}

/// The full set of registered language profiles.
pub fn registry() -> &'static [LanguageProfile] {
  static PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
      language: Language::Python,
      extension: "py",
      case: Case::Snake,
      runtime_cmd: &["python3"],
      image_tag: "python-runner:latest",
      template_dir: "python",
      type_mapping: TypeMapping {
        integer: "int",
        double: "float",
        string: "str",
        boolean: "bool",
        array_fmt: "list[{}]",
        matrix_fmt: "list[list[{}]]",
        list_node: "utils.ListNode",
        tree_node: "utils.TreeNode",
        graph: "utils.Graph",
      },
    },
    LanguageProfile {
      language: Language::JavaScript,
      extension: "js",
      case: Case::Camel,
      runtime_cmd: &["node"],
      image_tag: "javascript-runner:latest",
      template_dir: "javascript",
      type_mapping: TypeMapping {
        integer: "number",
        double: "number",
        string: "string",
        boolean: "boolean",
        array_fmt: "Array<{}>",
        matrix_fmt: "Array<Array<{}>>",
        list_node: "utils.ListNode",
        tree_node: "utils.TreeNode",
        graph: "utils.Graph",
      },
    },
    LanguageProfile {
      language: Language::Java,
      extension: "java",
      case: Case::Camel,
      runtime_cmd: &["java"],
      image_tag: "java-runner:latest",
      template_dir: "java",
      type_mapping: TypeMapping {
        integer: "Integer",
        double: "Double",
        string: "String",
        boolean: "Boolean",
        array_fmt: "List<{}>",
        matrix_fmt: "List<List<{}>>",
        list_node: "ListNode",
        tree_node: "TreeNode",
        graph: "Graph",
      },
    },
  ];
  return PROFILES;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn canonical_decoder_is_case_insensitive() {
    assert_eq!(Language::from_token("python").unwrap(), Language::Python);
    assert_eq!(Language::from_token("PYTHON").unwrap(), Language::Python);
    assert_eq!(
      Language::from_token("JavaScript").unwrap(),
      Language::JavaScript
    );
  }

  #[test]
  fn rejects_unknown_tokens() {
    assert!(Language::from_token("cobol").is_err());
  }

  #[test]
  fn every_language_has_a_profile() {
    for profile in registry() {
      assert_eq!(profile.language.profile().language, profile.language);
    }
  }
}
