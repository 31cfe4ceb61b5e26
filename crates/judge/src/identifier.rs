//! Identifier validation and casing-convention conversion, shared by the
//! problem validator and the per-language signature renderer.

use std::fmt::Display;
use std::str::FromStr;

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use regex::Regex;
use thiserror::Error;

/// Error returned when a raw string does not form a valid identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid identifier: {raw}")]
pub struct IdentifierError {
  pub raw: String,
}

/// A name that matches `^[A-Za-z_][A-Za-z0-9_ ]*$`.
///
/// This is deliberately permissive about internal spaces: problem authors
/// write function and parameter names in whatever human-readable form they
/// like ("Binary Search"), and `to_case` is responsible for turning that
/// into the target language's actual identifier syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

lazy_static::lazy_static! {
  static ref IDENTIFIER_PAT: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_ ]*$").unwrap();
}

impl Identifier {
  pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
    if IDENTIFIER_PAT.is_match(raw) {
      return Ok(Self(raw.to_string()));
    }
    return Err(IdentifierError {
      raw: raw.to_string(),
    });
  }

  pub fn as_str(&self) -> &str {
    return &self.0;
  }

  /// Render this identifier in the given casing convention.
  pub fn to_case(&self, case: Case) -> String {
    return match case {
      Case::Snake => self.0.to_snake_case(),
      Case::Camel => self.0.to_lower_camel_case(),
      Case::Pascal => self.0.to_upper_camel_case(),
    };
  }
}

impl FromStr for Identifier {
  type Err = IdentifierError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    return Self::parse(s);
  }
}

impl Display for Identifier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.0);
  }
}

impl AsRef<str> for Identifier {
  fn as_ref(&self) -> &str {
    return &self.0;
  }
}

/// Identifier casing convention a `LanguageProfile` renders names in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
  Snake,
  Camel,
  Pascal,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_valid_identifiers() {
    assert!(Identifier::parse("binary_search").is_ok());
    assert!(Identifier::parse("Binary Search").is_ok());
    assert!(Identifier::parse("_leading").is_ok());
  }

  #[test]
  fn rejects_invalid_identifiers() {
    assert!(Identifier::parse("").is_err());
    assert!(Identifier::parse("1abc").is_err());
    assert!(Identifier::parse("has-dash").is_err());
    assert!(Identifier::parse("has.dot").is_err());
  }

  #[test]
  fn converts_casing() {
    let id = Identifier::parse("Binary Search").unwrap();
    assert_eq!(id.to_case(Case::Snake), "binary_search");
    assert_eq!(id.to_case(Case::Camel), "binarySearch");
    assert_eq!(id.to_case(Case::Pascal), "BinarySearch");
  }

  #[test]
  fn converts_single_word() {
    let id = Identifier::parse("nums").unwrap();
    assert_eq!(id.to_case(Case::Snake), "nums");
    assert_eq!(id.to_case(Case::Camel), "nums");
    assert_eq!(id.to_case(Case::Pascal), "Nums");
  }
}
