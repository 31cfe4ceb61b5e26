//! `AbstractType`: the recursive type description shared across every
//! supported language, and the codec that validates literal encodings of it
//! and generates canonical samples.

use std::str::FromStr;

use regex::Regex;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An atomic, leaf-level type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
pub enum Atomic {
  Integer,
  Double,
  String,
  Boolean,
}

/// A container type; every variant carries exactly one child type describing
/// its elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
pub enum Container {
  Array,
  Matrix,
  ListNode,
  TreeNode,
  Graph,
}

/// A recursive algebraic type description. Atomic nodes are leaves;
/// container nodes carry one child describing the element type.
///
/// Serializes as `{"type": "Integer"}` for atomic nodes and
/// `{"type": "Array", "typeChildren": {...}}` for container nodes, matching
/// the wire shape problems are authored in.
#[derive(Debug, Clone, PartialEq)]
pub enum AbstractType {
  Atomic(Atomic),
  Container(Container, Box<AbstractType>),
}

#[derive(Serialize, Deserialize)]
struct AbstractTypeRepr {
  #[serde(rename = "type")]
  type_name: String,
  #[serde(rename = "type_children", default, skip_serializing_if = "Option::is_none")]
  type_children: Option<Box<AbstractType>>,
}

impl Serialize for AbstractType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let repr = match self {
      AbstractType::Atomic(a) => AbstractTypeRepr {
        type_name: a.to_string(),
        type_children: None,
      },
      AbstractType::Container(c, child) => AbstractTypeRepr {
        type_name: c.to_string(),
        type_children: Some(child.clone()),
      },
    };
    return repr.serialize(serializer);
  }
}

impl<'de> Deserialize<'de> for AbstractType {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let repr = AbstractTypeRepr::deserialize(deserializer)?;
    return match repr.type_children {
      Some(child) => {
        let container = Container::from_str(&repr.type_name)
          .map_err(|_| D::Error::custom(format!("unknown composite type: {}", repr.type_name)))?;
        Ok(AbstractType::Container(container, child))
      }
      None => {
        let atomic = Atomic::from_str(&repr.type_name)
          .map_err(|_| D::Error::custom(format!("unknown atomic type: {}", repr.type_name)))?;
        Ok(AbstractType::Atomic(atomic))
      }
    };
  }
}

impl AbstractType {
  pub fn integer() -> Self {
    return Self::Atomic(Atomic::Integer);
  }

  pub fn double() -> Self {
    return Self::Atomic(Atomic::Double);
  }

  pub fn string() -> Self {
    return Self::Atomic(Atomic::String);
  }

  pub fn boolean() -> Self {
    return Self::Atomic(Atomic::Boolean);
  }

  pub fn array(child: AbstractType) -> Self {
    return Self::Container(Container::Array, Box::new(child));
  }

  pub fn matrix(child: AbstractType) -> Self {
    return Self::Container(Container::Matrix, Box::new(child));
  }

  pub fn list_node(child: AbstractType) -> Self {
    return Self::Container(Container::ListNode, Box::new(child));
  }

  pub fn tree_node(child: AbstractType) -> Self {
    return Self::Container(Container::TreeNode, Box::new(child));
  }

  pub fn graph(child: AbstractType) -> Self {
    return Self::Container(Container::Graph, Box::new(child));
  }
}

/// Error produced while validating a literal against an `AbstractType`.
///
/// The `path` field accumulates context as validation recurses, so the
/// top-level message reads like `"element 2: invalid Integer: 3.14"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TypeError {
  pub message: String,
}

impl TypeError {
  fn new(message: impl Into<String>) -> Self {
    return Self {
      message: message.into(),
    };
  }

  /// Prefix this error's message with additional path context, the way a
  /// caller recursing into a container element would.
  fn with_context(self, context: impl std::fmt::Display) -> Self {
    return Self::new(format!("{}: {}", context, self.message));
  }
}

lazy_static::lazy_static! {
  static ref INTEGER_PAT: Regex = Regex::new(r"^-?\d+$").unwrap();
  static ref DOUBLE_PAT: Regex = Regex::new(r"^-?\d+(\.\d+)?$").unwrap();
  static ref STRING_REJECT_PAT: Regex = Regex::new(r"[\[\],]").unwrap();
}

/// Validate and generate literal encodings of `AbstractType` values.
///
/// The literal encoding is always a string: atomic types encode directly
/// (`"3"`, `"3.14"`, `"true"`), containers encode as JSON arrays of their
/// element encodings.
pub struct TypeCodec;

impl TypeCodec {
  /// Validate that `literal` is a well-formed encoding of `ty`.
  pub fn validate(literal: &str, ty: &AbstractType) -> Result<(), TypeError> {
    return match ty {
      AbstractType::Atomic(atomic) => Self::validate_atomic(literal, *atomic),
      AbstractType::Container(container, child) => {
        Self::validate_container(literal, *container, child)
      }
    };
  }

  fn validate_atomic(literal: &str, atomic: Atomic) -> Result<(), TypeError> {
    return match atomic {
      Atomic::Integer => {
        if INTEGER_PAT.is_match(literal) {
          Ok(())
        } else {
          Err(TypeError::new(format!(
            "invalid Integer: {} not all digits",
            literal
          )))
        }
      }
      Atomic::Double => {
        if DOUBLE_PAT.is_match(literal) {
          Ok(())
        } else {
          Err(TypeError::new(format!(
            "invalid Double: {} not all digits or digits.digits",
            literal
          )))
        }
      }
      Atomic::Boolean => {
        if literal == "true" || literal == "false" {
          Ok(())
        } else {
          Err(TypeError::new(format!(
            "invalid Boolean: {} not true or false",
            literal
          )))
        }
      }
      Atomic::String => {
        if STRING_REJECT_PAT.is_match(literal) {
          Err(TypeError::new(format!(
            "invalid String: {} contains special characters: [ ] ,",
            literal
          )))
        } else {
          Ok(())
        }
      }
    };
  }

  fn validate_container(
    literal: &str,
    container: Container,
    child: &AbstractType,
  ) -> Result<(), TypeError> {
    let parsed: serde_json::Value = serde_json::from_str(literal)
      .map_err(|e| TypeError::new(format!("invalid composite type: {}", e)))?;

    return match container {
      Container::Array | Container::ListNode | Container::TreeNode => {
        let array = parsed
          .as_array()
          .ok_or_else(|| TypeError::new(format!("expected array, got: {}", parsed)))?;
        for (i, elem) in array.iter().enumerate() {
          Self::validate(&elem.to_string(), child).map_err(|e| e.with_context(format!("element {}", i)))?;
        }
        Ok(())
      }
      Container::Matrix => {
        let rows = parsed
          .as_array()
          .ok_or_else(|| TypeError::new(format!("expected 2D array for Matrix, got: {}", parsed)))?;
        let mut row_length: Option<usize> = None;
        for (i, row) in rows.iter().enumerate() {
          let row_array = row
            .as_array()
            .ok_or_else(|| TypeError::new(format!("matrix row {} is not an array", i)))?;
          match row_length {
            None => row_length = Some(row_array.len()),
            Some(len) if len != row_array.len() => {
              return Err(TypeError::new("matrix rows have inconsistent lengths"));
            }
            _ => {}
          }
          for elem in row_array {
            Self::validate(&elem.to_string(), child)
              .map_err(|e| e.with_context(format!("row {}", i)))?;
          }
        }
        Ok(())
      }
      Container::Graph => {
        let edges = parsed
          .as_array()
          .ok_or_else(|| TypeError::new(format!("expected array of pairs for Graph, got: {}", parsed)))?;
        for (i, edge) in edges.iter().enumerate() {
          let pair = edge
            .as_array()
            .filter(|p| p.len() == 2)
            .ok_or_else(|| TypeError::new(format!("invalid edge: {}", edge)))?;
          for node in pair {
            Self::validate(&node.to_string(), child)
              .map_err(|e| e.with_context(format!("edge {}", i)))?;
          }
        }
        Ok(())
      }
    };
  }

  /// Produce a canonical valid literal encoding of `ty`.
  pub fn sample(ty: &AbstractType) -> String {
    return match ty {
      AbstractType::Atomic(Atomic::Integer) => "1".to_string(),
      AbstractType::Atomic(Atomic::Double) => "1.2".to_string(),
      AbstractType::Atomic(Atomic::String) => "\"str\"".to_string(),
      AbstractType::Atomic(Atomic::Boolean) => "false".to_string(),
      AbstractType::Container(Container::Array, child)
      | AbstractType::Container(Container::ListNode, child)
      | AbstractType::Container(Container::TreeNode, child) => {
        format!("[{}, {}]", Self::sample(child), Self::sample(child))
      }
      AbstractType::Container(Container::Matrix, child) => {
        let row = format!("[{}, {}]", Self::sample(child), Self::sample(child));
        format!("[{}, {}]", row, row)
      }
      AbstractType::Container(Container::Graph, child) => {
        let edge = format!("[{}, {}]", Self::sample(child), Self::sample(child));
        format!("[{}, {}]", edge, edge)
      }
    };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validates_atomics() {
    assert!(TypeCodec::validate("42", &AbstractType::integer()).is_ok());
    assert!(TypeCodec::validate("-3", &AbstractType::integer()).is_ok());
    assert!(TypeCodec::validate("3.14", &AbstractType::integer()).is_err());
    assert!(TypeCodec::validate("3.14", &AbstractType::double()).is_ok());
    assert!(TypeCodec::validate("true", &AbstractType::boolean()).is_ok());
    assert!(TypeCodec::validate("maybe", &AbstractType::boolean()).is_err());
    assert!(TypeCodec::validate("hello", &AbstractType::string()).is_ok());
    assert!(TypeCodec::validate("[hello]", &AbstractType::string()).is_err());
  }

  #[test]
  fn validates_array_of_integer() {
    let ty = AbstractType::array(AbstractType::integer());
    assert!(TypeCodec::validate("[1,2,3]", &ty).is_ok());
    assert!(TypeCodec::validate("[1,2.5,3]", &ty).is_err());
  }

  #[test]
  fn rejects_inconsistent_matrix_rows() {
    let ty = AbstractType::matrix(AbstractType::integer());
    let err = TypeCodec::validate("[[1,2],[3]]", &ty).unwrap_err();
    assert!(err.message.contains("inconsistent lengths"));
  }

  #[test]
  fn validates_graph_edges() {
    let ty = AbstractType::graph(AbstractType::integer());
    assert!(TypeCodec::validate("[[1,2],[2,3]]", &ty).is_ok());
    assert!(TypeCodec::validate("[[1,2,3]]", &ty).is_err());
  }

  #[test]
  fn sample_round_trips_through_validate() {
    let types = vec![
      AbstractType::integer(),
      AbstractType::double(),
      AbstractType::string(),
      AbstractType::boolean(),
      AbstractType::array(AbstractType::integer()),
      AbstractType::matrix(AbstractType::integer()),
      AbstractType::graph(AbstractType::integer()),
      AbstractType::array(AbstractType::array(AbstractType::string())),
    ];
    for ty in types {
      let sample = TypeCodec::sample(&ty);
      assert!(
        TypeCodec::validate(&sample, &ty).is_ok(),
        "sample {} did not validate against {:?}",
        sample,
        ty
      );
    }
  }

  #[test]
  fn rejecting_a_leaf_breaks_validation() {
    let ty = AbstractType::array(AbstractType::integer());
    let sample = TypeCodec::sample(&ty);
    let corrupted = sample.replacen('1', "\"x\"", 1);
    assert!(TypeCodec::validate(&corrupted, &ty).is_err());
  }
}
