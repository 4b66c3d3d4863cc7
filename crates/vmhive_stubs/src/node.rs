#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// A substrate node with its routable address
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeItem {
  pub name: String,
  pub internal_ip: String,
}
