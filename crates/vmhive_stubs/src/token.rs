#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use crate::user::UserRole;

/// Identity carried by an issued token
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenInfo {
  pub uid: String,
  pub username: String,
  #[cfg_attr(feature = "serde", serde(default))]
  pub name: String,
  pub role: UserRole,
  #[cfg_attr(feature = "serde", serde(default))]
  pub primary: bool,
}

impl TokenInfo {
  pub fn is_admin(&self) -> bool {
    self.role == UserRole::Admin
  }
}

/// Token claims, the identity plus registered jwt claims
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenClaims {
  #[cfg_attr(feature = "serde", serde(flatten))]
  pub info: TokenInfo,
  /// Issuer
  pub iss: String,
  /// Issued at, seconds epoch
  pub iat: i64,
  /// Not before, seconds epoch
  pub nbf: i64,
  /// Expiration, seconds epoch
  pub exp: i64,
}
