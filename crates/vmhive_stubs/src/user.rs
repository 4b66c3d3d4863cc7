#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UserRole {
  Admin,
  Normal,
}

impl std::fmt::Display for UserRole {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UserRole::Admin => write!(f, "admin"),
      UserRole::Normal => write!(f, "normal"),
    }
  }
}

impl std::str::FromStr for UserRole {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "admin" => Ok(UserRole::Admin),
      "normal" => Ok(UserRole::Normal),
      _ => Err(format!("unknown user role {s}")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UserStatus {
  Enabled,
  Disabled,
}

impl std::fmt::Display for UserStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UserStatus::Enabled => write!(f, "enabled"),
      UserStatus::Disabled => write!(f, "disabled"),
    }
  }
}

impl std::str::FromStr for UserStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "enabled" => Ok(UserStatus::Enabled),
      "disabled" => Ok(UserStatus::Disabled),
      _ => Err(format!("unknown user status {s}")),
    }
  }
}

/// A user account as returned by the api
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct User {
  pub id: i64,
  pub uid: String,
  pub username: String,
  pub role: UserRole,
  pub status: UserStatus,
  pub primary: bool,
  pub email: String,
  pub gid_number: String,
  /// Directory group name resolved from the gid cache
  #[cfg_attr(feature = "serde", serde(default))]
  pub group: String,
  pub created_at: i64,
  pub updated_at: i64,
}

/// Credentials presented to the login endpoint
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoginPayload {
  pub username: String,
  pub password: String,
}

/// Reply of a successful login
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoginReply {
  pub token: String,
  pub user: User,
}

/// Payload for an admin updating a user account
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserUpdatePayload {
  pub role: Option<UserRole>,
  pub status: Option<UserStatus>,
}
