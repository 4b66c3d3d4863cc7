#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImageStatus {
  Available,
  Unavailable,
}

impl std::fmt::Display for ImageStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ImageStatus::Available => write!(f, "available"),
      ImageStatus::Unavailable => write!(f, "unavailable"),
    }
  }
}

impl std::str::FromStr for ImageStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "available" => Ok(ImageStatus::Available),
      "unavailable" => Ok(ImageStatus::Unavailable),
      _ => Err(format!("unknown image status {s}")),
    }
  }
}

/// An operating system image parsed from the catalog file
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmImagePartial {
  pub name: String,
  pub display_name: String,
  pub os_type: String,
  pub os_version: String,
  pub architecture: String,
  pub image_url: String,
  pub default_user: String,
  pub default_password: String,
  pub picture_url: String,
  pub description: String,
}

/// An operating system image as returned by the api
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmImage {
  pub id: i64,
  pub name: String,
  pub display_name: String,
  pub os_type: String,
  pub os_version: String,
  pub architecture: String,
  pub image_url: String,
  pub status: ImageStatus,
  pub public: bool,
  pub default_user: String,
  pub description: String,
  pub picture_url: String,
  pub created_at: i64,
  pub updated_at: i64,
}
