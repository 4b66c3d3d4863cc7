#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// Api version prefix every response envelope carries
pub const API_VERSION: &str = "v1";

/// Generic paginated list query
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListQuery {
  /// Number of rows to skip
  pub offset: Option<i64>,
  /// Maximum number of rows to return
  pub limit: Option<i64>,
  /// Column the result is sorted by
  pub sort_field: Option<String>,
  /// Sort direction, `asc` or `desc`
  pub sort_direction: Option<String>,
  /// Keyset paging token, used together with `page_field`
  pub page_token: Option<i64>,
  /// Column the keyset token applies to
  pub page_field: Option<String>,
}

/// Envelope wrapping every api response
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApiReply<T> {
  pub api_version: String,
  pub code: u16,
  pub message: String,
  pub data: Option<T>,
}

impl<T> ApiReply<T> {
  pub fn ok(data: T) -> Self {
    Self {
      api_version: API_VERSION.to_owned(),
      code: 0,
      message: "success".to_owned(),
      data: Some(data),
    }
  }
}

impl ApiReply<()> {
  pub fn empty() -> Self {
    Self {
      api_version: API_VERSION.to_owned(),
      code: 0,
      message: "success".to_owned(),
      data: None,
    }
  }
}

/// List payload nested inside the envelope data
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListReply<T> {
  /// Total number of rows matching the query, before paging
  pub total: i64,
  pub items: Vec<T>,
}
