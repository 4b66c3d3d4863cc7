use vmhive_error::io::{FromIo, IoError};

use vmhive_stubs::generic::ListQuery;

/// Base trait shared by every repository, attaches the entity name as error
/// context on store failures
pub trait RepositoryBase {
  fn get_name() -> &'static str {
    let name = std::any::type_name::<Self>();
    name.split("::").last().unwrap_or(name)
  }

  fn map_err<E>(err: E) -> Box<IoError>
  where
    E: FromIo<Box<IoError>>,
  {
    err.map_err_context(Self::get_name)
  }
}

/// Bounds applied to every list query before it reaches the store.
/// Returns `(offset, limit, descending)`.
pub fn sanitize_paging(query: &ListQuery) -> (i64, i64, bool) {
  let offset = query.offset.unwrap_or(0).max(0);
  let limit = query.limit.unwrap_or(20).clamp(1, 200);
  let desc = !matches!(query.sort_direction.as_deref(), Some("asc"));
  (offset, limit, desc)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn paging_defaults() {
    let q = ListQuery::default();
    let (offset, limit, desc) = sanitize_paging(&q);
    assert_eq!(offset, 0);
    assert_eq!(limit, 20);
    assert!(desc);
  }

  #[test]
  fn paging_bounds() {
    let q = ListQuery {
      offset: Some(-5),
      limit: Some(100000),
      sort_direction: Some("asc".to_owned()),
      ..Default::default()
    };
    let (offset, limit, desc) = sanitize_paging(&q);
    assert_eq!(offset, 0);
    assert_eq!(limit, 200);
    assert!(!desc);
  }
}
