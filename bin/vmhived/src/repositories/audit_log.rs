use diesel::prelude::*;

use vmhive_error::io::IoResult;

use vmhive_stubs::generic::ListQuery;

use crate::schema::audit_logs;
use crate::models::{AuditLogDb, NewAuditLogDb, Pool};
use crate::utils;

use super::generic::{sanitize_paging, RepositoryBase};

impl RepositoryBase for AuditLogDb {}

impl AuditLogDb {
  pub async fn create(item: NewAuditLogDb, pool: &Pool) -> IoResult<AuditLogDb> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::insert_into(audit_logs::table)
        .values(item)
        .get_result(&mut conn)
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn list(
    query: &ListQuery,
    pool: &Pool,
  ) -> IoResult<(i64, Vec<AuditLogDb>)> {
    let query = query.clone();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let total = audit_logs::table
        .count()
        .get_result::<i64>(&mut conn)
        .map_err(Self::map_err)?;
      let (offset, limit, desc) = sanitize_paging(&query);
      let mut list_query = audit_logs::table.into_boxed();
      if let Some(token) = query.page_token {
        list_query = list_query.filter(audit_logs::id.gt(token));
      }
      list_query = if desc {
        list_query.order(audit_logs::created_at.desc())
      } else {
        list_query.order(audit_logs::created_at.asc())
      };
      let items = list_query
        .offset(offset)
        .limit(limit)
        .load(&mut conn)
        .map_err(Self::map_err)?;
      Ok((total, items))
    })
    .await
  }
}
