use diesel::prelude::*;

use vmhive_error::io::IoResult;

use vmhive_stubs::generic::ListQuery;

use crate::schema::event_logs;
use crate::models::{EventLogDb, NewEventLogDb, Pool};
use crate::utils;

use super::generic::{sanitize_paging, RepositoryBase};

impl RepositoryBase for EventLogDb {}

impl EventLogDb {
  pub async fn create(item: NewEventLogDb, pool: &Pool) -> IoResult<EventLogDb> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::insert_into(event_logs::table)
        .values(item)
        .get_result(&mut conn)
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn list(
    resource_uid: Option<&str>,
    query: &ListQuery,
    pool: &Pool,
  ) -> IoResult<(i64, Vec<EventLogDb>)> {
    let resource_uid = resource_uid.map(str::to_owned);
    let query = query.clone();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let mut count_query = event_logs::table.into_boxed();
      let mut list_query = event_logs::table.into_boxed();
      if let Some(uid) = &resource_uid {
        count_query = count_query.filter(event_logs::resource_uid.eq(uid.clone()));
        list_query = list_query.filter(event_logs::resource_uid.eq(uid.clone()));
      }
      let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .map_err(Self::map_err)?;
      let (offset, limit, desc) = sanitize_paging(&query);
      list_query = if desc {
        list_query.order(event_logs::created_at.desc())
      } else {
        list_query.order(event_logs::created_at.asc())
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
