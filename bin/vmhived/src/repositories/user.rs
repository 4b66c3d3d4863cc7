use diesel::prelude::*;

use vmhive_error::io::IoResult;

use vmhive_stubs::generic::ListQuery;

use crate::schema::users;
use crate::models::{NewUserDb, Pool, UserDb, UserUpdateDb};
use crate::utils;

use super::generic::{sanitize_paging, RepositoryBase};

impl RepositoryBase for UserDb {}

impl UserDb {
  pub async fn create(item: NewUserDb, pool: &Pool) -> IoResult<UserDb> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::insert_into(users::table)
        .values(item)
        .get_result(&mut conn)
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn find_by_uid(uid: &str, pool: &Pool) -> IoResult<Option<UserDb>> {
    let uid = uid.to_owned();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = users::table
        .filter(users::uid.eq(uid))
        .filter(users::deleted_at.is_null())
        .get_result(&mut conn)
        .optional()
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn list(
    query: &ListQuery,
    pool: &Pool,
  ) -> IoResult<(i64, Vec<UserDb>)> {
    let query = query.clone();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let total = users::table
        .filter(users::deleted_at.is_null())
        .count()
        .get_result::<i64>(&mut conn)
        .map_err(Self::map_err)?;
      let (offset, limit, desc) = sanitize_paging(&query);
      let mut list_query =
        users::table.filter(users::deleted_at.is_null()).into_boxed();
      match query.sort_field.as_deref() {
        Some("username") => {
          list_query = if desc {
            list_query.order(users::username.desc())
          } else {
            list_query.order(users::username.asc())
          };
        }
        _ => {
          list_query = if desc {
            list_query.order(users::created_at.desc())
          } else {
            list_query.order(users::created_at.asc())
          };
        }
      }
      let items = list_query
        .offset(offset)
        .limit(limit)
        .load(&mut conn)
        .map_err(Self::map_err)?;
      Ok((total, items))
    })
    .await
  }

  pub async fn update_by_uid(
    uid: &str,
    mut values: UserUpdateDb,
    updater: &str,
    pool: &Pool,
  ) -> IoResult<UserDb> {
    values.updated_at = Some(utils::key::now_millis());
    values.updater = Some(updater.to_owned());
    let uid = uid.to_owned();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::update(
        users::table
          .filter(users::uid.eq(uid))
          .filter(users::deleted_at.is_null()),
      )
      .set(values)
      .get_result(&mut conn)
      .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }
}
