use diesel::prelude::*;

use vmhive_error::io::IoResult;

use vmhive_stubs::generic::ListQuery;

use crate::schema::vm_images;
use crate::models::{NewVmImageDb, Pool, VmImageDb, VmImageUpdateDb};
use crate::utils;

use super::generic::{sanitize_paging, RepositoryBase};

impl RepositoryBase for VmImageDb {}

impl VmImageDb {
  pub async fn create(item: NewVmImageDb, pool: &Pool) -> IoResult<VmImageDb> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::insert_into(vm_images::table)
        .values(item)
        .get_result(&mut conn)
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn find_by_id(id: i64, pool: &Pool) -> IoResult<Option<VmImageDb>> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = vm_images::table
        .filter(vm_images::id.eq(id))
        .filter(vm_images::deleted_at.is_null())
        .get_result(&mut conn)
        .optional()
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn find_by_name(
    name: &str,
    pool: &Pool,
  ) -> IoResult<Option<VmImageDb>> {
    let name = name.to_owned();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = vm_images::table
        .filter(vm_images::name.eq(name))
        .filter(vm_images::deleted_at.is_null())
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
  ) -> IoResult<(i64, Vec<VmImageDb>)> {
    let query = query.clone();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let total = vm_images::table
        .filter(vm_images::deleted_at.is_null())
        .count()
        .get_result::<i64>(&mut conn)
        .map_err(Self::map_err)?;
      let (offset, limit, desc) = sanitize_paging(&query);
      let mut list_query = vm_images::table
        .filter(vm_images::deleted_at.is_null())
        .into_boxed();
      match query.sort_field.as_deref() {
        Some("name") => {
          list_query = if desc {
            list_query.order(vm_images::name.desc())
          } else {
            list_query.order(vm_images::name.asc())
          };
        }
        _ => {
          list_query = if desc {
            list_query.order(vm_images::created_at.desc())
          } else {
            list_query.order(vm_images::created_at.asc())
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

  /// Catalog refresh path, update the row carrying this name
  pub async fn update_by_name(
    name: &str,
    mut values: VmImageUpdateDb,
    pool: &Pool,
  ) -> IoResult<VmImageDb> {
    values.updated_at = Some(utils::key::now_millis());
    let name = name.to_owned();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::update(
        vm_images::table.filter(vm_images::name.eq(name)),
      )
      .set(values)
      .get_result(&mut conn)
      .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }
}
