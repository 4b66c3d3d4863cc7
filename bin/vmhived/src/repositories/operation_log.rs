use diesel::prelude::*;

use vmhive_error::io::IoResult;

use vmhive_stubs::generic::ListQuery;

use crate::schema::{image_operation_logs, user_operation_logs, vm_operation_logs};
use crate::models::{
  ImageOperationLogDb, NewImageOperationLogDb, NewUserOperationLogDb,
  NewVmOperationLogDb, Pool, UserOperationLogDb, VmOperationLogDb,
};
use crate::utils;

use super::generic::{sanitize_paging, RepositoryBase};

impl RepositoryBase for VmOperationLogDb {}

impl VmOperationLogDb {
  pub async fn create(
    item: NewVmOperationLogDb,
    pool: &Pool,
  ) -> IoResult<VmOperationLogDb> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::insert_into(vm_operation_logs::table)
        .values(item)
        .get_result(&mut conn)
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn list_by_vm(
    vm_id: i64,
    query: &ListQuery,
    pool: &Pool,
  ) -> IoResult<(i64, Vec<VmOperationLogDb>)> {
    let query = query.clone();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let total = vm_operation_logs::table
        .filter(vm_operation_logs::vm_id.eq(vm_id))
        .count()
        .get_result::<i64>(&mut conn)
        .map_err(Self::map_err)?;
      let (offset, limit, desc) = sanitize_paging(&query);
      let mut list_query = vm_operation_logs::table
        .filter(vm_operation_logs::vm_id.eq(vm_id))
        .into_boxed();
      list_query = if desc {
        list_query.order(vm_operation_logs::created_at.desc())
      } else {
        list_query.order(vm_operation_logs::created_at.asc())
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

impl RepositoryBase for UserOperationLogDb {}

impl UserOperationLogDb {
  pub async fn create(
    item: NewUserOperationLogDb,
    pool: &Pool,
  ) -> IoResult<UserOperationLogDb> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::insert_into(user_operation_logs::table)
        .values(item)
        .get_result(&mut conn)
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }
}

impl RepositoryBase for ImageOperationLogDb {}

impl ImageOperationLogDb {
  pub async fn create(
    item: NewImageOperationLogDb,
    pool: &Pool,
  ) -> IoResult<ImageOperationLogDb> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::insert_into(image_operation_logs::table)
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
  ) -> IoResult<(i64, Vec<ImageOperationLogDb>)> {
    let query = query.clone();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let total = image_operation_logs::table
        .count()
        .get_result::<i64>(&mut conn)
        .map_err(Self::map_err)?;
      let (offset, limit, desc) = sanitize_paging(&query);
      let mut list_query = image_operation_logs::table.into_boxed();
      list_query = if desc {
        list_query.order(image_operation_logs::created_at.desc())
      } else {
        list_query.order(image_operation_logs::created_at.asc())
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
