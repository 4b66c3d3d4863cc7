use diesel::prelude::*;

use vmhive_error::io::{IoError, IoResult};

use vmhive_stubs::generic::ListQuery;
use vmhive_stubs::vm::VmStatus;

use crate::schema::virtual_machines;
use crate::models::{NewVmDb, Pool, VmDb, VmUpdateDb};
use crate::utils;

use super::generic::{sanitize_paging, RepositoryBase};

impl RepositoryBase for VmDb {}

fn sticky_statuses() -> Vec<String> {
  vec![
    VmStatus::Terminating.to_string(),
    VmStatus::MarkedForDeletion.to_string(),
  ]
}

fn apply_paging(
  mut query: virtual_machines::BoxedQuery<'static, diesel::pg::Pg>,
  q: &ListQuery,
) -> virtual_machines::BoxedQuery<'static, diesel::pg::Pg> {
  let (offset, limit, desc) = sanitize_paging(q);
  match q.sort_field.as_deref() {
    Some("id") => {
      query = if desc {
        query.order(virtual_machines::id.desc())
      } else {
        query.order(virtual_machines::id.asc())
      };
    }
    Some("name") => {
      query = if desc {
        query.order(virtual_machines::name.desc())
      } else {
        query.order(virtual_machines::name.asc())
      };
    }
    Some("updated_at") => {
      query = if desc {
        query.order(virtual_machines::updated_at.desc())
      } else {
        query.order(virtual_machines::updated_at.asc())
      };
    }
    _ => {
      query = if desc {
        query.order(virtual_machines::created_at.desc())
      } else {
        query.order(virtual_machines::created_at.asc())
      };
    }
  }
  if let Some(token) = q.page_token {
    match q.page_field.as_deref() {
      Some("id") => {
        query = query.filter(virtual_machines::id.gt(token));
      }
      Some("created_at") | None => {
        query = query.filter(virtual_machines::created_at.gt(token));
      }
      _ => {}
    }
  }
  query.offset(offset).limit(limit)
}

impl VmDb {
  pub async fn create(item: NewVmDb, pool: &Pool) -> IoResult<VmDb> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::insert_into(virtual_machines::table)
        .values(item)
        .get_result(&mut conn)
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn find_by_id(id: i64, pool: &Pool) -> IoResult<Option<VmDb>> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = virtual_machines::table
        .filter(virtual_machines::id.eq(id))
        .filter(virtual_machines::deleted_at.is_null())
        .get_result(&mut conn)
        .optional()
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn find_by_uid(uid: &str, pool: &Pool) -> IoResult<Option<VmDb>> {
    let uid = uid.to_owned();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = virtual_machines::table
        .filter(virtual_machines::uid.eq(uid))
        .filter(virtual_machines::deleted_at.is_null())
        .get_result(&mut conn)
        .optional()
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn find_by_name(name: &str, pool: &Pool) -> IoResult<Option<VmDb>> {
    let name = name.to_owned();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = virtual_machines::table
        .filter(virtual_machines::name.eq(name))
        .filter(virtual_machines::deleted_at.is_null())
        .get_result(&mut conn)
        .optional()
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  pub async fn find_by_pod_name(
    pod_name: &str,
    pool: &Pool,
  ) -> IoResult<Option<VmDb>> {
    let pod_name = pod_name.to_owned();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = virtual_machines::table
        .filter(virtual_machines::pod_name.eq(pod_name))
        .filter(virtual_machines::deleted_at.is_null())
        .get_result(&mut conn)
        .optional()
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  /// List live rows, optionally restricted to one owner
  pub async fn list(
    owner_uid: Option<&str>,
    query: &ListQuery,
    pool: &Pool,
  ) -> IoResult<(i64, Vec<VmDb>)> {
    let owner_uid = owner_uid.map(str::to_owned);
    let query = query.clone();
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let mut count_query = virtual_machines::table
        .filter(virtual_machines::deleted_at.is_null())
        .into_boxed();
      let mut list_query = virtual_machines::table
        .filter(virtual_machines::deleted_at.is_null())
        .into_boxed();
      if let Some(uid) = &owner_uid {
        count_query = count_query.filter(virtual_machines::user_uid.eq(uid.clone()));
        list_query = list_query.filter(virtual_machines::user_uid.eq(uid.clone()));
      }
      let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .map_err(Self::map_err)?;
      let items = apply_paging(list_query, &query)
        .load(&mut conn)
        .map_err(Self::map_err)?;
      Ok((total, items))
    })
    .await
  }

  /// Rows the reconciler walks, live rows in `pending` or `running`
  pub async fn list_active(pool: &Pool) -> IoResult<Vec<VmDb>> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let items = virtual_machines::table
        .filter(virtual_machines::deleted_at.is_null())
        .filter(virtual_machines::status.eq_any(vec![
          VmStatus::Pending.to_string(),
          VmStatus::Running.to_string(),
        ]))
        .load(&mut conn)
        .map_err(Self::map_err)?;
      Ok(items)
    })
    .await
  }

  /// Rows in the given status whose last update is older than the deadline
  pub async fn list_status_before(
    status: VmStatus,
    deadline_ms: i64,
    pool: &Pool,
  ) -> IoResult<Vec<VmDb>> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let items = virtual_machines::table
        .filter(virtual_machines::status.eq(status.to_string()))
        .filter(virtual_machines::updated_at.le(deadline_ms))
        .load(&mut conn)
        .map_err(Self::map_err)?;
      Ok(items)
    })
    .await
  }

  /// Tombstoned rows whose soft delete mark is older than the deadline
  pub async fn list_soft_deleted_before(
    deadline_ms: i64,
    pool: &Pool,
  ) -> IoResult<Vec<VmDb>> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let items = virtual_machines::table
        .filter(virtual_machines::deleted_at.is_not_null())
        .filter(virtual_machines::deleted_at.le(deadline_ms))
        .load(&mut conn)
        .map_err(Self::map_err)?;
      Ok(items)
    })
    .await
  }

  /// True when a live row already holds the port
  pub async fn ssh_port_exists(port: i32, pool: &Pool) -> IoResult<bool> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let count = virtual_machines::table
        .filter(virtual_machines::deleted_at.is_null())
        .filter(virtual_machines::ssh_port.eq(port))
        .count()
        .get_result::<i64>(&mut conn)
        .map_err(Self::map_err)?;
      Ok(count > 0)
    })
    .await
  }

  /// Unconditional partial update, stamps `updated_at` and `updater`.
  /// Used for transitions the state machine allows from user operations.
  pub async fn update_by_id(
    id: i64,
    mut values: VmUpdateDb,
    updater: &str,
    pool: &Pool,
  ) -> IoResult<VmDb> {
    values.updated_at = Some(utils::key::now_millis());
    values.updater = Some(updater.to_owned());
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::update(virtual_machines::table.find(id))
        .set(values)
        .get_result(&mut conn)
        .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  /// Partial update refusing to touch sticky rows.
  /// The reconciler writes through here so `terminating` and
  /// `marked_for_deletion` are never overwritten, a `None` return means the
  /// row was sticky or gone.
  pub async fn update_checked(
    id: i64,
    mut values: VmUpdateDb,
    updater: &str,
    pool: &Pool,
  ) -> IoResult<Option<VmDb>> {
    values.updated_at = Some(utils::key::now_millis());
    values.updater = Some(updater.to_owned());
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      let item = diesel::update(
        virtual_machines::table
          .filter(virtual_machines::id.eq(id))
          .filter(virtual_machines::deleted_at.is_null())
          .filter(virtual_machines::status.ne_all(sticky_statuses())),
      )
      .set(values)
      .get_result(&mut conn)
      .optional()
      .map_err(Self::map_err)?;
      Ok(item)
    })
    .await
  }

  /// Persist an allocated ssh port. The partial unique index on live rows
  /// makes this update the collision detector, a lost race surfaces as an
  /// AlreadyExists error and the caller restarts the allocation.
  pub async fn commit_ssh_port(
    id: i64,
    port: i32,
    updater: &str,
    pool: &Pool,
  ) -> IoResult<VmDb> {
    let values = VmUpdateDb {
      ssh_port: Some(port),
      ..Default::default()
    };
    Self::update_by_id(id, values, updater, pool).await
  }

  /// Soft delete, the row becomes invisible to regular reads and waits for
  /// the reaper. Already tombstoned rows are left untouched so a second
  /// delete is indistinguishable from the first.
  pub async fn soft_delete(id: i64, updater: &str, pool: &Pool) -> IoResult<()> {
    let now = utils::key::now_millis();
    let values = VmUpdateDb {
      status: Some(VmStatus::Terminating.to_string()),
      deleted_at: Some(Some(now)),
      updated_at: Some(now),
      updater: Some(updater.to_owned()),
      ..Default::default()
    };
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      diesel::update(
        virtual_machines::table
          .filter(virtual_machines::id.eq(id))
          .filter(virtual_machines::deleted_at.is_null()),
      )
      .set(values)
      .get_result::<VmDb>(&mut conn)
      .optional()
      .map_err(Self::map_err)?;
      Ok(())
    })
    .await
  }

  /// Flag the row for delayed destruction by the reaper
  pub async fn mark_for_deletion(
    id: i64,
    updater: &str,
    pool: &Pool,
  ) -> IoResult<()> {
    let values = VmUpdateDb::status(VmStatus::MarkedForDeletion);
    Self::update_by_id(id, values, updater, pool).await?;
    Ok(())
  }

  /// Remove the row for good, only the reaper calls this
  pub async fn hard_delete(id: i64, pool: &Pool) -> IoResult<()> {
    let pool = pool.clone();
    utils::store::exec_blocking(move || {
      let mut conn = utils::store::get_pool_conn(&pool)?;
      diesel::delete(virtual_machines::table.find(id))
        .execute(&mut conn)
        .map_err(Self::map_err)?;
      Ok(())
    })
    .await
  }
}

/// Build an insertable row for a creation request, the uid is generated here
/// and never changes afterwards
pub fn new_vm_row(
  partial: &vmhive_stubs::vm::VmPartial,
  image: &crate::models::VmImageDb,
  user_uid: &str,
  user_name: &str,
) -> IoResult<NewVmDb> {
  if partial.name.is_empty() {
    return Err(IoError::invalid_input("Vm", "name cannot be empty"));
  }
  if partial.cpu_cores <= 0 || partial.memory_mb <= 0 || partial.disk_gb <= 0 {
    return Err(IoError::invalid_input(
      "Vm",
      "cpu, memory and disk must be positive",
    ));
  }
  let now = utils::key::now_millis();
  Ok(NewVmDb {
    name: partial.name.clone(),
    uid: utils::key::generate_uid(),
    user_uid: user_uid.to_owned(),
    user_name: user_name.to_owned(),
    cpu_cores: partial.cpu_cores,
    memory_mb: partial.memory_mb,
    disk_gb: partial.disk_gb,
    status: VmStatus::Pending.to_string(),
    pod_name: String::new(),
    namespace: String::new(),
    node_name: String::new(),
    pod_ip: String::new(),
    node_ip: String::new(),
    ssh_port: 0,
    image_name: image.name.clone(),
    image_id: image.id,
    created_at: now,
    creator: user_uid.to_owned(),
    updated_at: now,
    updater: user_uid.to_owned(),
    message: String::new(),
    ssh_key: partial.ssh_key.clone(),
  })
}
