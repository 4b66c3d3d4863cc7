use diesel::prelude::*;

use vmhive_stubs::vm::{Vm, VmStatus};

use crate::schema::virtual_machines;

/// A virtual machine row.
///
/// The `uid` doubles as the substrate resource name, it never changes after
/// insert. A non null `deleted_at` marks the row as tombstoned, such rows are
/// invisible to every regular read.
#[derive(Clone, Debug, Queryable, Identifiable)]
#[diesel(primary_key(id))]
#[diesel(table_name = virtual_machines)]
pub struct VmDb {
  pub id: i64,
  pub name: String,
  pub uid: String,
  pub user_uid: String,
  pub user_name: String,
  pub cpu_cores: i32,
  pub memory_mb: i32,
  pub disk_gb: i32,
  pub status: String,
  pub pod_name: String,
  pub namespace: String,
  pub node_name: String,
  pub pod_ip: String,
  pub node_ip: String,
  pub ssh_port: i32,
  pub image_name: String,
  pub image_id: i64,
  pub created_at: i64,
  pub creator: String,
  pub updated_at: i64,
  pub updater: String,
  pub message: String,
  pub ssh_key: String,
  pub deleted_at: Option<i64>,
}

impl VmDb {
  pub fn status(&self) -> VmStatus {
    self.status.parse().unwrap_or(VmStatus::Error)
  }
}

impl From<VmDb> for Vm {
  fn from(db: VmDb) -> Self {
    let status = db.status();
    Self {
      id: db.id,
      uid: db.uid,
      name: db.name,
      user_uid: db.user_uid,
      user_name: db.user_name,
      cpu_cores: db.cpu_cores,
      memory_mb: db.memory_mb,
      disk_gb: db.disk_gb,
      status,
      pod_name: db.pod_name,
      namespace: db.namespace,
      node_name: db.node_name,
      pod_ip: db.pod_ip,
      node_ip: db.node_ip,
      ssh_port: db.ssh_port,
      image_name: db.image_name,
      image_id: db.image_id,
      created_at: db.created_at,
      creator: db.creator,
      updated_at: db.updated_at,
      updater: db.updater,
      message: db.message,
      ssh_key: db.ssh_key,
    }
  }
}

/// Insertable part of a virtual machine row
#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = virtual_machines)]
pub struct NewVmDb {
  pub name: String,
  pub uid: String,
  pub user_uid: String,
  pub user_name: String,
  pub cpu_cores: i32,
  pub memory_mb: i32,
  pub disk_gb: i32,
  pub status: String,
  pub pod_name: String,
  pub namespace: String,
  pub node_name: String,
  pub pod_ip: String,
  pub node_ip: String,
  pub ssh_port: i32,
  pub image_name: String,
  pub image_id: i64,
  pub created_at: i64,
  pub creator: String,
  pub updated_at: i64,
  pub updater: String,
  pub message: String,
  pub ssh_key: String,
}

/// Partial update of a virtual machine row
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = virtual_machines)]
pub struct VmUpdateDb {
  pub status: Option<String>,
  pub pod_name: Option<String>,
  pub namespace: Option<String>,
  pub node_name: Option<String>,
  pub pod_ip: Option<String>,
  pub node_ip: Option<String>,
  pub ssh_port: Option<i32>,
  pub message: Option<String>,
  pub updated_at: Option<i64>,
  pub updater: Option<String>,
  pub deleted_at: Option<Option<i64>>,
}

impl VmUpdateDb {
  pub fn status(status: VmStatus) -> Self {
    Self {
      status: Some(status.to_string()),
      ..Default::default()
    }
  }
}
