use diesel::prelude::*;

use vmhive_stubs::logs::VmOperationLog;
use vmhive_stubs::vm::VmOperation;

use crate::schema::{image_operation_logs, user_operation_logs, vm_operation_logs};

/// One attempted vm operation with its outcome
#[derive(Clone, Debug, Queryable, Identifiable)]
#[diesel(primary_key(id))]
#[diesel(table_name = vm_operation_logs)]
pub struct VmOperationLogDb {
  pub id: i64,
  pub vm_id: i64,
  pub operation: String,
  pub status: String,
  pub message: String,
  pub created_at: i64,
  pub creator: String,
}

impl From<VmOperationLogDb> for VmOperationLog {
  fn from(db: VmOperationLogDb) -> Self {
    Self {
      id: db.id,
      vm_id: db.vm_id,
      operation: db.operation,
      status: db.status,
      message: db.message,
      created_at: db.created_at,
      creator: db.creator,
    }
  }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = vm_operation_logs)]
pub struct NewVmOperationLogDb {
  pub vm_id: i64,
  pub operation: String,
  pub status: String,
  pub message: String,
  pub created_at: i64,
  pub creator: String,
}

impl NewVmOperationLogDb {
  pub fn new(
    vm_id: i64,
    operation: VmOperation,
    result: Result<(), &str>,
    creator: &str,
  ) -> Self {
    let (status, message) = match result {
      Ok(()) => ("success".to_owned(), String::new()),
      Err(msg) => ("failure".to_owned(), msg.to_owned()),
    };
    Self {
      vm_id,
      operation: operation.to_string(),
      status,
      message,
      created_at: crate::utils::key::now_millis(),
      creator: creator.to_owned(),
    }
  }
}

/// A user account event
#[derive(Clone, Debug, Queryable, Identifiable)]
#[diesel(primary_key(id))]
#[diesel(table_name = user_operation_logs)]
pub struct UserOperationLogDb {
  pub id: i64,
  pub uid: String,
  pub operator: String,
  pub operation: String,
  pub created_at: i64,
  pub creator: String,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = user_operation_logs)]
pub struct NewUserOperationLogDb {
  pub uid: String,
  pub operator: String,
  pub operation: String,
  pub created_at: i64,
  pub creator: String,
}

/// An image catalog change
#[derive(Clone, Debug, Queryable, Identifiable)]
#[diesel(primary_key(id))]
#[diesel(table_name = image_operation_logs)]
pub struct ImageOperationLogDb {
  pub id: i64,
  pub image_id: i64,
  pub operation: String,
  pub status: String,
  pub message: String,
  pub created_at: i64,
  pub creator: String,
}

impl From<ImageOperationLogDb> for vmhive_stubs::logs::ImageOperationLog {
  fn from(db: ImageOperationLogDb) -> Self {
    Self {
      id: db.id,
      image_id: db.image_id,
      operation: db.operation,
      status: db.status,
      message: db.message,
      created_at: db.created_at,
      creator: db.creator,
    }
  }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = image_operation_logs)]
pub struct NewImageOperationLogDb {
  pub image_id: i64,
  pub operation: String,
  pub status: String,
  pub message: String,
  pub created_at: i64,
  pub creator: String,
}

impl NewImageOperationLogDb {
  pub fn new(image_id: i64, operation: &str) -> Self {
    Self {
      image_id,
      operation: operation.to_owned(),
      status: "success".to_owned(),
      message: String::new(),
      created_at: crate::utils::key::now_millis(),
      creator: String::new(),
    }
  }
}
