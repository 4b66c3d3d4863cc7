use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::token::TokenInfo;
use vmhive_stubs::vm::VmOperation;

use crate::models::{NewVmOperationLogDb, SystemState, VmDb, VmOperationLogDb};

pub mod create;
pub mod list;
pub mod inspect;
pub mod start;
pub mod stop;
pub mod delete;
pub mod mark;
pub mod ops;

pub use create::*;
pub use list::*;
pub use inspect::*;
pub use start::*;
pub use stop::*;
pub use delete::*;
pub use mark::*;
pub use ops::*;

/// Resolve a vm by name, falling back to its uid, for the calling user.
/// A foreign vm looks exactly like a missing one to a normal user, so names
/// cannot be probed.
pub(crate) async fn find_owned_vm(
  name: &str,
  info: &TokenInfo,
  state: &SystemState,
) -> HttpResult<VmDb> {
  let found = match VmDb::find_by_name(name, &state.pool).await? {
    Some(vm) => Some(vm),
    None => VmDb::find_by_uid(name, &state.pool).await?,
  };
  let vm =
    found.ok_or_else(|| HttpError::not_found(format!("vm {name} not found")))?;
  if !info.is_admin() && vm.user_uid != info.uid {
    return Err(HttpError::not_found(format!("vm {name} not found")));
  }
  Ok(vm)
}

/// Record the outcome of a vm operation attempt
pub(crate) async fn log_operation(
  state: &SystemState,
  vm_id: i64,
  operation: VmOperation,
  result: Result<(), &str>,
  creator: &str,
) {
  let row = NewVmOperationLogDb::new(vm_id, operation, result, creator);
  if let Err(err) = VmOperationLogDb::create(row, &state.pool).await {
    log::warn!("vm: recording operation log: {err}");
  }
}

pub fn ntex_config(config: &mut web::ServiceConfig) {
  config.service(create_vm);
  config.service(list_vm);
  config.service(inspect_vm_by_pod);
  config.service(inspect_vm);
  config.service(start_vm);
  config.service(stop_vm);
  config.service(delete_vm);
  config.service(mark_vm_for_deletion);
  config.service(list_vm_operations);
}
