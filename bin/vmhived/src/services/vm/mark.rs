use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::generic::ApiReply;
use vmhive_stubs::vm::{VmOperation, VmStatus};

use crate::middlewares;
use crate::models::{SystemState, VmDb};

/// Flag a virtual machine for delayed destruction.
/// The pod keeps running until the reaper reclaims it after the retention
/// window.
#[web::post("/vm/{name}/mark-for-deletion")]
pub async fn mark_vm_for_deletion(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let vm = super::find_owned_vm(&path, &info, &state).await?;
  match vm.status() {
    VmStatus::MarkedForDeletion => {
      return Ok(web::HttpResponse::Ok().json(&ApiReply::empty()))
    }
    VmStatus::Running | VmStatus::Stopped | VmStatus::Failed => {}
    status => {
      return Err(HttpError::bad_request(format!(
        "vm {} cannot be marked for deletion from status {status}",
        vm.name
      )))
    }
  }
  VmDb::mark_for_deletion(vm.id, &info.uid, &state.pool).await?;
  super::log_operation(
    &state,
    vm.id,
    VmOperation::MarkForDeletion,
    Ok(()),
    &info.uid,
  )
  .await;
  Ok(web::HttpResponse::Ok().json(&ApiReply::empty()))
}
