use ntex::web;

use vmhive_error::http::HttpResult;

use vmhive_stubs::generic::ApiReply;
use vmhive_stubs::vm::{VmOperation, VmStatus};

use crate::middlewares;
use crate::models::SystemState;

/// Delete a virtual machine.
///
/// The pod is destroyed right away and the row is tombstoned, the reaper
/// removes it for good once the retention window has passed. Deleting an
/// already tombstoned vm succeeds without touching anything.
#[web::delete("/vm/{name}")]
pub async fn delete_vm(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let vm = super::find_owned_vm(&path, &info, &state).await?;
  if vm.status() == VmStatus::Terminating {
    return Ok(web::HttpResponse::Ok().json(&ApiReply::empty()));
  }
  match state.controller.delete_vm(&vm, &info.uid).await {
    Ok(()) => {
      super::log_operation(&state, vm.id, VmOperation::Delete, Ok(()), &info.uid)
        .await;
      Ok(web::HttpResponse::Ok().json(&ApiReply::empty()))
    }
    Err(err) => {
      super::log_operation(
        &state,
        vm.id,
        VmOperation::Delete,
        Err(&err.to_string()),
        &info.uid,
      )
      .await;
      Err(err.into())
    }
  }
}
