use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::generic::ApiReply;
use vmhive_stubs::vm::{Vm, VmOperation, VmStatus};

use crate::middlewares;
use crate::models::SystemState;

/// Start a stopped virtual machine, reusing its row and allocated port
#[web::post("/vm/{name}/start")]
pub async fn start_vm(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let vm = super::find_owned_vm(&path, &info, &state).await?;
  if vm.status() != VmStatus::Stopped {
    return Err(HttpError::bad_request(format!(
      "vm {} cannot be started from status {}",
      vm.name, vm.status
    )));
  }
  match state.controller.start_vm(&vm, &info.uid).await {
    Ok(updated) => {
      super::log_operation(&state, vm.id, VmOperation::Start, Ok(()), &info.uid)
        .await;
      let updated: Vm = updated.into();
      Ok(web::HttpResponse::Ok().json(&ApiReply::ok(updated)))
    }
    Err(err) => {
      super::log_operation(
        &state,
        vm.id,
        VmOperation::Start,
        Err(&err.to_string()),
        &info.uid,
      )
      .await;
      Err(err.into())
    }
  }
}
