use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::generic::ApiReply;
use vmhive_stubs::vm::{VmOperation, VmStatus};

use crate::middlewares;
use crate::models::SystemState;

/// Stop a virtual machine. The pod goes away, the row and its port stay.
#[web::post("/vm/{name}/stop")]
pub async fn stop_vm(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let vm = super::find_owned_vm(&path, &info, &state).await?;
  match vm.status() {
    VmStatus::Stopped => {
      return Ok(web::HttpResponse::Ok().json(&ApiReply::empty()))
    }
    VmStatus::Pending | VmStatus::Running => {}
    status => {
      return Err(HttpError::bad_request(format!(
        "vm {} cannot be stopped from status {status}",
        vm.name
      )))
    }
  }
  match state.controller.stop_vm(&vm, &info.uid).await {
    Ok(()) => {
      super::log_operation(&state, vm.id, VmOperation::Stop, Ok(()), &info.uid)
        .await;
      Ok(web::HttpResponse::Ok().json(&ApiReply::empty()))
    }
    Err(err) => {
      super::log_operation(
        &state,
        vm.id,
        VmOperation::Stop,
        Err(&err.to_string()),
        &info.uid,
      )
      .await;
      Err(err.into())
    }
  }
}
