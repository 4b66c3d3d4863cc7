use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::generic::ApiReply;
use vmhive_stubs::vm::{Vm, VmOperation, VmPartial};
use vmhive_stubs::vm_image::ImageStatus;

use crate::middlewares;
use crate::models::{SystemState, VmDb, VmImageDb};
use crate::repositories::vm::new_vm_row;

/// Create a virtual machine.
///
/// The desired state row is committed first, then the controller drives the
/// substrate. A failure after the row exists leaves it `pending`, the caller
/// may retry the creation.
#[web::post("/vm")]
pub async fn create_vm(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  payload: web::types::Json<VmPartial>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let payload = payload.into_inner();
  if VmDb::find_by_name(&payload.name, &state.pool).await?.is_some() {
    return Err(HttpError::bad_request(format!(
      "duplicate name {}",
      payload.name
    )));
  }
  let image = VmImageDb::find_by_name(&payload.image_name, &state.pool)
    .await?
    .ok_or_else(|| {
      HttpError::not_found(format!("image {} not found", payload.image_name))
    })?;
  if image.status.parse() != Ok(ImageStatus::Available) {
    return Err(HttpError::bad_request(format!(
      "image {} is not available",
      image.name
    )));
  }
  let row = new_vm_row(&payload, &image, &info.uid, &info.username)?;
  let vm = VmDb::create(row, &state.pool).await?;
  match state.controller.create_vm(&vm, &info.uid).await {
    Ok(updated) => {
      super::log_operation(&state, vm.id, VmOperation::Create, Ok(()), &info.uid)
        .await;
      let updated: Vm = updated.into();
      Ok(web::HttpResponse::Ok().json(&ApiReply::ok(updated)))
    }
    Err(err) => {
      super::log_operation(
        &state,
        vm.id,
        VmOperation::Create,
        Err(&err.to_string()),
        &info.uid,
      )
      .await;
      Err(err.into())
    }
  }
}
