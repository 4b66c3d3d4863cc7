use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::generic::ApiReply;
use vmhive_stubs::vm::Vm;

use crate::middlewares;
use crate::models::{SystemState, VmDb};

/// Inspect a virtual machine by name
#[web::get("/vm/{name}")]
pub async fn inspect_vm(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let vm = super::find_owned_vm(&path, &info, &state).await?;
  let vm: Vm = vm.into();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(vm)))
}

/// Resolve the vm backing a pod, admin only
#[web::get("/vm/by-pod/{pod_name}")]
pub async fn inspect_vm_by_pod(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  middlewares::require_admin(&info)?;
  let vm = VmDb::find_by_pod_name(&path, &state.pool)
    .await?
    .ok_or_else(|| {
      HttpError::not_found(format!("no vm backed by pod {}", *path))
    })?;
  let vm: Vm = vm.into();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(vm)))
}
