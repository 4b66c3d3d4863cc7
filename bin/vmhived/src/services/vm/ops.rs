use ntex::web;

use vmhive_error::http::HttpResult;

use vmhive_stubs::generic::{ApiReply, ListQuery, ListReply};
use vmhive_stubs::logs::VmOperationLog;

use crate::middlewares;
use crate::models::{SystemState, VmOperationLogDb};

/// Operation history of one virtual machine
#[web::get("/vm/{name}/operations")]
pub async fn list_vm_operations(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
  qs: web::types::Query<ListQuery>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let vm = super::find_owned_vm(&path, &info, &state).await?;
  let (total, rows) = VmOperationLogDb::list_by_vm(vm.id, &qs, &state.pool).await?;
  let items: Vec<VmOperationLog> = rows.into_iter().map(Into::into).collect();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(ListReply { total, items })))
}
