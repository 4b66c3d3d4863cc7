use ntex::web;

use vmhive_error::http::HttpResult;

use vmhive_stubs::generic::{ApiReply, ListQuery, ListReply};
use vmhive_stubs::vm::Vm;

use crate::middlewares;
use crate::models::{SystemState, VmDb};

/// List virtual machines, admins see every row, everyone else their own
#[web::get("/vm")]
pub async fn list_vm(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  qs: web::types::Query<ListQuery>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let owner = if info.is_admin() {
    None
  } else {
    Some(info.uid.as_str())
  };
  let (total, rows) = VmDb::list(owner, &qs, &state.pool).await?;
  let items: Vec<Vm> = rows.into_iter().map(Into::into).collect();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(ListReply { total, items })))
}
