use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::generic::{ApiReply, ListQuery, ListReply};
use vmhive_stubs::vm_image::VmImage;

use crate::middlewares;
use crate::models::{SystemState, VmImageDb};

/// List the operating system catalog
#[web::get("/image")]
pub async fn list_image(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  qs: web::types::Query<ListQuery>,
) -> HttpResult<web::HttpResponse> {
  middlewares::authenticate(&req, &state)?;
  let (total, rows) = VmImageDb::list(&qs, &state.pool).await?;
  let items: Vec<VmImage> = rows.into_iter().map(Into::into).collect();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(ListReply { total, items })))
}

/// Inspect one catalog image by name
#[web::get("/image/{name}")]
pub async fn inspect_image(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
) -> HttpResult<web::HttpResponse> {
  middlewares::authenticate(&req, &state)?;
  let image = VmImageDb::find_by_name(&path, &state.pool)
    .await?
    .ok_or_else(|| HttpError::not_found(format!("image {} not found", *path)))?;
  let image: VmImage = image.into();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(image)))
}

pub fn ntex_config(config: &mut web::ServiceConfig) {
  config.service(list_image);
  config.service(inspect_image);
}
